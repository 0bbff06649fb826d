//! In-process cron scheduling for `arxiv-digest schedule`
//!
//! Expressions are evaluated in UTC, like the CI trigger. Runs are
//! sequential: a run that overlaps the next tick delays it. Cancellation
//! also abandons a run in progress.

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{DigestError, Result};

/// What started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Schedule,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Schedule => "schedule",
            Trigger::Manual => "manual",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a cron expression
///
/// 5-field expressions get a leading `0` seconds field; 6- and 7-field
/// expressions are passed through.
pub fn parse_cron(expr: &str) -> Result<Schedule> {
    let fields = expr.split_whitespace().count();
    let full_expr = match fields {
        5 => format!("0 {}", expr.trim()),
        6 | 7 => expr.trim().to_string(),
        n => {
            return Err(DigestError::InvalidCron {
                expr: expr.to_string(),
                reason: format!("expected 5 fields, got {}", n),
            })
        }
    };

    Schedule::from_str(&full_expr).map_err(|e| DigestError::InvalidCron {
        expr: expr.to_string(),
        reason: e.to_string(),
    })
}

/// First scheduled time strictly after `after`
pub fn next_run_after(schedule: &Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&after).next()
}

/// Run id used for log-artifact directories: `20240501-231000-schedule-3f9a`
pub fn generate_run_id(trigger: Trigger, at: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen();
    format!("{}-{}-{:04x}", at.format("%Y%m%d-%H%M%S"), trigger, suffix)
}

/// Sleep until each upcoming tick of `expr` and run `job`, until cancelled
pub async fn run_scheduler<F, Fut>(expr: &str, cancel: CancellationToken, job: F) -> Result<()>
where
    F: Fn(Trigger) -> Fut,
    Fut: Future<Output = ()>,
{
    let schedule = parse_cron(expr)?;

    loop {
        let now = Utc::now();
        let next = next_run_after(&schedule, now).ok_or_else(|| DigestError::NoUpcomingRun {
            expr: expr.to_string(),
        })?;
        let wait = (next - now).to_std().unwrap_or_default();

        info!(next = %next, wait_secs = wait.as_secs(), "Next digest run scheduled");

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Scheduler stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        warn!("Scheduler stopped during a run; run abandoned");
                        return Ok(());
                    }
                    _ = job(Trigger::Schedule) => {}
                }
            }
        }
    }
}
