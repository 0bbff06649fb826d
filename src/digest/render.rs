//! Email body layouts

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use super::Enrichment;
use crate::arxiv::Paper;
use crate::collect::PaperCollection;

/// Frames each paper section (70 dashes)
pub const SEPARATOR: &str =
    "----------------------------------------------------------------------";

/// Frames headers and term banners (50 `=`)
pub const RULE: &str = "==================================================";

const UNKNOWN_CATEGORY: &str = "未知分类";

/// Render one paper section
///
/// Empty translation or contribution text is treated as absent.
pub fn format_paper(paper: &Paper, enrichment: &Enrichment) -> String {
    let categories = if paper.categories.is_empty() {
        UNKNOWN_CATEGORY.to_string()
    } else {
        paper.categories.join(", ")
    };

    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("📄 标题: {}", paper.title),
        format!("👥 作者: {}", paper.authors.join(", ")),
        format!("🏷️ 分类: {}", categories),
        format!("📅 发布日期: {}", paper.published),
    ];
    if let Some(comment) = non_empty(&paper.comment) {
        lines.push(format!("💬 评论: {}", comment));
    }
    lines.push(format!("🔗 ArXiv链接: {}", paper.abs_url()));
    lines.push(format!("📄 PDF下载: {}", paper.pdf_url()));
    lines.push(String::new());

    if let Some(contribution) = non_empty(&enrichment.contribution) {
        push_block(&mut lines, "*** 贡献要点 ***", contribution);
    }
    push_block(&mut lines, "*** 摘要 ***", &paper.summary);
    if let Some(translation) = non_empty(&enrichment.translation) {
        push_block(&mut lines, "*** 中文摘要 ***", translation);
    }

    lines.push(SEPARATOR.to_string());
    lines.push(String::new());
    join_lines(&lines)
}

/// Heading, body, blank line
fn push_block(lines: &mut Vec<String>, heading: &str, body: &str) {
    lines.push(heading.to_string());
    lines.push(body.to_string());
    lines.push(String::new());
}

/// Newline-terminated join
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

/// Render the full digest
///
/// `terms` is the configured term order; terms without hits are left out of
/// the overview counts and get no section. Papers missing from
/// `enrichments` render without LLM text.
pub fn render_digest(
    date: NaiveDate,
    terms: &[String],
    collection: &PaperCollection,
    enrichments: &FxHashMap<String, Enrichment>,
) -> String {
    let mut header = vec![
        format!("【ArXiv论文日报】{} 关键词: {}", date, terms.join(", ")),
        RULE.to_string(),
        String::new(),
        "📊 总览:".to_string(),
        format!("  • 总共找到 {} 篇{}发布的相关论文", collection.len(), date),
        String::new(),
    ];
    for term in terms {
        let count = collection.term_ids(term).len();
        if count > 0 {
            header.push(format!("  • 关键词 {}: {} 篇论文", term, count));
        }
    }
    header.push(RULE.to_string());
    header.push(String::new());

    let mut out = join_lines(&header);
    let absent = Enrichment::default();
    for term in terms {
        let ids = collection.term_ids(term);
        if ids.is_empty() {
            continue;
        }

        out.push_str(&format!(
            "\n{rule}\n🔎 关键词: {} ({} 篇论文)\n{rule}\n",
            term,
            ids.len(),
            rule = RULE
        ));

        for id in ids {
            if let Some(paper) = collection.get(id) {
                let enrichment = enrichments.get(id).unwrap_or(&absent);
                out.push_str(&format_paper(paper, enrichment));
            }
        }
    }

    out
}

/// Render the notice sent when no term matched any paper
pub fn render_empty_notice(date: NaiveDate, terms: &[String]) -> String {
    let mut lines = vec![
        format!("【ArXiv论文日报】{}", date),
        RULE.to_string(),
        String::new(),
        "📢 通知: 今日未找到符合以下关键词的论文:".to_string(),
        String::new(),
    ];
    lines.extend(terms.iter().map(|term| format!("🔍 {}", term)));
    lines.push(String::new());
    lines.push("📋 我们将继续监控这些关键词，有新论文发布时会及时通知您。".to_string());
    lines.push(RULE.to_string());
    join_lines(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn paper(id: &str, title: &str) -> Paper {
        Paper {
            title: title.to_string(),
            authors: vec!["Alice".to_string(), "Bob".to_string()],
            url: format!("http://arxiv.org/abs/{}v1", id),
            arxiv_id: id.to_string(),
            published: date(),
            summary: format!("Summary of {}.", title),
            categories: vec!["cs.CL".to_string(), "cs.LG".to_string()],
            comment: None,
        }
    }

    #[test]
    fn test_format_paper_full() {
        let mut p = paper("2405.00001", "Attention Again");
        p.comment = Some("10 pages".to_string());
        let enrichment = Enrichment {
            translation: Some("再次注意力。".to_string()),
            contribution: Some("用注意力解决了问题。".to_string()),
        };

        let expected = format!(
            "{sep}\n\
             📄 标题: Attention Again\n\
             👥 作者: Alice, Bob\n\
             🏷️ 分类: cs.CL, cs.LG\n\
             📅 发布日期: 2024-05-01\n\
             💬 评论: 10 pages\n\
             🔗 ArXiv链接: https://arxiv.org/abs/2405.00001\n\
             📄 PDF下载: https://arxiv.org/pdf/2405.00001.pdf\n\
             \n\
             *** 贡献要点 ***\n\
             用注意力解决了问题。\n\
             \n\
             *** 摘要 ***\n\
             Summary of Attention Again.\n\
             \n\
             *** 中文摘要 ***\n\
             再次注意力。\n\
             \n\
             {sep}\n\
             \n",
            sep = SEPARATOR
        );
        assert_eq!(format_paper(&p, &enrichment), expected);
    }

    #[test]
    fn test_format_paper_without_optional_parts() {
        let mut p = paper("2405.00002", "Bare");
        p.categories.clear();
        let enrichment = Enrichment {
            translation: Some(String::new()),
            contribution: None,
        };

        let out = format_paper(&p, &enrichment);
        assert!(out.contains("🏷️ 分类: 未知分类\n"));
        assert!(!out.contains("💬 评论"));
        assert!(!out.contains("贡献要点"));
        assert!(!out.contains("中文摘要"));
        assert!(out.contains("*** 摘要 ***\nSummary of Bare.\n\n"));
    }

    #[test]
    fn test_separator_and_rule_widths() {
        assert_eq!(SEPARATOR.len(), 70);
        assert!(SEPARATOR.chars().all(|c| c == '-'));
        assert_eq!(RULE.len(), 50);
        assert!(RULE.chars().all(|c| c == '='));
    }

    #[test]
    fn test_render_empty_notice() {
        let terms = vec!["\"transformer\"".to_string(), "rlhf".to_string()];
        let expected = format!(
            "【ArXiv论文日报】2024-05-01\n\
             {rule}\n\
             \n\
             📢 通知: 今日未找到符合以下关键词的论文:\n\
             \n\
             🔍 \"transformer\"\n\
             🔍 rlhf\n\
             \n\
             📋 我们将继续监控这些关键词，有新论文发布时会及时通知您。\n\
             {rule}\n",
            rule = RULE
        );
        assert_eq!(render_empty_notice(date(), &terms), expected);
    }

    #[test]
    fn test_render_digest_header_and_sections() {
        let terms = vec!["llm".to_string(), "rlhf".to_string(), "moe".to_string()];
        let mut collection = PaperCollection::new();
        collection.record("llm", vec![paper("1", "One"), paper("2", "Two")]);
        collection.record_empty("rlhf");
        collection.record("moe", vec![paper("2", "Two")]);

        let mut enrichments = FxHashMap::default();
        enrichments.insert(
            "1".to_string(),
            Enrichment {
                translation: Some("一".to_string()),
                contribution: Some("贡献一".to_string()),
            },
        );

        let out = render_digest(date(), &terms, &collection, &enrichments);

        let header = format!(
            "【ArXiv论文日报】2024-05-01 关键词: llm, rlhf, moe\n\
             {rule}\n\
             \n\
             📊 总览:\n\
             \x20 • 总共找到 2 篇2024-05-01发布的相关论文\n\
             \n\
             \x20 • 关键词 llm: 2 篇论文\n\
             \x20 • 关键词 moe: 1 篇论文\n\
             {rule}\n\
             \n\
             \n\
             {rule}\n\
             🔎 关键词: llm (2 篇论文)\n\
             {rule}\n",
            rule = RULE
        );
        assert!(out.starts_with(&header), "unexpected header:\n{}", out);

        assert!(!out.contains("关键词: rlhf ("));
        assert!(!out.contains("关键词 rlhf:"));
        assert!(out.contains("🔎 关键词: moe (1 篇论文)"));
        // paper 2 is listed under both terms
        assert_eq!(out.matches("📄 标题: Two").count(), 2);
        assert_eq!(out.matches("*** 中文摘要 ***").count(), 1);
    }
}
