//! arXiv search: query construction, Atom feed parsing, HTTP client
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`paper`] | `Paper` record and its links |
//! | [`query`] | `SearchQuery` → request URL |
//! | [`feed`] | Atom XML → `Vec<Paper>` (quick-xml) |
//! | [`client`] | `ArxivClient` (reqwest + retry) |

pub mod client;
pub mod feed;
pub mod paper;
pub mod query;

pub use client::ArxivClient;
pub use feed::parse_feed;
pub use paper::Paper;
pub use query::{target_date, SearchQuery};
