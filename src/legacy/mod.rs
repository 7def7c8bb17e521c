//! Legacy (crawler) article schema
//!
//! Records as the crawler wrote them: no identifiers, optional metadata,
//! and an ordered comment sequence.
//!
//! This module is organized into:
//! - `types`: record definitions and conversion into the current schema
//! - `builder`: LegacyArticleBuilder for populating records field by field
//! - `render`: plain-text and debug-summary rendering

mod builder;
mod render;
mod types;

pub use self::builder::LegacyArticleBuilder;
pub use self::types::{LegacyArticle, LegacyComment};
