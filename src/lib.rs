#![doc = include_str!("../README.md")]

mod config;
/// Current-schema article and comment records
pub mod current;
/// Lenient interpretation of stored date text
pub mod dates;
mod error;
/// Legacy (crawler) article schema
pub mod legacy;
/// Legacy-to-current document migration
pub mod migrate;
/// Versioned XML element mapping
pub mod schema;
/// XML interchange for article records
pub mod xml;

pub use config::{
    DEFAULT_SUMMARY_BODY_LIMIT, DEFAULT_SUMMARY_ELLIPSIS, MigrationConfig, MissingBodyPolicy,
};
pub use current::{Comment, NewsArticle};
pub use error::{ArchiveError, Result};
pub use legacy::{LegacyArticle, LegacyArticleBuilder, LegacyComment};
pub use migrate::{
    MigratedDocument, MigrationStats, Migrator, decode_document, encode_gzip, migrate_document,
};
pub use schema::{ArticleSchema, SchemaVersion};
pub use xml::{detect_version, parse_legacy_article, parse_news_article};
