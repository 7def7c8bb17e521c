//! Legacy-to-current document migration
//!
//! Archived crawler output is a set of legacy XML documents, some of them
//! gzip-compressed. [`Migrator`] walks such a batch, hands out article ids
//! from a starting value, and writes each document in the current schema.
//! Documents that already carry an id pass through without a new one.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, trace, warn};

use crate::current::NewsArticle;
use crate::schema::SchemaVersion;
use crate::xml::{detect_version, parse_legacy_article, parse_news_article};
use crate::{ArchiveError, MigrationConfig, Result};

/// Leading bytes of a gzip stream (RFC 1952)
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check for the gzip magic number
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Turn raw document bytes into text, inflating gzip streams
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    if !is_gzip(bytes) {
        return Ok(String::from_utf8(bytes.to_vec())?);
    }

    let mut decoder = GzDecoder::new(bytes);
    // Pre-allocate: XML typically expands 4-8x
    let mut inflated = Vec::with_capacity(bytes.len() * 4);
    decoder.read_to_end(&mut inflated)?;
    trace!("Inflated {} bytes to {} bytes (gzip)", bytes.len(), inflated.len());
    Ok(String::from_utf8(inflated)?)
}

/// Gzip-compress a document
pub fn encode_gzip(document: &str) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(document.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Convert one legacy XML document into a current-schema XML document
///
/// # Example
///
/// ```
/// use news_archive::{migrate_document, MigrationConfig};
///
/// let legacy = "<newsArticle><title>T</title><body> B </body></newsArticle>";
/// let current = migrate_document(legacy, 12, &MigrationConfig::default()).unwrap();
/// assert!(current.contains("<id>12</id>"));
/// assert!(current.contains("<body>B</body>"));
/// ```
pub fn migrate_document(xml: &str, id: u64, config: &MigrationConfig) -> Result<String> {
    let legacy = parse_legacy_article(xml)?;
    let current = legacy.try_convert_to_current(id, config)?;
    debug!(
        "Migrated {:?} to id {} ({} comments)",
        current.title(),
        id,
        current.comments().len()
    );
    current.to_xml(config)
}

/// Running totals for a [`Migrator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationStats {
    /// Legacy documents converted and assigned a new id
    pub migrated: usize,
    /// Documents that were already in the current schema
    pub already_current: usize,
    /// Documents that could not be decoded, parsed or converted
    pub failed: usize,
    /// Comments converted across all migrated documents
    pub comments_converted: usize,
}

impl MigrationStats {
    /// Total documents seen
    pub fn total(&self) -> usize {
        self.migrated + self.already_current + self.failed
    }
}

/// Result of migrating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedDocument {
    /// Article in the current schema
    pub article: NewsArticle,
    /// Current-schema XML for `article`
    pub xml: String,
    /// Schema the input document was in
    pub source_version: SchemaVersion,
}

/// Batch migrator handing out sequential article ids
///
/// Ids are consumed only by successfully migrated legacy documents, so the
/// ids of a batch are contiguous. Comment ids are positional within each
/// article.
///
/// # Example
///
/// ```
/// use news_archive::{MigrationConfig, Migrator};
///
/// let docs: [&[u8]; 2] = [
///     b"<newsArticle><title>First</title><body>a</body></newsArticle>",
///     b"<newsArticle><title>Second</title><body>b</body></newsArticle>",
/// ];
///
/// let mut migrator = Migrator::new(500, MigrationConfig::default());
/// let results = migrator.migrate_all(docs);
///
/// assert_eq!(results[0].as_ref().unwrap().article.id(), 500);
/// assert_eq!(results[1].as_ref().unwrap().article.id(), 501);
/// assert_eq!(migrator.stats().migrated, 2);
/// assert_eq!(migrator.next_id(), Some(502));
/// ```
#[derive(Debug, Clone)]
pub struct Migrator {
    config: MigrationConfig,
    next_id: Option<u64>,
    stats: MigrationStats,
}

impl Migrator {
    /// Create a migrator whose first legacy document gets `first_id`
    pub fn new(first_id: u64, config: MigrationConfig) -> Self {
        Self {
            config,
            next_id: Some(first_id),
            stats: MigrationStats::default(),
        }
    }

    /// Id the next legacy document will receive, `None` once `u64::MAX`
    /// has been handed out
    pub fn next_id(&self) -> Option<u64> {
        self.next_id
    }

    pub fn stats(&self) -> &MigrationStats {
        &self.stats
    }

    /// Settings applied to every document
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrate one document (plain or gzip-compressed XML)
    pub fn migrate(&mut self, document: &[u8]) -> Result<MigratedDocument> {
        match self.migrate_inner(document) {
            Ok(migrated) => {
                match migrated.source_version {
                    SchemaVersion::Legacy => {
                        self.stats.migrated += 1;
                        self.stats.comments_converted += migrated.article.comments().len();
                    }
                    SchemaVersion::Current => self.stats.already_current += 1,
                }
                Ok(migrated)
            }
            Err(e) => {
                warn!("Document migration failed: {}", e);
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    /// Migrate every document in order, one result per document
    pub fn migrate_all<'a, I>(&mut self, documents: I) -> Vec<Result<MigratedDocument>>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let results: Vec<_> = documents.into_iter().map(|d| self.migrate(d)).collect();
        debug!(
            "Batch finished: {} migrated, {} already current, {} failed",
            self.stats.migrated, self.stats.already_current, self.stats.failed
        );
        results
    }

    fn migrate_inner(&mut self, document: &[u8]) -> Result<MigratedDocument> {
        let xml = decode_document(document)?;

        match detect_version(&xml)? {
            SchemaVersion::Current => {
                let article = parse_news_article(&xml)?;
                trace!("Document id {} already in current schema", article.id());
                let xml = article.to_xml(&self.config)?;
                Ok(MigratedDocument {
                    article,
                    xml,
                    source_version: SchemaVersion::Current,
                })
            }
            SchemaVersion::Legacy => {
                let id = self.next_id.ok_or_else(|| ArchiveError::InvalidValue {
                    field: "id",
                    value: "no identifiers left after u64::MAX".to_string(),
                })?;

                let legacy = parse_legacy_article(&xml)?;
                let article = legacy.try_convert_to_current(id, &self.config)?;
                let xml = article.to_xml(&self.config)?;

                self.next_id = id.checked_add(1);
                Ok(MigratedDocument {
                    article,
                    xml,
                    source_version: SchemaVersion::Legacy,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LegacyArticle, LegacyComment, MissingBodyPolicy};

    fn legacy_xml(title: &str, comments: usize) -> String {
        let comments = (0..comments)
            .map(|i| LegacyComment::new(format!("comment {i}")))
            .collect();
        LegacyArticle::new(title, " body ", comments)
            .to_xml(&MigrationConfig::default())
            .unwrap()
    }

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(&[0x1f, 0x8b, 0x08]));
        assert!(!is_gzip(b"<newsArticle/>"));
        assert!(!is_gzip(&[0x1f]));
        assert!(!is_gzip(&[]));
    }

    #[test]
    fn test_decode_plain_and_gzip() {
        let xml = legacy_xml("T", 1);
        assert_eq!(decode_document(xml.as_bytes()).unwrap(), xml);

        let compressed = encode_gzip(&xml).unwrap();
        assert!(is_gzip(&compressed));
        assert_eq!(decode_document(&compressed).unwrap(), xml);
    }

    #[test]
    fn test_decode_rejects_bad_bytes() {
        assert!(matches!(
            decode_document(&[0xff, 0xfe, 0x00]),
            Err(ArchiveError::Utf8(_))
        ));
        // Valid magic, truncated stream
        assert!(matches!(
            decode_document(&[0x1f, 0x8b, 0x08, 0x00]),
            Err(ArchiveError::Io(_))
        ));
    }

    #[test]
    fn test_migrate_document() {
        let xml = legacy_xml("T", 2);
        let migrated = migrate_document(&xml, 9, &MigrationConfig::default()).unwrap();
        let article = parse_news_article(&migrated).unwrap();
        assert_eq!(article.id(), 9);
        assert_eq!(article.body(), "body");
        assert_eq!(article.comments()[1].id(), 1);
    }

    #[test]
    fn test_migrate_document_strict_missing_body() {
        let xml = "<newsArticle><title>T</title></newsArticle>";
        assert!(matches!(
            migrate_document(xml, 1, &MigrationConfig::strict()),
            Err(ArchiveError::MissingField("body"))
        ));
    }

    #[test]
    fn test_migrator_sequential_ids() {
        let docs = [legacy_xml("a", 0), legacy_xml("b", 3), legacy_xml("c", 1)];
        let mut migrator = Migrator::new(100, MigrationConfig::default());
        let results = migrator.migrate_all(docs.iter().map(|d| d.as_bytes()));

        let ids: Vec<u64> = results
            .iter()
            .map(|r| r.as_ref().unwrap().article.id())
            .collect();
        assert_eq!(ids, vec![100, 101, 102]);
        assert_eq!(migrator.next_id(), Some(103));
        assert_eq!(migrator.stats().migrated, 3);
        assert_eq!(migrator.stats().comments_converted, 4);
    }

    #[test]
    fn test_migrator_failures_do_not_consume_ids() {
        let good = legacy_xml("good", 0);
        let docs: Vec<&[u8]> = vec![&b"<broken"[..], good.as_bytes(), &b"<other/>"[..]];
        let mut migrator = Migrator::new(1, MigrationConfig::default());
        let results = migrator.migrate_all(docs);

        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().article.id(), 1);
        assert!(matches!(results[2], Err(ArchiveError::UnexpectedRoot { .. })));
        assert_eq!(migrator.next_id(), Some(2));
        assert_eq!(migrator.stats().failed, 2);
        assert_eq!(migrator.stats().total(), 3);
    }

    #[test]
    fn test_migrator_passes_current_documents_through() {
        let current = LegacyArticle::new("T", "B", vec![LegacyComment::new("c")])
            .convert_to_current(42)
            .to_xml(&MigrationConfig::default())
            .unwrap();
        let mut migrator = Migrator::new(1, MigrationConfig::default());
        let migrated = migrator.migrate(current.as_bytes()).unwrap();

        assert_eq!(migrated.source_version, SchemaVersion::Current);
        assert_eq!(migrated.article.id(), 42);
        assert_eq!(migrated.xml, current);
        assert_eq!(migrator.next_id(), Some(1));
        assert_eq!(migrator.stats().already_current, 1);
    }

    #[test]
    fn test_migrator_gzip_input() {
        let compressed = encode_gzip(&legacy_xml("zipped", 1)).unwrap();
        let mut migrator = Migrator::new(7, MigrationConfig::default());
        let migrated = migrator.migrate(&compressed).unwrap();
        assert_eq!(migrated.article.title(), "zipped");
        assert_eq!(migrated.article.id(), 7);
    }

    #[test]
    fn test_migrator_hands_out_last_id() {
        let xml = legacy_xml("T", 0);
        let mut migrator = Migrator::new(u64::MAX - 1, MigrationConfig::default());

        let first = migrator.migrate(xml.as_bytes()).unwrap();
        assert_eq!(first.article.id(), u64::MAX - 1);
        let last = migrator.migrate(xml.as_bytes()).unwrap();
        assert_eq!(last.article.id(), u64::MAX);
        assert_eq!(migrator.next_id(), None);

        let result = migrator.migrate(xml.as_bytes());
        assert!(matches!(result, Err(ArchiveError::InvalidValue { field: "id", .. })));
        assert_eq!(migrator.stats().migrated, 2);
        assert_eq!(migrator.stats().failed, 1);
    }

    #[test]
    fn test_migrator_exhausted_still_passes_current_through() {
        let current = LegacyArticle::new("T", "B", vec![])
            .convert_to_current(3)
            .to_xml(&MigrationConfig::default())
            .unwrap();
        let mut migrator = Migrator::new(u64::MAX, MigrationConfig::default());
        migrator.migrate(legacy_xml("T", 0).as_bytes()).unwrap();

        let migrated = migrator.migrate(current.as_bytes()).unwrap();
        assert_eq!(migrated.article.id(), 3);
        assert_eq!(migrator.next_id(), None);
    }

    #[test]
    fn test_migrator_uses_its_config() {
        let mut migrator = Migrator::new(1, MigrationConfig::strict());
        assert_eq!(migrator.config().missing_body, MissingBodyPolicy::Reject);

        let result = migrator.migrate(b"<newsArticle><title>T</title></newsArticle>");
        assert!(matches!(result, Err(ArchiveError::MissingField("body"))));
        assert_eq!(migrator.next_id(), Some(1));
    }
}
