//! Versioned XML element mapping
//!
//! Each schema version carries an explicit table from record fields to
//! element names. Readers and writers go through these tables only, so the
//! interchange format does not depend on Rust field names.

use crate::{ArchiveError, Result};

/// Schema version of an article document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaVersion {
    /// Crawler schema without identifiers
    Legacy,
    /// Schema with caller-assigned article ids and positional comment ids
    Current,
}

/// Scalar fields of an article record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleField {
    /// Numeric identifier (current schema only)
    Id,
    /// Author name
    Author,
    /// Unparsed date text
    Date,
    /// Headline
    Title,
    /// Article text
    Body,
    /// Source URL
    Url,
}

/// Scalar fields of a comment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentField {
    /// Positional identifier (current schema only)
    Id,
    /// Comment author
    Author,
    /// Unparsed date text
    Date,
    /// Comment text
    Body,
}

/// Element names for one schema version
///
/// Field tables are ordered; writers emit elements in table order and put
/// the comment wrapper after the last scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleSchema {
    /// Version described by this table
    pub version: SchemaVersion,
    /// Root element of an article document
    pub root: &'static str,
    /// Article field to element name
    pub article_fields: &'static [(ArticleField, &'static str)],
    /// Container element wrapping the comment sequence
    pub comments_wrapper: &'static str,
    /// Element for each comment inside the wrapper
    pub comment: &'static str,
    /// Comment field to element name
    pub comment_fields: &'static [(CommentField, &'static str)],
}

/// Crawler schema: `<newsArticle>` with a `<comments>` wrapper of `<comment>` items
pub const LEGACY_SCHEMA: ArticleSchema = ArticleSchema {
    version: SchemaVersion::Legacy,
    root: "newsArticle",
    article_fields: &[
        (ArticleField::Author, "author"),
        (ArticleField::Date, "date"),
        (ArticleField::Title, "title"),
        (ArticleField::Body, "body"),
        (ArticleField::Url, "url"),
    ],
    comments_wrapper: "comments",
    comment: "comment",
    comment_fields: &[
        (CommentField::Author, "author"),
        (CommentField::Date, "date"),
        (CommentField::Body, "body"),
    ],
};

/// Current schema: the legacy layout plus `<id>` on articles and comments
pub const CURRENT_SCHEMA: ArticleSchema = ArticleSchema {
    version: SchemaVersion::Current,
    root: "newsArticle",
    article_fields: &[
        (ArticleField::Id, "id"),
        (ArticleField::Author, "author"),
        (ArticleField::Date, "date"),
        (ArticleField::Title, "title"),
        (ArticleField::Body, "body"),
        (ArticleField::Url, "url"),
    ],
    comments_wrapper: "comments",
    comment: "comment",
    comment_fields: &[
        (CommentField::Id, "id"),
        (CommentField::Author, "author"),
        (CommentField::Date, "date"),
        (CommentField::Body, "body"),
    ],
};

impl ArticleSchema {
    /// Mapping table for a schema version
    pub fn for_version(version: SchemaVersion) -> &'static ArticleSchema {
        match version {
            SchemaVersion::Legacy => &LEGACY_SCHEMA,
            SchemaVersion::Current => &CURRENT_SCHEMA,
        }
    }

    /// Element name of an article field, `None` if this version lacks it
    pub fn article_element(&self, field: ArticleField) -> Option<&'static str> {
        self.article_fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, name)| *name)
    }

    /// Article field stored in the element `name`
    pub fn article_field(&self, name: &str) -> Option<ArticleField> {
        self.article_fields
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(f, _)| *f)
    }

    /// Element name of a comment field, `None` if this version lacks it
    pub fn comment_element(&self, field: CommentField) -> Option<&'static str> {
        self.comment_fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, name)| *name)
    }

    /// Comment field stored in the element `name`
    pub fn comment_field(&self, name: &str) -> Option<CommentField> {
        self.comment_fields
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(f, _)| *f)
    }

    /// Check that `name` is this schema's root element
    pub fn check_root(&self, name: &str) -> Result<()> {
        if name == self.root {
            Ok(())
        } else {
            Err(ArchiveError::UnexpectedRoot {
                expected: self.root,
                found: name.to_string(),
            })
        }
    }
}
