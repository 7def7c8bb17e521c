//! Legacy record definitions and conversion into the current schema

use tracing::{debug, trace};

use super::builder::LegacyArticleBuilder;
use crate::config::body_or_empty;
use crate::current::{Comment, NewsArticle};
use crate::{MigrationConfig, Result};

/// News article in the legacy (crawler) schema
///
/// Legacy records carry no identifier. Identity is assigned by the caller
/// when the record is converted with [`convert_to_current`](Self::convert_to_current).
///
/// The record is immutable once built. Use [`LegacyArticleBuilder`] to set
/// fields, or [`into_builder`](Self::into_builder) to change an existing record.
///
/// # Examples
///
/// ```
/// use news_archive::{LegacyArticle, LegacyComment};
///
/// let article = LegacyArticle::builder()
///     .title("Budget passed")
///     .body("  The budget was passed today.  ")
///     .author("Staff writer")
///     .add_comment(LegacyComment::new("Finally."))
///     .add_comment(LegacyComment::new("About time."))
///     .build();
///
/// let current = article.convert_to_current(1001);
/// assert_eq!(current.id(), 1001);
/// assert_eq!(current.body(), "The budget was passed today.");
/// assert_eq!(current.comments()[1].id(), 1);
///
/// // The legacy record keeps its untrimmed body
/// assert_eq!(article.body(), Some("  The budget was passed today.  "));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegacyArticle {
    pub(super) author: Option<String>,
    pub(super) date: Option<String>,
    pub(super) title: String,
    pub(super) body: Option<String>,
    pub(super) url: Option<String>,
    pub(super) comments: Vec<LegacyComment>,
}

/// Comment in the legacy schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegacyComment {
    author: Option<String>,
    date: Option<String>,
    body: String,
}

impl LegacyArticle {
    /// Create an article from title, body and comments
    ///
    /// Author, date and URL start unset.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        comments: Vec<LegacyComment>,
    ) -> Self {
        Self {
            title: title.into(),
            body: Some(body.into()),
            comments,
            ..Self::default()
        }
    }

    /// Start building an empty article
    pub fn builder() -> LegacyArticleBuilder {
        LegacyArticleBuilder::new()
    }

    /// Turn this record back into a builder holding the same fields
    pub fn into_builder(self) -> LegacyArticleBuilder {
        LegacyArticleBuilder::from(self)
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Article text exactly as stored, untrimmed
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Comments in insertion order
    pub fn comments(&self) -> &[LegacyComment] {
        &self.comments
    }

    /// Convert to the current schema under `id`
    ///
    /// Each comment is converted with its zero-based position as its new
    /// identifier. Identifiers are not carried over between schema versions;
    /// they are reassigned from sequence position on every conversion.
    /// The body is trimmed of surrounding whitespace. An unset body becomes
    /// empty text.
    pub fn convert_to_current(&self, id: u64) -> NewsArticle {
        self.convert(id, body_or_empty(self.body.as_deref()))
    }

    /// Convert to the current schema, applying the config's missing-body policy
    ///
    /// Fails with [`ArchiveError::MissingField`](crate::ArchiveError::MissingField)
    /// when the body is unset and the policy is
    /// [`Reject`](crate::MissingBodyPolicy::Reject).
    pub fn try_convert_to_current(&self, id: u64, config: &MigrationConfig) -> Result<NewsArticle> {
        let body = config.resolve_body(self.body.as_deref())?;
        Ok(self.convert(id, body))
    }

    fn convert(&self, id: u64, body: &str) -> NewsArticle {
        debug!(
            "Converting legacy article {:?} to id {} ({} comments)",
            self.title,
            id,
            self.comments.len()
        );

        let comments = self
            .comments
            .iter()
            .zip(0u64..)
            .map(|(comment, index)| comment.convert_to_current(index))
            .collect();

        let mut article = NewsArticle::new(id, self.title.clone(), body.trim(), comments);
        article.set_author(self.author.clone());
        article.set_date(self.date.clone());
        article.set_url(self.url.clone());
        article
    }
}

impl LegacyComment {
    /// Create a comment with only a body
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            author: None,
            date: None,
            body: body.into(),
        }
    }

    /// Set the author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the date text
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Convert to the current schema with `index` as the new identifier
    pub fn convert_to_current(&self, index: u64) -> Comment {
        trace!("Converting legacy comment at position {}", index);
        Comment::new(
            index,
            self.author.clone(),
            self.date.clone(),
            self.body.trim(),
        )
    }
}
