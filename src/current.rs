//! Current-schema records
//!
//! Conversion targets for [`LegacyArticle`](crate::LegacyArticle). Unlike the
//! legacy shape, every article carries a caller-assigned identifier and every
//! comment carries its position in the article's comment sequence.

use chrono::{DateTime, Utc};

use crate::dates::parse_date;

/// News article in the current schema
///
/// # Examples
///
/// ```
/// use news_archive::{Comment, NewsArticle};
///
/// let comments = vec![Comment::new(0, Some("reader".to_string()), None, "First!")];
/// let mut article = NewsArticle::new(42, "Headline", "Article text", comments);
/// article.set_author(Some("Staff writer".to_string()));
///
/// assert_eq!(article.id(), 42);
/// assert_eq!(article.author(), Some("Staff writer"));
/// assert_eq!(article.comments()[0].id(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewsArticle {
    id: u64,
    title: String,
    body: String,
    comments: Vec<Comment>,
    author: Option<String>,
    date: Option<String>,
    url: Option<String>,
}

impl NewsArticle {
    /// Create an article from its primary attributes
    ///
    /// Author, date and URL are secondary attributes and start unset.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        body: impl Into<String>,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            comments,
            author: None,
            date: None,
            url: None,
        }
    }

    /// Caller-assigned identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Headline
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Article text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Comments in display order
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Author name
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Unparsed date text
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Source URL
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_author(&mut self, author: Option<String>) {
        self.author = author;
    }

    pub fn set_date(&mut self, date: Option<String>) {
        self.date = date;
    }

    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    /// Interpret the date text as a timestamp
    ///
    /// Returns `None` when the date is unset or in an unrecognised format.
    /// See [`parse_date`] for accepted formats.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(|d| parse_date(d).ok())
    }
}

/// Comment in the current schema
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    id: u64,
    author: Option<String>,
    date: Option<String>,
    body: String,
}

impl Comment {
    /// Create a comment
    pub fn new(
        id: u64,
        author: Option<String>,
        date: Option<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            author,
            date,
            body: body.into(),
        }
    }

    /// Position of this comment in its article at conversion time
    pub fn id(&self) -> u64 {
        self.id
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

    /// Interpret the date text as a timestamp, `None` if unset or unrecognised
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(|d| parse_date(d).ok())
    }
}
