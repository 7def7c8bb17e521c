//! Builder for legacy article records
//!
//! Setters accept any text without validation, matching how crawled
//! records were populated field by field.

use super::types::{LegacyArticle, LegacyComment};

#[must_use]
#[derive(Debug, Clone, Default)]
pub struct LegacyArticleBuilder {
    author: Option<String>,
    date: Option<String>,
    title: String,
    body: Option<String>,
    url: Option<String>,
    comments: Vec<LegacyComment>,
}

impl LegacyArticleBuilder {
    /// Create a builder with no fields set and no comments
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the date text (stored unparsed)
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body (stored untrimmed)
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the source URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Clear the author
    pub fn clear_author(mut self) -> Self {
        self.author = None;
        self
    }

    /// Clear the date
    pub fn clear_date(mut self) -> Self {
        self.date = None;
        self
    }

    /// Clear the body
    pub fn clear_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Clear the URL
    pub fn clear_url(mut self) -> Self {
        self.url = None;
        self
    }

    /// Replace the whole comment sequence
    pub fn comments(mut self, comments: Vec<LegacyComment>) -> Self {
        self.comments = comments;
        self
    }

    /// Append a comment to the end of the sequence
    pub fn add_comment(mut self, comment: LegacyComment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Finish the record
    pub fn build(self) -> LegacyArticle {
        LegacyArticle {
            author: self.author,
            date: self.date,
            title: self.title,
            body: self.body,
            url: self.url,
            comments: self.comments,
        }
    }
}

impl From<LegacyArticle> for LegacyArticleBuilder {
    fn from(article: LegacyArticle) -> Self {
        Self {
            author: article.author,
            date: article.date,
            title: article.title,
            body: article.body,
            url: article.url,
            comments: article.comments,
        }
    }
}
