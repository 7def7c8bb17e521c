//! Plain-text rendering of legacy records
//!
//! Comment blocks are separated from what precedes them by two blank-line
//! breaks (`"\n\n"`). No rendering adds a trailing separator after the last
//! comment.

use super::types::{LegacyArticle, LegacyComment};
use crate::config::body_or_empty;
use crate::{MigrationConfig, Result};

const COMMENT_SEPARATOR: &str = "\n\n";

impl LegacyArticle {
    /// Render title, body and every comment as plain text
    ///
    /// # Examples
    ///
    /// ```
    /// use news_archive::{LegacyArticle, LegacyComment};
    ///
    /// let article = LegacyArticle::new("T", "B", vec![]);
    /// assert_eq!(article.render_full_text(), "T\nB\n");
    ///
    /// let article = LegacyArticle::new("T", "B", vec![LegacyComment::new("C")]);
    /// assert_eq!(article.render_full_text(), "T\nB\n\n\nC");
    /// ```
    pub fn render_full_text(&self) -> String {
        let body = body_or_empty(self.body.as_deref());
        let mut text = String::with_capacity(self.title.len() + body.len() + 2);
        text.push_str(&self.title);
        text.push('\n');
        text.push_str(body);
        text.push('\n');
        self.push_comments(&mut text);
        text
    }

    /// Render the title followed by every comment, leaving out the body
    pub fn render_comments_only_text(&self) -> String {
        let mut text = String::with_capacity(self.title.len() + 1);
        text.push_str(&self.title);
        text.push('\n');
        self.push_comments(&mut text);
        text
    }

    fn push_comments(&self, text: &mut String) {
        for comment in &self.comments {
            text.push_str(COMMENT_SEPARATOR);
            text.push_str(&comment.render_plain_text());
        }
    }

    /// Multi-line summary for logs and debugging
    ///
    /// Lines: author, date, title, body, `# comments: N`. Bodies of 100 or
    /// more characters are cut to their first 100 characters followed by
    /// `.....`. Unset author, date and body render as empty text.
    ///
    /// # Examples
    ///
    /// ```
    /// use news_archive::LegacyArticle;
    ///
    /// let article = LegacyArticle::builder()
    ///     .author("Staff writer")
    ///     .date("2016-03-01")
    ///     .title("Budget passed")
    ///     .body("x".repeat(150))
    ///     .build();
    ///
    /// let summary = article.debug_summary();
    /// let lines: Vec<&str> = summary.lines().collect();
    /// assert_eq!(lines[3], format!("{}.....", "x".repeat(100)));
    /// assert_eq!(lines[4], "# comments: 0");
    /// ```
    pub fn debug_summary(&self) -> String {
        let config = MigrationConfig::lenient();
        let body = body_or_empty(self.body.as_deref());
        self.summarize(body, &config)
    }

    /// Summary using the config's truncation settings and missing-body policy
    pub fn try_debug_summary(&self, config: &MigrationConfig) -> Result<String> {
        let body = config.resolve_body(self.body.as_deref())?;
        Ok(self.summarize(body, config))
    }

    fn summarize(&self, body: &str, config: &MigrationConfig) -> String {
        let mut text = String::new();
        for line in [
            self.author.as_deref().unwrap_or_default(),
            self.date.as_deref().unwrap_or_default(),
            self.title.as_str(),
        ] {
            text.push_str(line);
            text.push('\n');
        }
        push_truncated(
            &mut text,
            body,
            config.summary_body_limit,
            &config.summary_ellipsis,
        );
        text.push_str(&format!("\n# comments: {}", self.comments.len()));
        text
    }
}

/// Append `body`, cut to `limit` characters plus `ellipsis` when it has at
/// least `limit` characters
fn push_truncated(text: &mut String, body: &str, limit: usize, ellipsis: &str) {
    if body.chars().count() < limit {
        text.push_str(body);
        return;
    }
    let cut = body
        .char_indices()
        .nth(limit)
        .map_or(body.len(), |(idx, _)| idx);
    text.push_str(&body[..cut]);
    text.push_str(ellipsis);
}

impl LegacyComment {
    /// Render this comment as a self-contained text block
    ///
    /// A header line `author (date)` comes first, built from whichever of
    /// the two are set, and is left out when neither is. No trailing newline.
    ///
    /// ```
    /// use news_archive::LegacyComment;
    ///
    /// assert_eq!(LegacyComment::new("Agreed").render_plain_text(), "Agreed");
    /// assert_eq!(
    ///     LegacyComment::new("Agreed").with_author("kamal").render_plain_text(),
    ///     "kamal\nAgreed"
    /// );
    /// ```
    pub fn render_plain_text(&self) -> String {
        let header = match (self.author(), self.date()) {
            (Some(author), Some(date)) => Some(format!("{author} ({date})")),
            (Some(author), None) => Some(author.to_string()),
            (None, Some(date)) => Some(format!("({date})")),
            (None, None) => None,
        };
        match header {
            Some(header) => format!("{header}\n{}", self.body()),
            None => self.body().to_string(),
        }
    }
}
