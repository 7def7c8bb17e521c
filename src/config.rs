//! Migration and rendering configuration

/// Default number of body characters kept by the debug summary
pub const DEFAULT_SUMMARY_BODY_LIMIT: usize = 100;

/// Default marker appended to a truncated summary body
pub const DEFAULT_SUMMARY_ELLIPSIS: &str = ".....";

/// What to do when an article has no body at conversion or summary time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MissingBodyPolicy {
    /// Treat the unset body as empty text
    #[default]
    TreatAsEmpty,
    /// Fail with [`ArchiveError::MissingField`](crate::ArchiveError::MissingField)
    Reject,
}

/// Configuration for converting, summarising and writing articles
///
/// # Example
///
/// ```
/// use news_archive::{MigrationConfig, MissingBodyPolicy};
///
/// // Lenient (default): unset bodies become empty text
/// let config = MigrationConfig::default();
/// assert_eq!(config.missing_body, MissingBodyPolicy::TreatAsEmpty);
///
/// // Strict: unset bodies are reported as errors
/// let config = MigrationConfig::strict();
/// assert_eq!(config.missing_body, MissingBodyPolicy::Reject);
///
/// // Or construct manually
/// let config = MigrationConfig {
///     missing_body: MissingBodyPolicy::TreatAsEmpty,
///     summary_body_limit: 40,
///     summary_ellipsis: "...".to_string(),
///     indent_xml: false,
/// };
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MigrationConfig {
    /// Handling of an unset body
    #[cfg_attr(feature = "serde", serde(default))]
    pub missing_body: MissingBodyPolicy,

    /// Body characters (not bytes) kept by the debug summary.
    /// Bodies at or above this length are cut and get the ellipsis.
    #[cfg_attr(feature = "serde", serde(default = "default_summary_body_limit"))]
    pub summary_body_limit: usize,

    /// Marker appended to a truncated summary body
    #[cfg_attr(feature = "serde", serde(default = "default_summary_ellipsis"))]
    pub summary_ellipsis: String,

    /// Indent written XML documents
    #[cfg_attr(feature = "serde", serde(default = "default_indent_xml"))]
    pub indent_xml: bool,
}

#[cfg(feature = "serde")]
fn default_summary_body_limit() -> usize {
    DEFAULT_SUMMARY_BODY_LIMIT
}

#[cfg(feature = "serde")]
fn default_summary_ellipsis() -> String {
    DEFAULT_SUMMARY_ELLIPSIS.to_string()
}

#[cfg(feature = "serde")]
fn default_indent_xml() -> bool {
    true
}

impl MigrationConfig {
    /// Lenient configuration: unset bodies are treated as empty text
    pub fn lenient() -> Self {
        Self {
            missing_body: MissingBodyPolicy::TreatAsEmpty,
            summary_body_limit: DEFAULT_SUMMARY_BODY_LIMIT,
            summary_ellipsis: DEFAULT_SUMMARY_ELLIPSIS.to_string(),
            indent_xml: true,
        }
    }

    /// Strict configuration: unset bodies fail with a missing field error
    pub fn strict() -> Self {
        Self {
            missing_body: MissingBodyPolicy::Reject,
            ..Self::lenient()
        }
    }

    /// Resolve an optional body according to [`missing_body`](Self::missing_body)
    pub(crate) fn resolve_body<'a>(&self, body: Option<&'a str>) -> crate::Result<&'a str> {
        match (body, self.missing_body) {
            (Some(body), _) => Ok(body),
            (None, MissingBodyPolicy::TreatAsEmpty) => Ok(body_or_empty(None)),
            (None, MissingBodyPolicy::Reject) => Err(crate::ArchiveError::MissingField("body")),
        }
    }
}

/// Unset bodies read as empty text, with a warning
pub(crate) fn body_or_empty(body: Option<&str>) -> &str {
    body.unwrap_or_else(|| {
        tracing::warn!("Article body is unset, treating it as empty");
        ""
    })
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::lenient()
    }
}
