use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::DEFAULT_URL_TEMPLATE;

/// Placeholder replaced with the file's display name.
pub const FILENAME_PLACEHOLDER: &str = "{filename}";

/// Placeholder replaced with the chunk's progress percent.
pub const PROGRESS_PLACEHOLDER: &str = "{progress}";

/// Request URL pattern with `{filename}` and `{progress}` placeholders.
///
/// Substitution is literal: the file name is inserted unescaped and the
/// percent as a bare decimal integer. Values are inserted in a single pass,
/// so a file name that itself contains `{progress}` is not expanded again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The raw pattern.
    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Renders the URL for one chunk.
    pub fn render(&self, filename: &str, progress: u8) -> String {
        let mut out = String::with_capacity(self.0.len() + filename.len());
        let mut rest = self.0.as_str();

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix(FILENAME_PLACEHOLDER) {
                out.push_str(filename);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(PROGRESS_PLACEHOLDER) {
                let _ = write!(out, "{progress}");
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE)
    }
}

impl From<&str> for UrlTemplate {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for UrlTemplate {
    fn from(pattern: String) -> Self {
        Self(pattern)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
