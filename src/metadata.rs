//! Project metadata and author resolution.

use crate::error::{Result, TomlgenError};
use toml_edit::Array;

/// Metadata of the host project copied into every manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub version: String,
    pub author: Option<String>,
    pub author_email: Option<String>,
}

/// Author list written to `package.authors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authors(Vec<String>);

impl Authors {
    pub fn new(authors: Vec<String>) -> Self {
        Self(authors)
    }

    /// Parses a multi-line author list, one author per line.
    ///
    /// Lines are trimmed and blank lines dropped. A line wrapped in matching
    /// quotes has one layer of quotes removed, so both of these work:
    ///
    /// ```toml
    /// authors = """
    /// "A. Dev <a@x.com>"
    /// B. Dev <b@x.com>
    /// """
    /// ```
    pub fn from_lines(list: &str) -> Self {
        Self(
            list.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| unquote(line).to_string())
                .collect(),
        )
    }

    /// Builds the single `"author <email>"` entry from project metadata.
    ///
    /// # Errors
    ///
    /// `MissingMetadata` if the project has no author.
    pub fn from_metadata(metadata: &ProjectMetadata) -> Result<Self> {
        let author = metadata
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(TomlgenError::MissingMetadata("author"))?;

        let email = metadata
            .author_email
            .as_deref()
            .map(|e| e.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|e| !e.is_empty());

        let entry = match email {
            Some(email) => format!("{} <{}>", author, email),
            None => author.to_string(),
        };

        Ok(Self(vec![entry]))
    }

    /// Explicit list if given, otherwise derived from project metadata.
    pub fn resolve(explicit: Option<Authors>, metadata: &ProjectMetadata) -> Result<Self> {
        match explicit {
            Some(authors) => Ok(authors),
            None => Self::from_metadata(metadata),
        }
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_array(&self) -> Array {
        self.0.iter().map(String::as_str).collect()
    }
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
