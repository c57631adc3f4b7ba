//! Wiki listing types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single entry from a `categorymembers` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiItem {
    /// Page ID on the wiki
    #[serde(rename = "pageid")]
    pub page_id: i64,

    /// Namespace number (6 = File, 14 = Category)
    #[serde(rename = "ns")]
    pub namespace: i64,

    /// Full title including the namespace prefix
    pub title: String,
}

/// Pairs a wiki file title with the key used for the generated identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Full file title (e.g. `File:Abyssal whip.png`)
    pub file_title: String,

    /// Title without namespace prefix and extension (e.g. `Abyssal whip`)
    pub key: String,
}

/// Member type filter for `categorymembers` (`cmtype`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Page,
    File,
    Subcat,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberType::Page => "page",
            MemberType::File => "file",
            MemberType::Subcat => "subcat",
        }
    }
}

impl Default for MemberType {
    fn default() -> Self {
        Self::Page
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a category listing
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<WikiItem>,

    /// Continuation token for the next page, if any
    pub continue_token: Option<String>,
}

/// A resolved file title with its download URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub title: String,
    pub url: String,
}
