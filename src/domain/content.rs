//! Content lifecycle vocabulary shared with the publishing platform.

use serde::{Deserialize, Serialize};

/// Publication status of a content item as reported by the platform.
///
/// The platform sends free-form status strings; [`ContentStatus::parse`] maps
/// them onto this closed set so the only comparison the dispatcher performs
/// (`Published` versus anything else) is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Pending,
    Scheduled,
    Private,
    Published,
    Trashed,
    Unknown,
}

impl ContentStatus {
    /// Total parse; unrecognized status strings become [`Self::Unknown`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "publish" | "published" => Self::Published,
            "draft" | "auto-draft" => Self::Draft,
            "pending" => Self::Pending,
            "future" | "scheduled" => Self::Scheduled,
            "private" => Self::Private,
            "trash" | "trashed" => Self::Trashed,
            _ => Self::Unknown,
        }
    }

    pub fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Private => "private",
            Self::Published => "published",
            Self::Trashed => "trashed",
            Self::Unknown => "unknown",
        }
    }
}

/// Kind of content item; only regular posts participate in purge dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Post,
    Page,
    Attachment,
    Revision,
    Other,
}

impl ContentKind {
    /// Total parse; unrecognized kinds become [`Self::Other`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "post" | "article" => Self::Post,
            "page" => Self::Page,
            "attachment" => Self::Attachment,
            "revision" => Self::Revision,
            _ => Self::Other,
        }
    }

    pub fn is_post(self) -> bool {
        matches!(self, Self::Post)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Attachment => "attachment",
            Self::Revision => "revision",
            Self::Other => "other",
        }
    }
}

/// Identity and addressing of the content item a lifecycle event refers to.
#[derive(Debug, Clone)]
pub struct ContentRef {
    pub id: String,
    pub kind: ContentKind,
    pub permalink: Option<String>,
}
