use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user-facing message attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: Option<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), description }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, title: title.into(), description: None }
    }

    pub fn error(title: impl Into<String>, description: Option<String>) -> Self {
        Self { level: NoticeLevel::Error, title: title.into(), description }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
