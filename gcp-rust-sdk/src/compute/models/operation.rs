use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A long-running compute operation. Insert calls return one of these; it
/// must be waited to `DONE` before the target resource is usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(
        default,
        with = "super::uint64_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,

    pub name: String,

    pub status: OperationStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_error_status_code: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_time: Option<DateTime<Utc>>,
}

impl Operation {
    /// All error messages joined, `None` when the operation succeeded.
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        let messages: Vec<&str> = error
            .errors
            .iter()
            .filter_map(|detail| detail.message.as_deref())
            .collect();

        if messages.is_empty() {
            Some("operation failed without an error message".to_string())
        } else {
            Some(messages.join("; "))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Done => write!(f, "DONE"),
        }
    }
}
