use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(
        default,
        with = "super::uint64_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,

    pub name: String,

    pub self_link: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(
        default,
        with = "super::int64_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_size_gb: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}
