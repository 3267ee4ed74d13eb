use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetImageRequest {
    /// Project owning the image, not necessarily the project being
    /// provisioned (public images live in projects like `ubuntu-os-cloud`).
    pub project: String,

    pub image: String,
}
