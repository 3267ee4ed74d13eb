use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetInstanceGroupManagerRequest {
    pub project: String,

    pub zone: String,

    pub instance_group_manager: String,
}
