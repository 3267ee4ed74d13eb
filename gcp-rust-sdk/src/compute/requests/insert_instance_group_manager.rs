use crate::compute::models::InstanceGroupManager;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertInstanceGroupManagerRequest {
    pub project: String,

    pub zone: String,

    pub instance_group_manager: InstanceGroupManager,
}
