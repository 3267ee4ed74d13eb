use crate::compute::models::InstanceTemplate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertInstanceTemplateRequest {
    pub project: String,

    pub instance_template: InstanceTemplate,
}
