use crate::compute::models::ManagedInstance;
use serde::{Deserialize, Serialize};

pub struct ListManagedInstancesRequestRequiredFields {
    pub project: String,
    pub zone: String,
    pub instance_group_manager: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListManagedInstancesRequest {
    pub project: String,

    pub zone: String,

    pub instance_group_manager: String,

    pub max_results: Option<u32>,

    pub page_token: Option<String>,
}

impl ListManagedInstancesRequest {
    pub fn builder(
        required: ListManagedInstancesRequestRequiredFields,
    ) -> ListManagedInstancesRequestBuilder {
        ListManagedInstancesRequestBuilder {
            request: ListManagedInstancesRequest {
                project: required.project,
                zone: required.zone,
                instance_group_manager: required.instance_group_manager,
                max_results: None,
                page_token: None,
            },
        }
    }

    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(max_results) = self.max_results {
            params.push(("maxResults".to_string(), max_results.to_string()));
        }
        if let Some(page_token) = &self.page_token {
            params.push(("pageToken".to_string(), page_token.clone()));
        }
        params
    }
}

#[derive(Debug)]
pub struct ListManagedInstancesRequestBuilder {
    request: ListManagedInstancesRequest,
}

impl ListManagedInstancesRequestBuilder {
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.request.max_results = Some(max_results);
        self
    }

    pub fn page_token(mut self, page_token: impl Into<String>) -> Self {
        self.request.page_token = Some(page_token.into());
        self
    }

    pub fn build(self) -> ListManagedInstancesRequest {
        self.request
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListManagedInstancesResponse {
    #[serde(default)]
    pub managed_instances: Vec<ManagedInstance>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}
