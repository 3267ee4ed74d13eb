pub mod models;
pub mod requests;

pub use models::*;
pub use requests::*;

use crate::core::{DEFAULT_COMPUTE_ENDPOINT, GcpError, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Compute Engine operations needed to provision a managed instance group:
/// image lookup, instance templates, instance group managers, and the
/// long-running operations they produce.
pub trait Compute: Send + Sync {
    fn get_image(
        &self,
        request: GetImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Image>> + Send + '_>>;

    fn insert_instance_template(
        &self,
        request: InsertInstanceTemplateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>>;

    fn get_instance_template(
        &self,
        request: GetInstanceTemplateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InstanceTemplate>> + Send + '_>>;

    fn insert_instance_group_manager(
        &self,
        request: InsertInstanceGroupManagerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>>;

    fn get_instance_group_manager(
        &self,
        request: GetInstanceGroupManagerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InstanceGroupManager>> + Send + '_>>;

    fn list_managed_instances(
        &self,
        request: ListManagedInstancesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ListManagedInstancesResponse>> + Send + '_>>;

    /// One blocking wait call. The API returns early on completion or after
    /// its own internal deadline, so callers loop; see [`wait_for_operation`].
    fn wait_operation(
        &self,
        request: WaitOperationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>>;
}

pub fn client<A: crate::core::auth::AuthProvider + 'static>(
    config: crate::core::ClientConfig<A>,
) -> Result<Arc<dyn Compute>> {
    let endpoint = config
        .endpoint
        .unwrap_or_else(|| DEFAULT_COMPUTE_ENDPOINT.to_string());
    let gcp_client = crate::core::GcpClient::new(
        Arc::new(config.auth_provider),
        endpoint,
        config.timeout,
    )?;
    Ok(Arc::new(gcp_client))
}

/// Re-issues `wait_operation` until the operation reports `DONE`, then
/// surfaces any operation error. Returns the completed operation.
pub async fn wait_for_operation(
    client: &dyn Compute,
    project: &str,
    scope: OperationScope,
    mut operation: Operation,
) -> Result<Operation> {
    while operation.status != OperationStatus::Done {
        operation = client
            .wait_operation(WaitOperationRequest {
                project: project.to_string(),
                scope: scope.clone(),
                operation: operation.name.clone(),
            })
            .await?;
    }

    if let Some(message) = operation.error_message() {
        return Err(GcpError::Operation {
            name: operation.name,
            message,
        });
    }
    Ok(operation)
}

fn query_string(params: &[(String, String)]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!(
            "?{}",
            params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&")
        )
    }
}

impl Compute for crate::core::GcpClient {
    fn get_image(
        &self,
        request: GetImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Image>> + Send + '_>> {
        Box::pin(async move {
            let path = format!(
                "/projects/{}/global/images/{}",
                request.project, request.image
            );
            self.get::<Image>(&path).await
        })
    }

    fn insert_instance_template(
        &self,
        request: InsertInstanceTemplateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>> {
        Box::pin(async move {
            let path = format!("/projects/{}/global/instanceTemplates", request.project);
            self.post::<InstanceTemplate, Operation>(&path, Some(&request.instance_template))
                .await
        })
    }

    fn get_instance_template(
        &self,
        request: GetInstanceTemplateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InstanceTemplate>> + Send + '_>> {
        Box::pin(async move {
            let path = format!(
                "/projects/{}/global/instanceTemplates/{}",
                request.project, request.instance_template
            );
            self.get::<InstanceTemplate>(&path).await
        })
    }

    fn insert_instance_group_manager(
        &self,
        request: InsertInstanceGroupManagerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>> {
        Box::pin(async move {
            let path = format!(
                "/projects/{}/zones/{}/instanceGroupManagers",
                request.project, request.zone
            );
            self.post::<InstanceGroupManager, Operation>(
                &path,
                Some(&request.instance_group_manager),
            )
            .await
        })
    }

    fn get_instance_group_manager(
        &self,
        request: GetInstanceGroupManagerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InstanceGroupManager>> + Send + '_>> {
        Box::pin(async move {
            let path = format!(
                "/projects/{}/zones/{}/instanceGroupManagers/{}",
                request.project, request.zone, request.instance_group_manager
            );
            self.get::<InstanceGroupManager>(&path).await
        })
    }

    fn list_managed_instances(
        &self,
        request: ListManagedInstancesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ListManagedInstancesResponse>> + Send + '_>> {
        Box::pin(async move {
            let path = format!(
                "/projects/{}/zones/{}/instanceGroupManagers/{}/listManagedInstances{}",
                request.project,
                request.zone,
                request.instance_group_manager,
                query_string(&request.to_query_params())
            );
            self.post::<(), ListManagedInstancesResponse>(&path, None).await
        })
    }

    fn wait_operation(
        &self,
        request: WaitOperationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>> {
        Box::pin(async move {
            let path = match &request.scope {
                OperationScope::Global => format!(
                    "/projects/{}/global/operations/{}/wait",
                    request.project, request.operation
                ),
                OperationScope::Zone(zone) => format!(
                    "/projects/{}/zones/{}/operations/{}/wait",
                    request.project, zone, request.operation
                ),
            };
            self.post::<(), Operation>(&path, None).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GcpClient;
    use crate::core::auth::StaticTokenAuthProvider;
    use std::time::Duration;

    fn test_client(server: &mockito::Server) -> GcpClient {
        GcpClient::new(
            Arc::new(StaticTokenAuthProvider::new("test-token")),
            server.url(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_image() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/projects/ubuntu-os-cloud/global/images/ubuntu-2204-jammy-v20230714")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "id": "4729384756102938475",
                    "name": "ubuntu-2204-jammy-v20230714",
                    "selfLink": "https://www.googleapis.com/compute/v1/projects/ubuntu-os-cloud/global/images/ubuntu-2204-jammy-v20230714",
                    "family": "ubuntu-2204-lts",
                    "status": "READY",
                    "diskSizeGb": "10"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let image = client
            .get_image(GetImageRequest {
                project: "ubuntu-os-cloud".to_string(),
                image: "ubuntu-2204-jammy-v20230714".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(image.name, "ubuntu-2204-jammy-v20230714");
        assert_eq!(image.id, Some(4729384756102938475));
        assert_eq!(image.disk_size_gb, Some(10));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_insert_instance_template_posts_resource() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/projects/my-project/global/instanceTemplates")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "name": "batch-workers",
                "properties": {
                    "machineType": "n1-standard-4"
                }
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "name": "operation-12345",
                    "status": "PENDING",
                    "operationType": "insert"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let operation = client
            .insert_instance_template(InsertInstanceTemplateRequest {
                project: "my-project".to_string(),
                instance_template: InstanceTemplate {
                    id: None,
                    name: "batch-workers".to_string(),
                    description: None,
                    properties: InstanceProperties {
                        machine_type: "n1-standard-4".to_string(),
                        disks: vec![],
                        network_interfaces: vec![],
                        metadata: None,
                        labels: None,
                        scheduling: None,
                        service_accounts: None,
                        guest_accelerators: None,
                    },
                    self_link: None,
                    creation_timestamp: None,
                },
            })
            .await
            .unwrap();

        assert_eq!(operation.name, "operation-12345");
        assert_eq!(operation.status, OperationStatus::Pending);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_managed_instances_paging() {
        let mut server = mockito::Server::new_async().await;
        let first_page = server
            .mock(
                "POST",
                "/projects/my-project/zones/us-central1-a/instanceGroupManagers/batch-workers/listManagedInstances",
            )
            .match_query(mockito::Matcher::UrlEncoded(
                "maxResults".to_string(),
                "500".to_string(),
            ))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "managedInstances": [
                        {"id": "101", "instanceStatus": "RUNNING", "currentAction": "NONE"},
                        {"id": "102", "currentAction": "CREATING"}
                    ],
                    "nextPageToken": "page-2"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let second_page = server
            .mock(
                "POST",
                "/projects/my-project/zones/us-central1-a/instanceGroupManagers/batch-workers/listManagedInstances",
            )
            .match_query(mockito::Matcher::UrlEncoded(
                "pageToken".to_string(),
                "page-2".to_string(),
            ))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "managedInstances": [
                        {"id": "103", "instanceStatus": "RUNNING", "currentAction": "NONE"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let required = || ListManagedInstancesRequestRequiredFields {
            project: "my-project".to_string(),
            zone: "us-central1-a".to_string(),
            instance_group_manager: "batch-workers".to_string(),
        };

        let response = client
            .list_managed_instances(
                ListManagedInstancesRequest::builder(required())
                    .max_results(500)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(response.managed_instances.len(), 2);
        assert_eq!(response.managed_instances[0].id, Some(101));
        assert_eq!(response.next_page_token.as_deref(), Some("page-2"));

        let response = client
            .list_managed_instances(
                ListManagedInstancesRequest::builder(required())
                    .page_token("page-2")
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(response.managed_instances.len(), 1);
        assert_eq!(response.managed_instances[0].id, Some(103));
        assert_eq!(response.next_page_token, None);

        first_page.assert_async().await;
        second_page.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/projects/my-project/zones/us-central1-a/instanceGroupManagers")
            .with_status(409)
            .with_body(
                serde_json::json!({
                    "error": {
                        "code": 409,
                        "message": "The resource 'batch-workers' already exists"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let err = client
            .insert_instance_group_manager(InsertInstanceGroupManagerRequest {
                project: "my-project".to_string(),
                zone: "us-central1-a".to_string(),
                instance_group_manager: InstanceGroupManager {
                    id: None,
                    name: "batch-workers".to_string(),
                    base_instance_name: Some("batch-workers".to_string()),
                    instance_template: None,
                    target_size: Some(2),
                    zone: None,
                    instance_group: None,
                    self_link: None,
                    status: None,
                    creation_timestamp: None,
                },
            })
            .await
            .unwrap_err();

        match err {
            GcpError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "The resource 'batch-workers' already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_for_operation_skips_wait_call_when_done() {
        let server = mockito::Server::new_async().await;
        let client = test_client(&server);

        let done = Operation {
            id: None,
            name: "operation-done".to_string(),
            status: OperationStatus::Done,
            operation_type: None,
            target_link: None,
            self_link: None,
            zone: None,
            progress: Some(100),
            http_error_status_code: None,
            error: None,
            insert_time: None,
        };

        // No mock mounted: any request would fail the test.
        let operation = wait_for_operation(&client, "my-project", OperationScope::Global, done)
            .await
            .unwrap();
        assert_eq!(operation.name, "operation-done");
    }

    #[tokio::test]
    async fn test_wait_for_operation_surfaces_operation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/projects/my-project/zones/us-central1-a/operations/operation-77/wait",
            )
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "name": "operation-77",
                    "status": "DONE",
                    "httpErrorStatusCode": 403,
                    "error": {
                        "errors": [
                            {"code": "QUOTA_EXCEEDED", "message": "Quota 'PREEMPTIBLE_NVIDIA_T4_GPUS' exceeded"}
                        ]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let pending = Operation {
            id: None,
            name: "operation-77".to_string(),
            status: OperationStatus::Running,
            operation_type: None,
            target_link: None,
            self_link: None,
            zone: None,
            progress: None,
            http_error_status_code: None,
            error: None,
            insert_time: None,
        };

        let err = wait_for_operation(
            &client,
            "my-project",
            OperationScope::Zone("us-central1-a".to_string()),
            pending,
        )
        .await
        .unwrap_err();

        match err {
            GcpError::Operation { name, message } => {
                assert_eq!(name, "operation-77");
                assert!(message.contains("Quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
