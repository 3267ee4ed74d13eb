use crate::config::LaunchConfig;
use gcp_rust_sdk::compute::{
    Compute, CurrentAction, GetImageRequest, GetInstanceGroupManagerRequest,
    GetInstanceTemplateRequest, Image, InsertInstanceGroupManagerRequest,
    InsertInstanceTemplateRequest, InstanceGroupManager, InstanceStatus, InstanceTemplate,
    ListManagedInstancesRequest, ListManagedInstancesResponse, ManagedInstance, Operation,
    OperationStatus, WaitOperationRequest,
};
use gcp_rust_sdk::core::Result;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub fn base_toml() -> String {
    format!(
        r#"
[infrastructure]
project_id = "test-project"
region = "us-central1"
zone = "us-central1-a"
labels = {{ team = "research" }}
credentials = {{ type = "static_token", token = "test-token" }}

[infrastructure.instance_group]
name = "batch-workers"
node_count = 2

[infrastructure.template]
startup_script_path = "{manifest_dir}/scripts/startup.sh"

[infrastructure.template.vm]
machine_type = "n1-standard-4"
vm_type = "standard"

[infrastructure.template.boot_disk]
project_id = "ubuntu-os-cloud"
image_name = "ubuntu-2204-jammy-v20230714"
size_gb = 50
"#,
        manifest_dir = env!("CARGO_MANIFEST_DIR")
    )
}

pub fn test_config(overrides: &[String]) -> LaunchConfig {
    LaunchConfig::from_toml_str(&base_toml(), overrides).unwrap()
}

pub fn managed_instance(id: u64) -> ManagedInstance {
    ManagedInstance {
        instance: Some(format!(
            "https://www.googleapis.com/compute/v1/projects/test-project/zones/us-central1-a/instances/batch-workers-{id}"
        )),
        id: Some(id),
        instance_status: Some(InstanceStatus::Running),
        current_action: Some(CurrentAction::None),
    }
}

fn done_operation(name: &str) -> Operation {
    Operation {
        id: None,
        name: name.to_string(),
        status: OperationStatus::Done,
        operation_type: None,
        target_link: None,
        self_link: None,
        zone: None,
        progress: Some(100),
        http_error_status_code: None,
        error: None,
        insert_time: None,
    }
}

fn pending_operation(name: &str) -> Operation {
    Operation {
        status: OperationStatus::Pending,
        progress: Some(0),
        ..done_operation(name)
    }
}

/// In-memory `Compute` that records every call. List behavior: responses are
/// popped from `list_script` per call, falling back to `list_default` once
/// the script runs dry.
#[derive(Default)]
pub struct MockCompute {
    pub events: Mutex<Vec<String>>,
    pub inserted_templates: Mutex<Vec<InsertInstanceTemplateRequest>>,
    pub inserted_groups: Mutex<Vec<InsertInstanceGroupManagerRequest>>,
    pub list_calls: Mutex<usize>,
    pub list_script: Mutex<VecDeque<Vec<ManagedInstance>>>,
    pub list_default: Mutex<Vec<ManagedInstance>>,
}

impl MockCompute {
    fn record(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

impl Compute for MockCompute {
    fn get_image(
        &self,
        request: GetImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Image>> + Send + '_>> {
        self.record("get_image");
        Box::pin(async move {
            Ok(Image {
                id: Some(1),
                name: request.image.clone(),
                self_link: format!(
                    "https://www.googleapis.com/compute/v1/projects/{}/global/images/{}",
                    request.project, request.image
                ),
                description: None,
                family: None,
                status: Some("READY".to_string()),
                disk_size_gb: Some(10),
                creation_timestamp: None,
            })
        })
    }

    fn insert_instance_template(
        &self,
        request: InsertInstanceTemplateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>> {
        self.record("insert_instance_template");
        self.inserted_templates.lock().unwrap().push(request);
        Box::pin(async move { Ok(pending_operation("operation-template-insert")) })
    }

    fn get_instance_template(
        &self,
        request: GetInstanceTemplateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InstanceTemplate>> + Send + '_>> {
        self.record("get_instance_template");
        let mut template = self.inserted_templates.lock().unwrap()[0]
            .instance_template
            .clone();
        template.id = Some(100);
        template.self_link = Some(format!(
            "https://www.googleapis.com/compute/v1/projects/{}/global/instanceTemplates/{}",
            request.project, request.instance_template
        ));
        Box::pin(async move { Ok(template) })
    }

    fn insert_instance_group_manager(
        &self,
        request: InsertInstanceGroupManagerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>> {
        self.record("insert_instance_group_manager");
        self.inserted_groups.lock().unwrap().push(request);
        Box::pin(async move { Ok(pending_operation("operation-group-insert")) })
    }

    fn get_instance_group_manager(
        &self,
        request: GetInstanceGroupManagerRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InstanceGroupManager>> + Send + '_>> {
        self.record("get_instance_group_manager");
        let mut group = self.inserted_groups.lock().unwrap()[0]
            .instance_group_manager
            .clone();
        group.id = Some(200);
        group.zone = Some(request.zone);
        Box::pin(async move { Ok(group) })
    }

    fn list_managed_instances(
        &self,
        _request: ListManagedInstancesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ListManagedInstancesResponse>> + Send + '_>> {
        self.record("list_managed_instances");
        *self.list_calls.lock().unwrap() += 1;
        let managed_instances = self
            .list_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.list_default.lock().unwrap().clone());
        Box::pin(async move {
            Ok(ListManagedInstancesResponse {
                managed_instances,
                next_page_token: None,
            })
        })
    }

    fn wait_operation(
        &self,
        request: WaitOperationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Operation>> + Send + '_>> {
        self.record("wait_operation");
        Box::pin(async move { Ok(done_operation(&request.operation)) })
    }
}
