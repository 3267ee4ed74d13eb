use crate::config::InfrastructureConfig;
use crate::template::InstanceTemplateCreator;
use color_eyre::eyre::{Result, eyre};
use gcp_rust_sdk::compute::{
    self, Compute, GetInstanceGroupManagerRequest, InsertInstanceGroupManagerRequest,
    InstanceGroupManager, ListManagedInstancesRequest, ListManagedInstancesRequestRequiredFields,
    ManagedInstance, OperationScope,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const MAX_TRIALS: u32 = 10;
const BASE_SLEEP_SECS: f64 = 1.5;

/// Creates a managed instance group from a freshly created template and
/// waits for its membership to converge on the requested size.
pub struct InstanceGroupCreator {
    compute: Arc<dyn Compute>,
    template_creator: InstanceTemplateCreator,
    name: String,
    node_count: u32,
    project_id: String,
    zone: String,
}

impl InstanceGroupCreator {
    pub fn new(
        compute: Arc<dyn Compute>,
        template_creator: InstanceTemplateCreator,
        config: &InfrastructureConfig,
    ) -> Self {
        Self {
            compute,
            template_creator,
            name: config.instance_group.name.to_lowercase(),
            node_count: config.instance_group.node_count,
            project_id: config.project_id.clone(),
            zone: config.zone.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instance IDs observed while polling. May be fewer than
    /// `node_count` when the retry budget runs out; callers decide whether
    /// a partial group is acceptable.
    pub async fn launch_instance_group(&self) -> Result<Vec<u64>> {
        let instance_group = self.create_instance_group().await?;
        debug!(?instance_group, "instance group realized");

        self.collect_instance_ids().await
    }

    async fn create_instance_group(&self) -> Result<InstanceGroupManager> {
        info!(group = %self.name, "creating instance group");
        let template = self.template_creator.create_template().await?;
        let template_link = template
            .self_link
            .clone()
            .ok_or_else(|| eyre!("instance template {} has no self link", template.name))?;

        let resource = InstanceGroupManager {
            id: None,
            name: self.name.clone(),
            base_instance_name: Some(self.name.clone()),
            instance_template: Some(template_link),
            target_size: Some(self.node_count as i32),
            zone: None,
            instance_group: None,
            self_link: None,
            status: None,
            creation_timestamp: None,
        };

        let operation = self
            .compute
            .insert_instance_group_manager(InsertInstanceGroupManagerRequest {
                project: self.project_id.clone(),
                zone: self.zone.clone(),
                instance_group_manager: resource,
            })
            .await?;
        compute::wait_for_operation(
            self.compute.as_ref(),
            &self.project_id,
            OperationScope::Zone(self.zone.clone()),
            operation,
        )
        .await?;
        info!(group = %self.name, "instance group created");

        Ok(self
            .compute
            .get_instance_group_manager(GetInstanceGroupManagerRequest {
                project: self.project_id.clone(),
                zone: self.zone.clone(),
                instance_group_manager: self.name.clone(),
            })
            .await?)
    }

    async fn collect_instance_ids(&self) -> Result<Vec<u64>> {
        let mut instance_ids = BTreeSet::new();
        let mut trial = 0u32;

        while trial <= MAX_TRIALS {
            info!(trial, found = instance_ids.len(), "waiting for instances");
            for instance in self.list_all_managed_instances().await? {
                if let Some(id) = instance.id {
                    instance_ids.insert(id);
                }
            }

            if instance_ids.len() >= self.node_count as usize {
                break;
            }

            tokio::time::sleep(Duration::from_secs_f64(BASE_SLEEP_SECS.powi(trial as i32)))
                .await;
            trial += 1;
        }

        Ok(instance_ids.into_iter().collect())
    }

    async fn list_all_managed_instances(&self) -> Result<Vec<ManagedInstance>> {
        let mut instances = Vec::new();
        let mut page_token = None;

        loop {
            let mut request = ListManagedInstancesRequest::builder(
                ListManagedInstancesRequestRequiredFields {
                    project: self.project_id.clone(),
                    zone: self.zone.clone(),
                    instance_group_manager: self.name.clone(),
                },
            );
            if let Some(token) = page_token {
                request = request.page_token(token);
            }

            let response = self.compute.list_managed_instances(request.build()).await?;
            instances.extend(response.managed_instances);

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(instances)
    }
}
