use crate::config::{BootDiskConfig, InfrastructureConfig, MetadataConfig, VmConfig, VmType};
use color_eyre::eyre::{Result, WrapErr};
use gcp_rust_sdk::compute::{
    self, AccessConfig, AccessConfigType, AcceleratorConfig, AttachedDisk,
    AttachedDiskInitializeParams, Compute, DiskMode, GetImageRequest, GetInstanceTemplateRequest,
    Image, InsertInstanceTemplateRequest, InstanceProperties, InstanceTemplate, Metadata,
    MetadataItem, NetworkInterface, NetworkTier, OnHostMaintenance, OperationScope,
    ProvisioningModel, Scheduling, ServiceAccount,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Builds and submits the instance template the group will stamp instances
/// from: boot disk, read-only data disks, one NATed network interface,
/// machine shape, scheduling policy, and startup metadata.
pub struct InstanceTemplateCreator {
    compute: Arc<dyn Compute>,
    project_id: String,
    zone: String,
    template_name: String,
    instance_group_name: String,
    node_count: u32,
    scopes: Vec<String>,
    network: String,
    subnetwork: String,
    startup_script_path: PathBuf,
    vm: VmConfig,
    boot_disk: BootDiskConfig,
    boot_disk_labels: BTreeMap<String, String>,
    labels: BTreeMap<String, String>,
    metadata: MetadataConfig,
}

impl InstanceTemplateCreator {
    pub fn new(compute: Arc<dyn Compute>, config: &InfrastructureConfig) -> Self {
        Self {
            compute,
            project_id: config.project_id.clone(),
            zone: config.zone.clone(),
            template_name: config.template_name(),
            instance_group_name: config.instance_group.name.to_lowercase(),
            node_count: config.instance_group.node_count,
            scopes: config.template.scopes.clone(),
            network: config.network_url(),
            subnetwork: config.subnetwork_url(),
            startup_script_path: config.template.startup_script_path.clone(),
            vm: config.template.vm.clone(),
            boot_disk: config.template.boot_disk.clone(),
            boot_disk_labels: config.boot_disk_labels(),
            labels: config.labels.clone(),
            metadata: config.template.metadata.clone(),
        }
    }

    pub async fn create_template(&self) -> Result<InstanceTemplate> {
        info!(template = %self.template_name, "creating instance template");

        let startup_script =
            std::fs::read_to_string(&self.startup_script_path).wrap_err_with(|| {
                format!(
                    "failed to read startup script {}",
                    self.startup_script_path.display()
                )
            })?;

        let image = self
            .compute
            .get_image(GetImageRequest {
                project: self.boot_disk.project_id.clone(),
                image: self.boot_disk.image_name.clone(),
            })
            .await?;

        let mut disks = vec![self.build_boot_disk(&image)];
        disks.extend(self.attached_disks());

        let template = InstanceTemplate {
            id: None,
            name: self.template_name.clone(),
            description: None,
            properties: InstanceProperties {
                machine_type: self.vm.machine_type.clone(),
                disks,
                network_interfaces: vec![self.network_interface()],
                metadata: Some(Metadata {
                    items: Some(self.metadata_items(&startup_script)),
                }),
                labels: Some(self.labels.clone().into_iter().collect()),
                scheduling: Some(self.scheduling()),
                service_accounts: Some(vec![ServiceAccount {
                    email: "default".to_string(),
                    scopes: self.scopes.clone(),
                }]),
                guest_accelerators: self.accelerators(),
            },
            self_link: None,
            creation_timestamp: None,
        };

        let operation = self
            .compute
            .insert_instance_template(InsertInstanceTemplateRequest {
                project: self.project_id.clone(),
                instance_template: template,
            })
            .await?;
        compute::wait_for_operation(
            self.compute.as_ref(),
            &self.project_id,
            OperationScope::Global,
            operation,
        )
        .await?;

        info!(template = %self.template_name, "instance template created");

        Ok(self
            .compute
            .get_instance_template(GetInstanceTemplateRequest {
                project: self.project_id.clone(),
                instance_template: self.template_name.clone(),
            })
            .await?)
    }

    fn build_boot_disk(&self, image: &Image) -> AttachedDisk {
        AttachedDisk {
            boot: true,
            auto_delete: true,
            device_name: Some(self.boot_disk.image_name.clone()),
            mode: None,
            source: None,
            initialize_params: Some(AttachedDiskInitializeParams {
                source_image: Some(image.self_link.clone()),
                disk_size_gb: Some(self.boot_disk.size_gb),
                labels: Some(self.boot_disk_labels.clone().into_iter().collect()),
            }),
        }
    }

    fn attached_disks(&self) -> Vec<AttachedDisk> {
        self.vm
            .disks
            .iter()
            .map(|disk_name| AttachedDisk {
                boot: false,
                auto_delete: false,
                device_name: Some(disk_name.clone()),
                // Shared data disks must stay read-only to be attachable to
                // every instance in the group.
                mode: Some(DiskMode::ReadOnly),
                source: Some(disk_name.clone()),
                initialize_params: None,
            })
            .collect()
    }

    fn network_interface(&self) -> NetworkInterface {
        NetworkInterface {
            name: Some("nic0".to_string()),
            network: Some(self.network.clone()),
            subnetwork: Some(self.subnetwork.clone()),
            access_configs: Some(vec![AccessConfig {
                name: Some("External NAT".to_string()),
                r#type: Some(AccessConfigType::OneToOneNat),
                network_tier: Some(NetworkTier::Premium),
            }]),
        }
    }

    fn scheduling(&self) -> Scheduling {
        match self.vm.vm_type {
            VmType::Preemptible => Scheduling {
                provisioning_model: None,
                on_host_maintenance: None,
                preemptible: Some(true),
                automatic_restart: None,
            },
            VmType::Spot => Scheduling {
                provisioning_model: Some(ProvisioningModel::Spot),
                on_host_maintenance: Some(OnHostMaintenance::Terminate),
                preemptible: None,
                automatic_restart: None,
            },
            VmType::Standard => Scheduling {
                provisioning_model: Some(ProvisioningModel::Standard),
                on_host_maintenance: Some(OnHostMaintenance::Terminate),
                preemptible: None,
                automatic_restart: None,
            },
        }
    }

    fn accelerators(&self) -> Option<Vec<AcceleratorConfig>> {
        if self.vm.accelerator_count > 0 {
            Some(vec![AcceleratorConfig {
                accelerator_type: self.vm.accelerator_type.clone(),
                accelerator_count: self.vm.accelerator_count,
            }])
        } else {
            None
        }
    }

    fn metadata_items(&self, startup_script: &str) -> Vec<MetadataItem> {
        let mut items = vec![
            MetadataItem::new("startup-script", startup_script),
            MetadataItem::new("zone", self.zone.as_str()),
            MetadataItem::new("instance_group_name", self.instance_group_name.as_str()),
            MetadataItem::new("node_count", self.node_count.to_string()),
        ];

        if !self.vm.disks.is_empty() {
            items.push(MetadataItem::new("disks", self.vm.disks.join("\n")));
        }
        if let Some(docker_image) = &self.metadata.docker_image {
            items.push(MetadataItem::new("docker_image", docker_image.as_str()));
        }
        if let Some(tracking_uri) = &self.metadata.mlflow_tracking_uri {
            items.push(MetadataItem::new("mlflow_tracking_uri", tracking_uri.as_str()));
        }
        items.push(MetadataItem::new(
            "python_hash_seed",
            self.metadata.python_hash_seed.to_string(),
        ));

        items
    }
}
