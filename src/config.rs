use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfig {
    pub infrastructure: InfrastructureConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfrastructureConfig {
    pub project_id: String,
    pub region: String,
    pub zone: String,

    /// Applied to the instance template; also the boot disk default.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Overrides the public compute endpoint. For emulators and tests.
    pub api_endpoint: Option<String>,

    pub instance_group: InstanceGroupConfig,

    pub template: TemplateConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsConfig {
    #[default]
    ApplicationDefault,
    ServiceAccountFile {
        path: PathBuf,
    },
    StaticToken {
        token: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceGroupConfig {
    pub name: String,
    pub node_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Access scopes granted to the instances' default service account.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Defaults to the instance group name.
    pub name: Option<String>,

    pub network: Option<String>,

    pub subnetwork: Option<String>,

    pub startup_script_path: PathBuf,

    pub vm: VmConfig,

    pub boot_disk: BootDiskConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/cloud-platform".to_string(),
        "https://www.googleapis.com/auth/cloud.useraccounts.readonly".to_string(),
        "https://www.googleapis.com/auth/cloudruntimeconfig".to_string(),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct VmConfig {
    pub machine_type: String,

    #[serde(default)]
    pub accelerator_count: i32,

    #[serde(default = "default_accelerator_type")]
    pub accelerator_type: String,

    pub vm_type: VmType,

    /// Existing zonal disks attached read-only after the boot disk.
    #[serde(default)]
    pub disks: Vec<String>,
}

fn default_accelerator_type() -> String {
    "nvidia-tesla-t4".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VmType {
    Standard,
    Spot,
    Preemptible,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootDiskConfig {
    pub project_id: String,
    pub image_name: String,
    pub size_gb: i64,
    pub labels: Option<BTreeMap<String, String>>,
}

/// Key/value pairs surfaced to the workload as instance metadata, next to
/// the fields derived from the infrastructure section.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    pub docker_image: Option<String>,
    pub mlflow_tracking_uri: Option<String>,
    #[serde(default = "default_python_hash_seed")]
    pub python_hash_seed: i64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            docker_image: None,
            mlflow_tracking_uri: None,
            python_hash_seed: default_python_hash_seed(),
        }
    }
}

fn default_python_hash_seed() -> i64 {
    42
}

impl LaunchConfig {
    pub fn load(path: &Path, overrides: &[String]) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content, overrides)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str, overrides: &[String]) -> Result<Self> {
        let mut document: toml::Value = content.parse().wrap_err("failed to parse TOML")?;

        for item in overrides {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| eyre!("override must be KEY=VALUE, got `{item}`"))?;
            apply_override(&mut document, key, value)?;
        }

        let config: LaunchConfig = document.try_into().wrap_err("failed to decode config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let infrastructure = &self.infrastructure;
        if infrastructure.instance_group.name.is_empty() {
            bail!("infrastructure.instance_group.name must not be empty");
        }
        if infrastructure.instance_group.node_count == 0 {
            bail!("infrastructure.instance_group.node_count must be at least 1");
        }
        if infrastructure.template.vm.accelerator_count < 0 {
            bail!("infrastructure.template.vm.accelerator_count must not be negative");
        }
        Ok(())
    }
}

impl InfrastructureConfig {
    pub fn template_name(&self) -> String {
        self.template
            .name
            .as_deref()
            .unwrap_or(&self.instance_group.name)
            .to_lowercase()
    }

    pub fn network_url(&self) -> String {
        self.template.network.clone().unwrap_or_else(|| {
            format!(
                "https://www.googleapis.com/compute/v1/projects/{}/global/networks/default",
                self.project_id
            )
        })
    }

    pub fn subnetwork_url(&self) -> String {
        self.template.subnetwork.clone().unwrap_or_else(|| {
            format!(
                "https://www.googleapis.com/compute/v1/projects/{}/regions/{}/subnetworks/default",
                self.project_id, self.region
            )
        })
    }

    pub fn boot_disk_labels(&self) -> BTreeMap<String, String> {
        self.template
            .boot_disk
            .labels
            .clone()
            .unwrap_or_else(|| self.labels.clone())
    }
}

fn apply_override(document: &mut toml::Value, key: &str, raw: &str) -> Result<()> {
    if key.is_empty() {
        bail!("override key must not be empty");
    }

    let segments: Vec<&str> = key.split('.').collect();
    let mut current = document;

    for segment in &segments[..segments.len() - 1] {
        let table = current
            .as_table_mut()
            .ok_or_else(|| eyre!("cannot set `{key}`: `{segment}` is not a table"))?;

        current = table
            .entry(*segment)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let last = segments[segments.len() - 1];
    let table = current
        .as_table_mut()
        .ok_or_else(|| eyre!("cannot set `{key}`: `{last}` is not a table"))?;
    table.insert(last.to_string(), parse_override_value(raw));

    Ok(())
}

/// Overrides arrive as flat strings. Anything that reads as a TOML literal
/// (integer, boolean, array, quoted string) keeps that type; everything else
/// is taken as a bare string.
fn parse_override_value(raw: &str) -> toml::Value {
    if let Ok(document) = format!("value = {raw}").parse::<toml::Value>()
        && let Some(value) = document.get("value")
    {
        return value.clone();
    }
    toml::Value::String(raw.to_string())
}
