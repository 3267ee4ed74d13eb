mod config;
mod group;
mod job;
mod template;
#[cfg(test)]
mod testutil;

use clap::Parser;
use color_eyre::eyre::Result;
use config::{CredentialsConfig, LaunchConfig};
use gcp_rust_sdk::compute::{self, Compute};
use gcp_rust_sdk::core::ClientConfig;
use gcp_rust_sdk::core::auth::{
    ServiceAccountAuthProvider, ServiceAccountAuthProviderRequiredFields, ServiceAccountKey,
    StaticTokenAuthProvider,
};
use group::InstanceGroupCreator;
use job::JobInfo;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use template::InstanceTemplateCreator;
use tracing_subscriber::EnvFilter;

// The operations wait endpoint holds requests for up to two minutes.
const API_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Parser)]
#[command(
    name = "miglaunch",
    about = "Provision a GCP managed instance group for a batch job"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "miglaunch.toml")]
    config: PathBuf,

    /// Override a config value by dotted key path,
    /// e.g. `--set infrastructure.instance_group.node_count=4`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = LaunchConfig::load(&cli.config, &cli.overrides)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let compute = build_compute_client(&config)?;
        let template_creator =
            InstanceTemplateCreator::new(compute.clone(), &config.infrastructure);
        let group_creator =
            InstanceGroupCreator::new(compute, template_creator, &config.infrastructure);

        let instance_ids = group_creator.launch_instance_group().await?;

        JobInfo {
            project_id: config.infrastructure.project_id.clone(),
            zone: config.infrastructure.zone.clone(),
            instance_group_name: group_creator.name().to_string(),
            instance_ids,
        }
        .print_job_info();

        Ok(())
    })
}

fn build_compute_client(config: &LaunchConfig) -> Result<Arc<dyn Compute>> {
    let infrastructure = &config.infrastructure;
    let endpoint = infrastructure.api_endpoint.clone();

    let client = match &infrastructure.credentials {
        CredentialsConfig::ApplicationDefault => compute::client(ClientConfig {
            auth_provider: ServiceAccountAuthProvider::builder(
                ServiceAccountAuthProviderRequiredFields {
                    key: ServiceAccountKey::from_default()?,
                },
            )
            .build(),
            timeout: API_TIMEOUT,
            endpoint,
        })?,
        CredentialsConfig::ServiceAccountFile { path } => compute::client(ClientConfig {
            auth_provider: ServiceAccountAuthProvider::builder(
                ServiceAccountAuthProviderRequiredFields {
                    key: ServiceAccountKey::from_file(path)?,
                },
            )
            .build(),
            timeout: API_TIMEOUT,
            endpoint,
        })?,
        CredentialsConfig::StaticToken { token } => compute::client(ClientConfig {
            auth_provider: StaticTokenAuthProvider::new(token.clone()),
            timeout: API_TIMEOUT,
            endpoint,
        })?,
    };

    Ok(client)
}
