use gcp_rust_sdk::{
    compute::{ListManagedInstancesRequest, ListManagedInstancesRequestRequiredFields},
    core::{
        ClientConfig,
        auth::{
            ServiceAccountAuthProvider, ServiceAccountAuthProviderRequiredFields,
            ServiceAccountKey,
        },
    },
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = std::env::args().nth(1).expect("usage: <project> <zone> <group>");
    let zone = std::env::args().nth(2).expect("usage: <project> <zone> <group>");
    let group = std::env::args().nth(3).expect("usage: <project> <zone> <group>");

    let key = ServiceAccountKey::from_default()?;
    let auth_provider =
        ServiceAccountAuthProvider::builder(ServiceAccountAuthProviderRequiredFields { key })
            .build();

    let client = gcp_rust_sdk::compute::client(ClientConfig {
        auth_provider,
        timeout: Duration::from_secs(10),
        endpoint: None,
    })?;

    let mut page_token = None;
    loop {
        let mut request = ListManagedInstancesRequest::builder(
            ListManagedInstancesRequestRequiredFields {
                project: project.clone(),
                zone: zone.clone(),
                instance_group_manager: group.clone(),
            },
        );
        if let Some(token) = &page_token {
            request = request.page_token(token.clone());
        }

        let response = client.list_managed_instances(request.build()).await?;

        for instance in &response.managed_instances {
            println!(
                "{}: status={:?} action={:?}",
                instance.id.map_or_else(|| "<pending>".to_string(), |id| id.to_string()),
                instance.instance_status,
                instance.current_action,
            );
        }

        match response.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(())
}
