use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A managed instance group: maintains `target_size` instances created from
/// one instance template. Identity is (project, zone, name).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceGroupManager {
    #[serde(
        default,
        with = "super::uint64_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_instance_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_size: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InstanceGroupManagerStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceGroupManagerStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stable: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedInstance {
    /// URL of the instance. Absent while the instance is still being created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    #[serde(
        default,
        with = "super::uint64_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_status: Option<InstanceStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_action: Option<CurrentAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Provisioning,
    Staging,
    Running,
    Stopping,
    Stopped,
    Suspending,
    Suspended,
    Repairing,
    Terminated,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provisioning => write!(f, "PROVISIONING"),
            Self::Staging => write!(f, "STAGING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Stopping => write!(f, "STOPPING"),
            Self::Stopped => write!(f, "STOPPED"),
            Self::Suspending => write!(f, "SUSPENDING"),
            Self::Suspended => write!(f, "SUSPENDED"),
            Self::Repairing => write!(f, "REPAIRING"),
            Self::Terminated => write!(f, "TERMINATED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrentAction {
    None,
    Creating,
    CreatingWithoutRetries,
    Verifying,
    Recreating,
    Deleting,
    Abandoning,
    Restarting,
    Refreshing,
    Starting,
    Stopping,
}

impl fmt::Display for CurrentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Creating => write!(f, "CREATING"),
            Self::CreatingWithoutRetries => write!(f, "CREATING_WITHOUT_RETRIES"),
            Self::Verifying => write!(f, "VERIFYING"),
            Self::Recreating => write!(f, "RECREATING"),
            Self::Deleting => write!(f, "DELETING"),
            Self::Abandoning => write!(f, "ABANDONING"),
            Self::Restarting => write!(f, "RESTARTING"),
            Self::Refreshing => write!(f, "REFRESHING"),
            Self::Starting => write!(f, "STARTING"),
            Self::Stopping => write!(f, "STOPPING"),
        }
    }
}
