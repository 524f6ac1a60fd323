//! GCP resource model

use serde::{Deserialize, Serialize};

/// GCP project.
///
/// Equality and hashing are by project ID only: the fan-out coordinator
/// computes "projects whose Compute Engine capability was filtered out"
/// as a set difference, which must not be affected by name drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Project {}

impl std::hash::Hash for Project {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Compute Engine instance lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    Provisioning,
    Staging,
    Running,
    Stopping,
    Terminated,
    Suspending,
    Suspended,
}

impl InstanceState {
    /// Wire representation, as used in server-side filter expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Staging => "STAGING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Terminated => "TERMINATED",
            Self::Suspending => "SUSPENDING",
            Self::Suspended => "SUSPENDED",
        }
    }
}

/// Compute Engine instance. The listing payload supplies every field
/// directly; nothing is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub project: String,
    pub state: InstanceState,
}
