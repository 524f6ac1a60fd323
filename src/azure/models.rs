//! Azure resource model
//!
//! Normalized representations of the management-plane payloads the
//! assistant lists: subscriptions and virtual machines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Azure subscription. Two subscriptions with the same ID are the same
/// subscription regardless of display-name drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Subscription {}

impl std::hash::Hash for Subscription {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// VM power state, per the Azure VM lifecycle.
/// <https://docs.microsoft.com/en-us/azure/virtual-machines/states-lifecycle>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VmPowerState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Deallocating,
    Deallocated,
    /// Azure reported no usable instance view (e.g. provisioning failed
    /// before one existed).
    NotApplicable,
}

impl VmPowerState {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "starting" => Some(Self::Starting),
            "running" => Some(Self::Running),
            "stopping" => Some(Self::Stopping),
            "stopped" => Some(Self::Stopped),
            "deallocating" => Some(Self::Deallocating),
            "deallocated" => Some(Self::Deallocated),
            _ => None,
        }
    }
}

/// Azure virtual machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vm {
    pub id: String,
    pub name: String,
    pub power_state: VmPowerState,
}

impl Vm {
    /// Build a VM from one raw entry of the `value` array of a
    /// `virtualMachines?statusOnly=true` listing.
    ///
    /// A VM whose instance view is missing or malformed is never dropped
    /// from the page; its state becomes [`VmPowerState::NotApplicable`]
    /// and the anomaly is logged for diagnosis.
    pub fn from_raw(raw: &Value) -> Self {
        let id = string_field(raw, "id");
        let name = string_field(raw, "name");

        let power_state = match parse_power_state(raw) {
            Some(state) => state,
            None => {
                let vm = Vm { id: id.clone(), name: name.clone(), power_state: VmPowerState::NotApplicable };
                tracing::warn!(
                    id = %vm.id,
                    name = %vm.name,
                    rg = %vm.rg(),
                    "VM has no parseable power state, recording as not-applicable"
                );
                return vm;
            }
        };

        Vm { id, name, power_state }
    }

    pub fn is_running(&self) -> bool {
        self.power_state == VmPowerState::Running
    }

    /// Extract the resource group from the VM id.
    ///
    /// Example id:
    /// `/subscriptions/<sub-id>/resourceGroups/<rg-name>/providers/Microsoft.Compute/virtualMachines/<vm-name>`
    pub fn rg(&self) -> &str {
        self.id.split('/').nth(4).unwrap_or("-")
    }

    /// Owning subscription, extracted from the same id path.
    pub fn subscription_id(&self) -> &str {
        self.id.split('/').nth(2).unwrap_or("-")
    }
}

fn string_field(raw: &Value, field: &str) -> String {
    raw.get(field).and_then(|v| v.as_str()).unwrap_or("-").to_string()
}

/// The instance view reports statuses as a two-entry array where the
/// second entry's code is `PowerState/<value>`.
fn parse_power_state(raw: &Value) -> Option<VmPowerState> {
    let code = raw
        .get("instanceView")?
        .get("statuses")?
        .as_array()?
        .get(1)?
        .get("code")?
        .as_str()?;
    let value = code.strip_prefix("PowerState/")?;
    VmPowerState::parse(value)
}
