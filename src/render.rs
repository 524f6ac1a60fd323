//! Chat-facing rendering of aggregated results
//!
//! The dialog layer turns these into messages and adaptive cards; this
//! module only produces the text and the card-sized page slices.

use crate::azure::Vm;
use crate::gcp::Instance;

/// Maximum entries per result card page.
pub const CARD_PAGE_SIZE: usize = 50;

/// Numbered one-line-per-VM summary, e.g. `1. web-0 (rg: prod-rg)`.
pub fn running_vms_summary(vms: &[Vm]) -> String {
    vms.iter()
        .enumerate()
        .map(|(i, vm)| format!("{}. {} (rg: {})", i + 1, vm.name, vm.rg()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Numbered one-line-per-instance summary,
/// e.g. `1. web-0 (project: prod, zone: us-central1-a)`.
pub fn running_instances_summary(instances: &[Instance]) -> String {
    instances
        .iter()
        .enumerate()
        .map(|(i, instance)| {
            format!(
                "{}. {} (project: {}, zone: {})",
                i + 1,
                instance.name,
                instance.project,
                instance.zone
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split an aggregated result into card-sized pages, yielding each
/// page's 1-based start index alongside its slice.
pub fn card_pages<T>(items: &[T]) -> impl Iterator<Item = (usize, &[T])> {
    items
        .chunks(CARD_PAGE_SIZE)
        .enumerate()
        .map(|(page, chunk)| (page * CARD_PAGE_SIZE + 1, chunk))
}

pub fn no_running_vms_message(subscription_name: &str) -> String {
    format!("Looks like there are no running VMs in {subscription_name}")
}

pub fn no_running_instances_message() -> String {
    "Looks like there are no running instances in GCP".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::VmPowerState;
    use crate::gcp::InstanceState;

    fn vm(name: &str, rg: &str) -> Vm {
        Vm {
            id: format!(
                "/subscriptions/S/resourceGroups/{rg}/providers/Microsoft.Compute/virtualMachines/{name}"
            ),
            name: name.to_string(),
            power_state: VmPowerState::Running,
        }
    }

    #[test]
    fn vm_summary_numbers_from_one() {
        let vms = vec![vm("web-0", "prod"), vm("db-0", "data")];
        let summary = running_vms_summary(&vms);
        assert!(summary.starts_with("1. web-0 (rg: prod)"));
        assert!(summary.contains("2. db-0 (rg: data)"));
    }

    #[test]
    fn instance_summary_includes_project_and_zone() {
        let instances = vec![Instance {
            id: "42".into(),
            name: "worker-1".into(),
            zone: "us-central1-a".into(),
            project: "prod".into(),
            state: InstanceState::Running,
        }];
        assert_eq!(
            running_instances_summary(&instances),
            "1. worker-1 (project: prod, zone: us-central1-a)"
        );
    }

    #[test]
    fn card_pages_chunk_with_start_indices() {
        let items: Vec<u32> = (0..120).collect();
        let pages: Vec<(usize, &[u32])> = card_pages(&items).collect();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].0, 1);
        assert_eq!(pages[1].0, 51);
        assert_eq!(pages[2].0, 101);
        assert_eq!(pages[2].1.len(), 20);
    }

    #[test]
    fn empty_input_yields_no_pages() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(card_pages(&items).count(), 0);
    }
}
