//! Property-based tests using proptest
//!
//! These tests verify resource-ID parsing, power-state extraction
//! robustness, and pagination aggregation using randomized inputs.

use proptest::prelude::*;
use serde_json::{json, Value};

use vmscout::azure::{Vm, VmPowerState};
use vmscout::paginate::{drain, Page, PageToken};

/// Generate a plausible Azure resource-name segment
fn arb_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9-]{0,20}".prop_map(|s| s)
}

fn arb_power_state_code() -> impl Strategy<Value = String> {
    prop_oneof![
        // well-formed codes
        prop_oneof![
            Just("starting"),
            Just("running"),
            Just("stopping"),
            Just("stopped"),
            Just("deallocating"),
            Just("deallocated"),
        ]
        .prop_map(|s| format!("PowerState/{s}")),
        // arbitrary garbage
        ".{0,30}",
    ]
}

proptest! {
    /// Resource group extraction recovers the segment that was placed at
    /// index 4 of the VM id, whatever the surrounding names look like.
    #[test]
    fn rg_extraction_recovers_path_segment(
        sub in arb_segment(),
        rg in arb_segment(),
        name in arb_segment()
    ) {
        let vm = Vm::from_raw(&json!({
            "id": format!(
                "/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Compute/virtualMachines/{name}"
            ),
            "name": name,
        }));
        prop_assert_eq!(vm.rg(), rg.as_str());
        prop_assert_eq!(vm.subscription_id(), sub.as_str());
    }

    /// VM construction is total: any statuses shape yields a VM with a
    /// defined state, never a panic or an error.
    #[test]
    fn power_state_parsing_never_fails(
        code in arb_power_state_code(),
        extra_entries in 0usize..4
    ) {
        let mut statuses: Vec<Value> = vec![json!({"code": "ProvisioningState/succeeded"})];
        statuses.push(json!({"code": code.clone()}));
        for _ in 0..extra_entries {
            statuses.push(json!({"code": "noise"}));
        }

        let vm = Vm::from_raw(&json!({
            "id": "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Compute/virtualMachines/VM",
            "name": "VM",
            "instanceView": {"statuses": statuses}
        }));

        match code.strip_prefix("PowerState/") {
            Some("running") => prop_assert_eq!(vm.power_state, VmPowerState::Running),
            Some("deallocated") => prop_assert_eq!(vm.power_state, VmPowerState::Deallocated),
            // unknown values and malformed codes land on the sentinel
            Some("starting" | "stopping" | "stopped" | "deallocating") => {
                prop_assert!(vm.power_state != VmPowerState::NotApplicable)
            }
            _ => prop_assert_eq!(vm.power_state, VmPowerState::NotApplicable),
        }
    }

    /// Truncated or absent statuses always land on the sentinel.
    #[test]
    fn short_statuses_yield_sentinel(len in 0usize..2) {
        let statuses: Vec<Value> =
            (0..len).map(|_| json!({"code": "ProvisioningState/succeeded"})).collect();
        let vm = Vm::from_raw(&json!({
            "id": "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Compute/virtualMachines/VM",
            "name": "VM",
            "instanceView": {"statuses": statuses}
        }));
        prop_assert_eq!(vm.power_state, VmPowerState::NotApplicable);
    }

    /// Aggregation returns the exact concatenation, in page order, of
    /// every page's items, making one request per page.
    #[test]
    fn drain_concatenates_pages_in_order(
        pages in prop::collection::vec(prop::collection::vec(any::<u32>(), 0..5), 1..10)
    ) {
        let calls = std::cell::RefCell::new(0usize);

        let all = tokio_test::block_on(drain(|token| {
            let idx = match token {
                None => 0,
                Some(PageToken::Opaque(t)) => t.parse::<usize>().unwrap(),
                Some(PageToken::NextLink(_)) => unreachable!(),
            };
            *calls.borrow_mut() += 1;
            let next = if idx + 1 < pages.len() {
                Some(PageToken::Opaque((idx + 1).to_string()))
            } else {
                None
            };
            let items = pages[idx].clone();
            async move { Ok(Page { items, next }) }
        }))
        .unwrap();

        let expected: Vec<u32> = pages.iter().flatten().copied().collect();
        prop_assert_eq!(all, expected);
        prop_assert_eq!(*calls.borrow(), pages.len());
    }
}
