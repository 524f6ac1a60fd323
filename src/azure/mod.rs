//! Azure provider support
//!
//! - [`models`] - normalized subscription and VM representations
//! - [`client`] - management-plane listing client

pub mod client;
pub mod models;

pub use client::AzureClient;
pub use models::{Subscription, Vm, VmPowerState};
