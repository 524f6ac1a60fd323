//! GCP provider support
//!
//! - [`models`] - normalized project and instance representations
//! - [`client`] - Resource Manager + Compute Engine listing client
//! - [`zones`] - fixed US zone coverage for the fan-out

pub mod client;
pub mod models;
pub mod zones;

pub use client::GcpClient;
pub use models::{Instance, InstanceState, Project};
