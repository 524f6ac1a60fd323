//! vmscout - assistant backend for spotting running compute
//!
//! Given a bearer token obtained by an external OAuth flow, vmscout
//! enumerates a user's cloud scopes (Azure subscriptions, GCP projects),
//! walks the provider's paginated compute-listing APIs to exhaustion,
//! filters to running machines, and normalizes the results into a
//! uniform model the chat layer can render.
//!
//! # Module Structure
//!
//! - [`azure`] / [`gcp`] - per-provider models and listing clients
//! - [`paginate`] - provider-agnostic pagination aggregation
//! - [`fanout`] - concurrent project x zone fan-out with partial-failure
//!   collection
//! - [`render`] - chat-facing summaries and card paging
//!
//! # Example
//!
//! ```ignore
//! use vmscout::azure::AzureClient;
//!
//! async fn example(token: &str) -> vmscout::Result<()> {
//!     let mut client = AzureClient::new()?;
//!     client.set_auth_token(token);
//!     let subs = client.list_subscriptions().await?;
//!     let vms = client.list_running_vms(&subs[0]).await?;
//!     Ok(())
//! }
//! ```

pub mod azure;
pub mod config;
pub mod error;
pub mod fanout;
pub mod gcp;
pub mod http;
pub mod paginate;
pub mod render;

pub use error::{Error, Result};
