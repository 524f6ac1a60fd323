//! GCP client
//!
//! Listing operations against the Resource Manager and Compute Engine
//! APIs: project discovery, the per-project Compute Engine capability
//! probe, and paginated running-instance listing. Continuation is via a
//! bare `pageToken` echoed back as a query parameter.

use reqwest::StatusCode;
use serde_json::Value;

use super::models::{Instance, InstanceState, Project};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::paginate::{drain, Page, PageToken};

/// Public Compute Engine endpoint.
pub const DEFAULT_COMPUTE_BASE_URL: &str = "https://compute.googleapis.com";
/// Public Resource Manager endpoint.
pub const DEFAULT_RESOURCE_MANAGER_BASE_URL: &str = "https://cloudresourcemanager.googleapis.com";

pub struct GcpClient {
    resource_manager: HttpClient,
    compute: HttpClient,
}

impl GcpClient {
    pub fn new() -> Result<Self> {
        Self::with_base_urls(DEFAULT_RESOURCE_MANAGER_BASE_URL, DEFAULT_COMPUTE_BASE_URL)
    }

    /// Point both API clients at non-default endpoints (test servers).
    pub fn with_base_urls(resource_manager: &str, compute: &str) -> Result<Self> {
        Ok(Self {
            resource_manager: HttpClient::new(resource_manager)?,
            compute: HttpClient::new(compute)?,
        })
    }

    /// Attach the bearer token for this session to both API clients.
    pub fn set_auth_token(&mut self, token: &str) {
        self.resource_manager.set_auth_token(token);
        self.compute.set_auth_token(token);
    }

    /// List the user's projects, keeping only active ones. Projects in
    /// any other lifecycle state (pending deletion etc.) are silently
    /// excluded. Order is preserved. The endpoint is not paginated.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let data = self.resource_manager.get("v1/projects", &[]).await?;

        let projects = data
            .get("projects")
            .and_then(Value::as_array)
            .map(|raw| {
                raw.iter()
                    .filter(|p| {
                        p.get("lifecycleState").and_then(Value::as_str) == Some("ACTIVE")
                    })
                    .map(|p| Project {
                        id: string_field(p, "projectId"),
                        name: string_field(p, "name"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(projects)
    }

    /// Probe whether the Compute Engine API is enabled for the project.
    ///
    /// Returns the project if available, `None` if the probe came back
    /// 403 (API not enabled). Any other failure propagates - a non-403
    /// error does not mean "unavailable".
    pub async fn validate_compute_engine_api_available(
        &self,
        project: &Project,
    ) -> Result<Option<Project>> {
        let path = format!("compute/v1/projects/{}", project.id);
        match self.compute.get(&path, &[]).await {
            Ok(_) => Ok(Some(project.clone())),
            Err(e) if e.status() == Some(StatusCode::FORBIDDEN) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch one page of running instances in a project+zone scope.
    ///
    /// The request carries a server-side `status = RUNNING` filter, so a
    /// returned instance in any other state is a provider-contract
    /// violation and fails the listing loudly.
    pub async fn list_running_page(
        &self,
        project: &str,
        zone: &str,
        token: Option<PageToken>,
    ) -> Result<Page<Instance>> {
        let path = format!("compute/beta/projects/{project}/zones/{zone}/instances");
        let filter = format!("status = {}", InstanceState::Running.as_str());

        let mut query = vec![("filter", filter.as_str())];
        let token = match token {
            None => None,
            Some(PageToken::Opaque(t)) => Some(t),
            Some(PageToken::NextLink(_)) => {
                return Err(Error::Contract("GCP listing expects a bare page token".into()))
            }
        };
        if let Some(t) = &token {
            query.push(("pageToken", t.as_str()));
        }

        let data = self.compute.get(&path, &query).await?;

        // an absent items array means an empty zone, not an error
        let empty = Vec::new();
        let raw_items = data.get("items").and_then(Value::as_array).unwrap_or(&empty);

        let mut items = Vec::new();
        for raw in raw_items {
            let state = raw.get("status").and_then(Value::as_str).unwrap_or("");
            if state != InstanceState::Running.as_str() {
                return Err(Error::Contract(format!(
                    "got an instance that is not in RUNNING state: instance_state={state}"
                )));
            }

            items.push(Instance {
                id: string_field(raw, "id"),
                name: string_field(raw, "name"),
                zone: zone.to_string(),
                project: project.to_string(),
                state: InstanceState::Running,
            });
        }

        let next = data
            .get("nextPageToken")
            .and_then(Value::as_str)
            .map(|t| PageToken::Opaque(t.to_string()));

        Ok(Page { items, next })
    }

    /// All running instances in one project+zone scope, aggregated over
    /// the full pagination.
    pub async fn list_running_instances(&self, project: &str, zone: &str) -> Result<Vec<Instance>> {
        drain(|token| self.list_running_page(project, zone, token)).await
    }
}

fn string_field(raw: &Value, field: &str) -> String {
    raw.get(field).and_then(|v| v.as_str()).unwrap_or("-").to_string()
}
