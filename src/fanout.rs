//! Concurrent fan-out across listing scopes
//!
//! Compute Engine listing is scoped to a single project+zone pair, so
//! covering a user's running instances means one pagination drain per
//! (project, zone) combination. The coordinator runs those drains
//! concurrently under a configurable limit and joins all of them - it
//! needs the full result set, not the first one back.
//!
//! Cross-scope ordering is completion order and is not guaranteed;
//! within one scope, page order is strict.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};

use crate::error::{Error, Result};
use crate::gcp::{GcpClient, Instance, Project};

/// Default cap on concurrently running scope tasks.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Outcome of the capability-probe pass over candidate projects.
#[derive(Debug)]
pub struct CapabilityFilter {
    /// Projects with the Compute Engine API enabled, in input order.
    pub enabled: Vec<Project>,
    /// Projects the probe excluded (403), as the set difference
    /// candidates - enabled by project-ID equality.
    pub excluded: Vec<Project>,
}

/// One scope whose listing failed after the capability filter passed it.
#[derive(Debug)]
pub struct ScopeFailure {
    pub project: String,
    pub zone: String,
    pub error: Error,
}

/// Aggregated fan-out result: every instance from the scopes that
/// succeeded, plus the scopes that did not. One broken scope no longer
/// aborts the whole listing.
#[derive(Debug)]
pub struct FanOut {
    pub instances: Vec<Instance>,
    pub failures: Vec<ScopeFailure>,
}

impl FanOut {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Probe every candidate project concurrently and partition into
/// (enabled, excluded).
///
/// Only the probe's 403 is recovered per project; any other probe
/// failure aborts the pass, since it is not safe to read e.g. a 500 as
/// "API not enabled".
pub async fn filter_compute_enabled_projects(
    client: &GcpClient,
    projects: &[Project],
    limit: usize,
) -> Result<CapabilityFilter> {
    let probes = stream::iter(
        projects
            .iter()
            .map(|project| client.validate_compute_engine_api_available(project)),
    )
    .buffer_unordered(limit.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut enabled_ids: HashSet<Project> = HashSet::new();
    for probe in probes {
        if let Some(project) = probe? {
            enabled_ids.insert(project);
        }
    }

    let enabled = projects.iter().filter(|p| enabled_ids.contains(*p)).cloned().collect();
    let excluded = projects.iter().filter(|p| !enabled_ids.contains(*p)).cloned().collect();

    Ok(CapabilityFilter { enabled, excluded })
}

/// Drain every (project, zone) scope concurrently and merge the results.
///
/// All scope tasks are launched eagerly and the call suspends until
/// every one of them has completed (a join, not a race). Failed scopes
/// are collected into [`FanOut::failures`] instead of aborting the rest.
pub async fn collect_running_instances(
    client: &GcpClient,
    projects: &[Project],
    zones: &[&str],
    limit: usize,
) -> FanOut {
    let scopes: Vec<(&str, &str)> = projects
        .iter()
        .flat_map(|p| zones.iter().map(move |zone| (p.id.as_str(), *zone)))
        .collect();

    tracing::debug!(
        scopes = scopes.len(),
        limit,
        "listing running instances across project x zone scopes"
    );

    let results = stream::iter(scopes.into_iter().map(|(project, zone)| async move {
        client
            .list_running_instances(project, zone)
            .await
            .map_err(|error| ScopeFailure {
                project: project.to_string(),
                zone: zone.to_string(),
                error,
            })
    }))
    .buffer_unordered(limit.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut instances = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(batch) => instances.extend(batch),
            Err(failure) => {
                tracing::warn!(
                    project = %failure.project,
                    zone = %failure.zone,
                    error = %failure.error,
                    "scope listing failed"
                );
                failures.push(failure);
            }
        }
    }

    FanOut { instances, failures }
}
