//! Azure management-plane client
//!
//! Listing operations against the Azure Resource Manager: subscription
//! discovery and paginated virtual-machine listing. Continuation is via
//! `nextLink`, a complete absolute URL that has to be decomposed into
//! path + query before reuse, since the client always talks to its own
//! configured host.

use serde_json::Value;
use url::Url;

use super::models::{Subscription, Vm};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::paginate::{drain, Page, PageToken};

/// Public Azure management plane.
pub const DEFAULT_BASE_URL: &str = "https://management.azure.com";

const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";
const VMS_API_VERSION: &str = "2020-06-01";

pub struct AzureClient {
    http: HttpClient,
}

impl AzureClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a non-default management endpoint (sovereign
    /// clouds, test servers).
    pub fn with_base_url(base: &str) -> Result<Self> {
        Ok(Self { http: HttpClient::new(base)? })
    }

    /// Attach the bearer token for this session.
    pub fn set_auth_token(&mut self, token: &str) {
        self.http.set_auth_token(token);
    }

    /// List the subscriptions visible to the signed-in user.
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let data = self
            .http
            .get("subscriptions", &[("api-version", SUBSCRIPTIONS_API_VERSION)])
            .await?;

        let raw = data
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Contract("subscription listing has no value array".into()))?;

        Ok(raw
            .iter()
            .map(|sub| Subscription {
                id: string_field(sub, "subscriptionId"),
                name: string_field(sub, "displayName"),
            })
            .collect())
    }

    /// Fetch one page of the subscription's VM listing.
    ///
    /// `keep` filters the page after normalization; rejected VMs are
    /// silently dropped without affecting pagination. The request asks
    /// for `statusOnly=true` so Azure returns instance-view status
    /// instead of full machine models.
    pub async fn list_vms_page<F>(
        &self,
        subscription: &Subscription,
        token: Option<PageToken>,
        keep: F,
    ) -> Result<Page<Vm>>
    where
        F: Fn(&Vm) -> bool,
    {
        let data = match token {
            None => {
                let path = format!(
                    "subscriptions/{}/providers/Microsoft.Compute/virtualMachines",
                    subscription.id
                );
                self.http
                    .get(&path, &[("api-version", VMS_API_VERSION), ("statusOnly", "true")])
                    .await?
            }
            Some(PageToken::NextLink(link)) => {
                let (path, query) = decompose_next_link(&link)?;
                let query: Vec<(&str, &str)> =
                    query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                self.http.get(&path, &query).await?
            }
            Some(PageToken::Opaque(_)) => {
                return Err(Error::Contract("Azure VM listing expects a nextLink token".into()))
            }
        };

        let raw = data
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Contract("VM listing has no value array".into()))?;

        let items = raw.iter().map(Vm::from_raw).filter(|vm| keep(vm)).collect();

        let next = data
            .get("nextLink")
            .and_then(Value::as_str)
            .map(|link| PageToken::NextLink(link.to_string()));

        Ok(Page { items, next })
    }

    /// All running VMs in the subscription, across every resource group,
    /// aggregated over the full pagination.
    pub async fn list_running_vms(&self, subscription: &Subscription) -> Result<Vec<Vm>> {
        drain(|token| self.list_vms_page(subscription, token, Vm::is_running)).await
    }
}

fn string_field(raw: &Value, field: &str) -> String {
    raw.get(field).and_then(|v| v.as_str()).unwrap_or("-").to_string()
}

/// Split a `nextLink` URL into path and query pairs, discarding
/// scheme and host.
fn decompose_next_link(link: &str) -> Result<(String, Vec<(String, String)>)> {
    let url = Url::parse(link)
        .map_err(|e| Error::Contract(format!("unparseable nextLink {link}: {e}")))?;

    let path = url.path().trim_start_matches('/').to_string();
    let query = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok((path, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_splits_into_path_and_query() {
        let link = "https://management.azure.com/subscriptions/S/providers/Microsoft.Compute/virtualMachines?api-version=2020-06-01&statusOnly=true&%24skiptoken=abc%3D%3D";
        let (path, query) = decompose_next_link(link).unwrap();

        assert_eq!(path, "subscriptions/S/providers/Microsoft.Compute/virtualMachines");
        assert!(query.contains(&("api-version".to_string(), "2020-06-01".to_string())));
        assert!(query.contains(&("$skiptoken".to_string(), "abc==".to_string())));
    }

    #[test]
    fn malformed_next_link_is_a_contract_error() {
        assert!(matches!(
            decompose_next_link("not a url"),
            Err(Error::Contract(_))
        ));
    }
}
