//! License registry boundary — the external record source strategies
//! query against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::snapshot::LicenseStatus;

use super::strategy::RegistryQuery;

/// A contractor license record as returned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub license_number: String,
    /// Licensed business or individual name.
    pub holder_name: String,
    /// Qualifying individual on the license, when listed.
    pub qualifier_name: Option<String>,
    pub state: String,
    pub status: LicenseStatus,
}

/// Async lookup against a license registry.
#[async_trait]
pub trait LicenseRegistry: Send + Sync + 'static {
    /// Search for the best single record for a query. `Ok(None)` means no
    /// record; errors are lookup failures the waterfall records and moves
    /// past.
    async fn search(&self, query: &RegistryQuery) -> anyhow::Result<Option<LicenseRecord>>;
}

/// HTTP-backed registry client.
pub struct HttpLicenseRegistry {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    records: Vec<LicenseRecord>,
}

impl HttpLicenseRegistry {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl LicenseRegistry for HttpLicenseRegistry {
    async fn search(&self, query: &RegistryQuery) -> anyhow::Result<Option<LicenseRecord>> {
        let url = format!("{}/v1/licenses/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("field", query.field.as_str()),
                ("key", query.key.as_str()),
                ("state", query.state.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(body.records.into_iter().next())
    }
}

/// In-memory registry used by tests and the CLI fixtures.
pub struct StaticRegistry {
    records: Vec<LicenseRecord>,
}

impl StaticRegistry {
    pub fn new(records: Vec<LicenseRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

#[async_trait]
impl LicenseRegistry for StaticRegistry {
    async fn search(&self, query: &RegistryQuery) -> anyhow::Result<Option<LicenseRecord>> {
        let key = query.key.to_lowercase();
        let hit = self.records.iter().find(|r| {
            if !r.state.eq_ignore_ascii_case(&query.state) {
                return false;
            }
            match query.field.as_str() {
                "license_number" => r.license_number.eq_ignore_ascii_case(&query.key),
                "business_name" => r.holder_name.to_lowercase().contains(&key),
                "qualifier_name" => r
                    .qualifier_name
                    .as_deref()
                    .is_some_and(|q| q.to_lowercase().contains(&key)),
                _ => false,
            }
        });
        Ok(hit.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LicenseRecord {
        LicenseRecord {
            license_number: "ROC-331407".to_string(),
            holder_name: "Canyon HVAC LLC".to_string(),
            qualifier_name: Some("Dana Whitfield".to_string()),
            state: "AZ".to_string(),
            status: LicenseStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_static_registry_matches_by_number() {
        let registry = StaticRegistry::new(vec![record()]);
        let query = RegistryQuery {
            field: "license_number".to_string(),
            key: "roc-331407".to_string(),
            state: "az".to_string(),
        };
        let hit = registry.search(&query).await.unwrap();
        assert_eq!(hit.unwrap().holder_name, "Canyon HVAC LLC");
    }

    #[tokio::test]
    async fn test_static_registry_scopes_by_state() {
        let registry = StaticRegistry::new(vec![record()]);
        let query = RegistryQuery {
            field: "business_name".to_string(),
            key: "canyon hvac".to_string(),
            state: "NV".to_string(),
        };
        assert!(registry.search(&query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_registry_qualifier_search() {
        let registry = StaticRegistry::new(vec![record()]);
        let query = RegistryQuery {
            field: "qualifier_name".to_string(),
            key: "dana whitfield".to_string(),
            state: "AZ".to_string(),
        };
        assert!(registry.search(&query).await.unwrap().is_some());
    }

    #[test]
    fn test_license_record_serde_roundtrip() {
        let r = record();
        let json = serde_json::to_string(&r).unwrap();
        let back: LicenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
