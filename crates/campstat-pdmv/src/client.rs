//! HTTP client for McM and pMp
//!
//! Calls are plain GETs returning JSON. There is no session handling and no
//! retry: a transport error, a non-success status or an unexpected body
//! propagates to the caller as is.

use async_trait::async_trait;
use campstat_core::error::Result;
use campstat_core::provider::HistorySource;
use campstat_core::types::{CampaignHistory, CampaignId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Production McM instance
pub const DEFAULT_MCM_URL: &str = "https://cms-pdmv-prod.web.cern.ch/mcm/";

/// Production pMp instance
pub const DEFAULT_PMP_URL: &str = "https://cms-pdmv-prod.web.cern.ch/pmp/";

/// Resolution requested from the pMp historical API
pub const DEFAULT_GRANULARITY: u32 = 1000;

/// McM prepid patterns of reported campaigns, with a label for logging
pub const CAMPAIGN_PATTERNS: [(&str, &str); 3] = [
    ("AOD", "*UL*RECO*"),
    ("MiniAOD", "*MiniAOD*"),
    ("NanoAOD", "*NanoAOD*"),
];

/// Endpoints and request parameters
#[derive(Debug, Clone)]
pub struct PdmvConfig {
    /// Base URL of McM
    pub mcm_url: String,
    /// Base URL of pMp
    pub pmp_url: String,
    /// Number of points pMp should sample each history into
    pub granularity: u32,
}

impl Default for PdmvConfig {
    fn default() -> Self {
        Self {
            mcm_url: DEFAULT_MCM_URL.to_string(),
            pmp_url: DEFAULT_PMP_URL.to_string(),
            granularity: DEFAULT_GRANULARITY,
        }
    }
}

/// McM search response; McM omits `results` when nothing matched
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CampaignEntry>,
}

#[derive(Debug, Deserialize)]
struct CampaignEntry {
    prepid: CampaignId,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    results: HistoricalResults,
}

#[derive(Debug, Deserialize)]
struct HistoricalResults {
    data: CampaignHistory,
}

/// History source backed by the McM and pMp REST APIs
pub struct PdmvClient {
    client: reqwest::Client,
    config: PdmvConfig,
}

impl PdmvClient {
    /// Create a client for the given endpoints
    pub fn new(config: PdmvConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the configuration in use
    pub fn config(&self) -> &PdmvConfig {
        &self.config
    }

    /// Campaigns whose prepid matches an McM search pattern
    async fn search_campaigns(&self, pattern: &str) -> Result<Vec<CampaignId>> {
        let url = join_url(&self.config.mcm_url, "search/");
        let response: SearchResponse = self
            .get_json(
                &url,
                &[
                    ("db_name", "campaigns".to_string()),
                    ("page", "-1".to_string()),
                    ("prepid", pattern.to_string()),
                ],
            )
            .await?;

        Ok(response.results.into_iter().map(|c| c.prepid).collect())
    }

    /// Every ReReco campaign known to pMp
    async fn rereco_campaigns(&self) -> Result<Vec<CampaignId>> {
        let url = join_url(&self.config.pmp_url, "api/objects");
        self.get_json(&url, &[("r", "rereco_campaigns".to_string())])
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl HistorySource for PdmvClient {
    async fn list_campaigns(&self) -> Result<Vec<CampaignId>> {
        let mut campaigns = Vec::new();
        for (label, pattern) in CAMPAIGN_PATTERNS {
            let found = self.search_campaigns(pattern).await?;
            info!("{} {} started campaigns", found.len(), label);
            campaigns.extend(found);
        }

        let rereco = self.rereco_campaigns().await?;
        info!("{} ReReco campaigns", rereco.len());
        campaigns.extend(rereco);

        Ok(campaigns)
    }

    async fn fetch_history(&self, campaign: &CampaignId) -> Result<CampaignHistory> {
        let url = join_url(&self.config.pmp_url, "api/historical");
        let response: HistoricalResponse = self
            .get_json(
                &url,
                &[
                    ("r", campaign.to_string()),
                    ("granularity", self.config.granularity.to_string()),
                    ("aggregate", "False".to_string()),
                ],
            )
            .await?;

        Ok(response.results.data)
    }
}

/// Append `path` to `base` with exactly one slash between them
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://example.org/pmp/", "api/historical"),
            "https://example.org/pmp/api/historical"
        );
        assert_eq!(
            join_url("https://example.org/mcm", "/search/"),
            "https://example.org/mcm/search/"
        );
    }

    #[test]
    fn test_client_creation() {
        let client = PdmvClient::new(PdmvConfig::default()).unwrap();
        assert_eq!(client.config().granularity, DEFAULT_GRANULARITY);
        assert_eq!(client.config().pmp_url, DEFAULT_PMP_URL);
    }

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{"results": [
            {"prepid": "RunIISummer20UL17RECO", "status": "started"},
            {"prepid": "RunIISummer20UL18RECO"}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let ids: Vec<&str> = response.results.iter().map(|c| c.prepid.as_str()).collect();
        assert_eq!(ids, vec!["RunIISummer20UL17RECO", "RunIISummer20UL18RECO"]);

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn test_rereco_list_parsing() {
        let ids: Vec<CampaignId> =
            serde_json::from_str(r#"["Run2022C", "Run2022D"]"#).unwrap();
        assert_eq!(ids[1].as_str(), "Run2022D");
    }

    #[test]
    fn test_historical_response_parsing() {
        let body = r#"{"results": {"data": {
            "HIG": {"block1": [
                {"time": 1700000000000.0, "done": 1, "produced": 2, "invalid": 0, "expected": 10},
                {"time": 1700000500000.0, "done": 4, "produced": 0, "invalid": 1, "expected": 10}
            ]},
            "SUS": {}
        }}}"#;
        let response: HistoricalResponse = serde_json::from_str(body).unwrap();
        let data = response.results.data;
        assert_eq!(data.len(), 2);
        assert_eq!(data["HIG"]["block1"].len(), 2);
        assert_eq!(data["HIG"]["block1"][1].counts().events(), 5);
        assert!(data["SUS"].is_empty());
    }

    #[test]
    fn test_historical_response_missing_field_fails() {
        let body = r#"{"results": {"data": {"HIG": {"block1": [{"time": 1.0, "done": 1}]}}}}"#;
        assert!(serde_json::from_str::<HistoricalResponse>(body).is_err());
    }
}
