//! Source trait for campaign histories
//!
//! This module defines the `HistorySource` trait that the remote client
//! implements. Report generation only ever talks to the monitoring service
//! through it, so tests can substitute an in-memory source.

use crate::error::Result;
use crate::types::{CampaignHistory, CampaignId};
use async_trait::async_trait;

/// Access to campaign identifiers and their production history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Identifiers of every campaign to report on.
    async fn list_campaigns(&self) -> Result<Vec<CampaignId>>;

    /// Cumulative snapshots of one campaign, grouped by PWG and priority block.
    async fn fetch_history(&self, campaign: &CampaignId) -> Result<CampaignHistory>;
}
