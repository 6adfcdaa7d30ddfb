//! McM and pMp history source for campstat
//!
//! This crate implements `HistorySource` over HTTP: campaign identifiers
//! come from McM searches plus the pMp ReReco campaign list, and histories
//! come from the pMp historical API.

pub mod client;

pub use client::{PdmvClient, PdmvConfig};
