use earnings_core::control::EarningsControlPlane;
use earnings_core::source::{AlphaVantageSource, SourceError};
use tracing::warn;

use crate::config::EarningsConfig;

/// Builds the shared control plane over the Alpha Vantage source.
///
/// A missing API key is not fatal here; each tool call reports it as a
/// configuration error instead.
pub fn build_control_plane(config: &EarningsConfig) -> Result<EarningsControlPlane, SourceError> {
    if config.alphavantage.api_key.is_none() {
        warn!("ALPHAVANTAGE_API_KEY is not set; tool calls will fail until it is configured");
    }
    let source = AlphaVantageSource::new(config.alphavantage.clone())?;
    Ok(EarningsControlPlane::from_source(source))
}
