//! Report sources and the Alpha Vantage implementation.
//!
//! The control plane only sees the `ReportSource` trait; transports and
//! credentials stay behind it.

pub mod alphavantage;

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use earnings_store::models::{CompanySymbol, QuarterlyReportsResponse, ReportType};

pub use alphavantage::{AlphaVantageConfig, AlphaVantageSource};

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<QuarterlyReportsResponse, SourceError>> + Send + 'a>>;

/// Fetches raw quarterly statements for a company.
pub trait ReportSource: Send + Sync {
    fn fetch_quarterly_reports(
        &self,
        report_type: ReportType,
        symbol: CompanySymbol,
    ) -> FetchFuture<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A required credential was not configured. Raised before any request.
    MissingCredential(&'static str),
    /// Timeout, connection failure, or non-success HTTP status.
    Transport(String),
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential(name) => write!(f, "missing required setting: {name}"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Decode(message) => write!(f, "decode error: {message}"),
        }
    }
}

impl Error for SourceError {}
