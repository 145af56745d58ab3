//! Market data providers.
//!
//! Each provider retrieves raw price history for one asset at a time and
//! maps its own failure modes onto the shared [`FetchFailure`] taxonomy.
//! Provider responses stay in tagged [`RawSeries`] payloads; only the
//! normalizer converts them to the canonical series shape.
//!
//! | Provider | Module | Transport | Payload |
//! |----------|--------|-----------|---------|
//! | Yahoo Finance | [`yahoo`] | chart API | JSON |
//! | Stooq | [`stooq`] | daily history download | CSV |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AssetSpec;
use crate::http_client::HttpClient;
use crate::FetchFailure;

pub mod stooq;
pub mod yahoo;

pub use stooq::{StooqProvider, StooqRow};
pub use yahoo::{YahooChartResult, YahooIndicators, YahooProvider, YahooQuoteBlock};

/// Identifier of a configured market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Yahoo,
    Stooq,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Stooq => "stooq",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-tagged raw price history payload.
///
/// Keeping the provider shape visible here means the snapshot writer never
/// learns provider quirks; the normalizer is the single conversion point.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSeries {
    Yahoo(YahooChartResult),
    Stooq(Vec<StooqRow>),
}

/// Market data source contract.
///
/// One invocation per asset; implementations must isolate failures so a
/// broken identifier degrades only its own entry.
pub trait MarketDataProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch raw daily price history for one asset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure`] classified as transport, parse, not-found,
    /// or empty; never panics on provider data.
    fn fetch_history<'a>(
        &'a self,
        asset: &'a AssetSpec,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, FetchFailure>> + Send + 'a>>;
}

/// The fixed set of providers available to a run, keyed by [`ProviderId`].
pub struct ProviderSet {
    yahoo: YahooProvider,
    stooq: StooqProvider,
}

impl ProviderSet {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            yahoo: YahooProvider::new(http.clone()),
            stooq: StooqProvider::new(http),
        }
    }

    pub fn get(&self, id: ProviderId) -> &dyn MarketDataProvider {
        match id {
            ProviderId::Yahoo => &self.yahoo,
            ProviderId::Stooq => &self.stooq,
        }
    }
}
