//! Hotel aggregation strategies
//!
//! [`HotelAggregator`] is implemented by a remote places-backed strategy and
//! a synthetic one. [`HotelSearch`] picks between them from the configured
//! mode and always answers: when the remote strategy fails or finds nothing
//! it hands back the synthetic roster together with a notice.

pub mod remote;
pub mod synthetic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::AggregatorMode;
use crate::models::{HotelRecord, ResolvedLocation};

pub use remote::{PlacesProvider, RemoteAggregator};
pub use synthetic::SyntheticAggregator;

/// Source of hotels around a resolved location
#[async_trait]
pub trait HotelAggregator: Send + Sync {
    /// Hotels within `radius_meters` of the location, with distances filled in
    async fn find_hotels(
        &self,
        location: &ResolvedLocation,
        radius_meters: u32,
    ) -> Result<Vec<HotelRecord>>;
}

/// Which strategy produced a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotelSource {
    Remote,
    Synthetic,
}

/// Hotels plus how they were obtained
#[derive(Debug, Clone)]
pub struct HotelSearchOutcome {
    pub hotels: Vec<HotelRecord>,
    pub source: HotelSource,
    /// Set when the result is a fallback the user should know about
    pub notice: Option<String>,
}

const UNAVAILABLE_NOTICE: &str =
    "Hotel search service is not configured. Showing sample hotels instead.";
const EMPTY_NOTICE: &str = "No hotels were found nearby. Showing sample hotels instead.";

/// Mode-selected hotel search with synthetic fallback
pub struct HotelSearch {
    mode: AggregatorMode,
    remote: Option<Box<dyn HotelAggregator>>,
    synthetic: SyntheticAggregator,
}

impl HotelSearch {
    /// `remote` is `None` when no places provider could be built
    #[must_use]
    pub fn new(
        mode: AggregatorMode,
        remote: Option<Box<dyn HotelAggregator>>,
        synthetic: SyntheticAggregator,
    ) -> Self {
        Self {
            mode,
            remote,
            synthetic,
        }
    }

    #[must_use]
    pub fn mode(&self) -> AggregatorMode {
        self.mode
    }

    /// Never fails; see the module docs for the fallback rules
    pub async fn find_hotels(
        &self,
        location: &ResolvedLocation,
        radius_meters: u32,
    ) -> HotelSearchOutcome {
        let remote = match (self.mode, &self.remote) {
            (AggregatorMode::Synthetic, _) => {
                debug!("Synthetic mode, generating sample hotels");
                return self.synthetic_outcome(location, radius_meters, None).await;
            }
            (AggregatorMode::Remote, None) => {
                warn!("Remote hotel search requested but no places provider is configured");
                return self
                    .synthetic_outcome(
                        location,
                        radius_meters,
                        Some(UNAVAILABLE_NOTICE.to_string()),
                    )
                    .await;
            }
            (AggregatorMode::Remote, Some(remote)) => remote,
        };

        match remote.find_hotels(location, radius_meters).await {
            Ok(hotels) if !hotels.is_empty() => {
                info!(
                    "Found {} hotel(s) near {}",
                    hotels.len(),
                    location.display_address
                );
                HotelSearchOutcome {
                    hotels,
                    source: HotelSource::Remote,
                    notice: None,
                }
            }
            Ok(_) => {
                warn!(
                    "Remote search found no hotels near {}, using sample hotels",
                    location.display_address
                );
                self.synthetic_outcome(location, radius_meters, Some(EMPTY_NOTICE.to_string()))
                    .await
            }
            Err(e) => {
                warn!("Remote hotel search failed: {}, using sample hotels", e);
                let notice = format!("{} Showing sample hotels instead.", e.user_message());
                self.synthetic_outcome(location, radius_meters, Some(notice))
                    .await
            }
        }
    }

    async fn synthetic_outcome(
        &self,
        location: &ResolvedLocation,
        radius_meters: u32,
        notice: Option<String>,
    ) -> HotelSearchOutcome {
        // generation is infallible
        let hotels = self
            .synthetic
            .find_hotels(location, radius_meters)
            .await
            .unwrap_or_default();
        HotelSearchOutcome {
            hotels,
            source: HotelSource::Synthetic,
            notice,
        }
    }
}
