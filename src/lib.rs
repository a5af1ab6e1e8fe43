pub mod error;
pub mod normalize;
pub mod payload;
pub mod provider;
pub mod save;
pub mod select;
pub mod server;
pub mod types;
pub mod validate;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::error::{EmptyResultWarning, PinError};
    pub use crate::provider::{PinSource, ProviderConfig, RapidApiSource};
    pub use crate::save::{media_filename, MediaSaver, SaveOutcome};
    pub use crate::types::{Author, MediaItem, MediaKind, PinResult, ProviderEnvelope};
    pub use crate::{FetchOutcome, PinFetcher};
}

use std::sync::Arc;

use tracing::Instrument;

use crate::error::{EmptyResultWarning, PinError};
use crate::provider::PinSource;
use crate::types::PinResult;

/// A normalized pin plus a soft warning when it carries no media.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub pin: PinResult,
    pub warning: Option<EmptyResultWarning>,
}

/// Request entry point: validate, fetch once, normalize, deduplicate.
/// Holds no per-request state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct PinFetcher {
    source: Arc<dyn PinSource>,
}

impl PinFetcher {
    pub fn new<S: PinSource + 'static>(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, PinError> {
        let url = validate::validate(url)?;
        let span = tracing::info_span!("fetch_pin", url = %url);
        async {
            let envelope = self.source.fetch_raw(&url).await?;
            if !envelope.is_success() {
                tracing::warn!(
                    status = ?envelope.status(),
                    message = ?envelope.message(),
                    "provider reported failure"
                );
                return Err(PinError::upstream(envelope.message().map(str::to_string)));
            }
            let data = envelope.data().filter(|d| d.is_object()).ok_or_else(|| {
                PinError::UpstreamRequestFailed(provider::MALFORMED_RESPONSE.to_string())
            })?;

            let pin = normalize::extract(data);
            tracing::debug!(
                id = %pin.id,
                images = pin.images.len(),
                videos = pin.videos.len(),
                "normalized pin"
            );
            let warning = pin.is_empty().then_some(EmptyResultWarning);
            Ok(FetchOutcome { pin, warning })
        }
        .instrument(span)
        .await
    }
}
