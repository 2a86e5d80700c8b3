pub mod predict;
pub mod recommend;
pub mod relay;

mod error;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use remedy_config::Config;
use remedy_model::Artifacts;
use remedy_providers::StreamClient;

pub use error::{Error, Result};
pub use predict::{PredictRequest, PredictResponse};
pub use recommend::{RecommendationRequest, RecommendationResponse};
pub use relay::{ChunkStream, RelayState, RelayStream, UpstreamError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of the recommendation event stream.
///
/// The returned future must not borrow `self`; a relay session outlives the call that started
/// it.
pub trait UpstreamProvider
where
	Self: Send + Sync,
{
	fn connect(&self) -> BoxFuture<'static, Result<ChunkStream, UpstreamError>>;
}

pub struct RemedyService {
	pub cfg: Config,
	artifacts: Artifacts,
	upstream: Arc<dyn UpstreamProvider>,
}
impl RemedyService {
	pub fn new(cfg: Config, artifacts: Artifacts) -> Result<Self> {
		let upstream = Arc::new(DefaultUpstream { client: StreamClient::new(&cfg.relay)? });

		Ok(Self { cfg, artifacts, upstream })
	}

	pub fn with_upstream(
		cfg: Config,
		artifacts: Artifacts,
		upstream: Arc<dyn UpstreamProvider>,
	) -> Self {
		Self { cfg, artifacts, upstream }
	}

	pub fn artifacts(&self) -> &Artifacts {
		&self.artifacts
	}

	pub(crate) fn idle_timeout(&self) -> Option<Duration> {
		self.cfg.relay.idle_timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
	}
}

struct DefaultUpstream {
	client: StreamClient,
}
impl UpstreamProvider for DefaultUpstream {
	fn connect(&self) -> BoxFuture<'static, Result<ChunkStream, UpstreamError>> {
		let client = self.client.clone();

		Box::pin(async move {
			let chunks = client.connect().await?;

			Ok(relay::upstream_chunks(chunks))
		})
	}
}
