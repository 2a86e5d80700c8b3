// std
use std::time::Duration as StdDuration;

// crates.io
use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use reqwest::{
	Client,
	header::{ACCEPT, CACHE_CONTROL},
};

use crate::{Error, Result};

pub type ChunkStream = BoxStream<'static, Result<Bytes>>;

/// HTTP client for the recommendation backend's event-stream endpoint.
///
/// Only the connect phase is bounded; reads have no deadline since the feed is long-lived.
#[derive(Clone, Debug)]
pub struct StreamClient {
	client: Client,
	url: String,
}
impl StreamClient {
	pub fn new(cfg: &remedy_config::Relay) -> Result<Self> {
		if cfg.upstream_url.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "relay.upstream_url must be non-empty.".to_string(),
			});
		}

		let client = Client::builder()
			.connect_timeout(StdDuration::from_millis(cfg.connect_timeout_ms))
			.build()?;

		Ok(Self { client, url: cfg.upstream_url.clone() })
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Opens one upstream connection and returns its body as raw chunks.
	///
	/// Non-success statuses fail here rather than being relayed as data. Dropping the returned
	/// stream closes the connection.
	pub async fn connect(&self) -> Result<ChunkStream> {
		let res = self
			.client
			.get(&self.url)
			.header(ACCEPT, "text/event-stream")
			.header(CACHE_CONTROL, "no-cache")
			.send()
			.await?
			.error_for_status()?;

		tracing::debug!(url = %self.url, status = %res.status(), "Upstream stream opened.");

		Ok(res.bytes_stream().map(|chunk| chunk.map_err(Error::from)).boxed())
	}
}
