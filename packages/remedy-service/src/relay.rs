//! Server-sent-event relay between the recommendation backend and one client.
//!
//! Each session owns a single upstream connection. Chunks are forwarded untouched as they arrive.
//! Any failure becomes exactly one in-band `data: Error: <message>\n\n` event, after which the
//! stream ends. Dropping the stream drops the upstream response with it.

use std::{convert::Infallible, time::Duration};

use bytes::Bytes;
use futures::{
	StreamExt,
	stream::{self, BoxStream},
};
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::{BoxFuture, RemedyService};

pub const ERROR_EVENT_PREFIX: &str = "data: Error: ";

pub type ChunkStream = BoxStream<'static, Result<Bytes, UpstreamError>>;
/// What the HTTP layer sends; errors are already folded into the byte stream.
pub type RelayStream = BoxStream<'static, Result<Bytes, Infallible>>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamError {
	message: String,
}
impl UpstreamError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}
impl From<remedy_providers::Error> for UpstreamError {
	fn from(err: remedy_providers::Error) -> Self {
		Self::new(err.to_string())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayState {
	Connecting,
	Streaming,
	Closed,
	Failed,
}

enum Session {
	Connecting(BoxFuture<'static, Result<ChunkStream, UpstreamError>>),
	Streaming(ChunkStream),
	Done(RelayState),
}
impl Session {
	fn state(&self) -> RelayState {
		match self {
			Self::Connecting(_) => RelayState::Connecting,
			Self::Streaming(_) => RelayState::Streaming,
			Self::Done(state) => *state,
		}
	}
}

struct Relay {
	session: Session,
	idle_timeout: Option<Duration>,
	forwarded: usize,
	span: Span,
}
impl Relay {
	fn fail(&mut self, err: UpstreamError) -> Result<Bytes, Infallible> {
		self.session = Session::Done(RelayState::Failed);

		tracing::warn!(error = %err, forwarded = self.forwarded, "Relay session failed.");

		Ok(error_event(&err.to_string()))
	}
}

impl RemedyService {
	/// Opens a relay session against the configured upstream.
	///
	/// Nothing happens until the returned stream is first polled.
	pub fn stream_recommendations(&self) -> RelayStream {
		relay(self.upstream.connect(), self.idle_timeout())
	}
}

/// Drives one session from `connect` to completion.
pub fn relay(
	connect: BoxFuture<'static, Result<ChunkStream, UpstreamError>>,
	idle_timeout: Option<Duration>,
) -> RelayStream {
	let session_id = Uuid::new_v4();
	let span = tracing::info_span!("relay", %session_id);
	let relay = Relay { session: Session::Connecting(connect), idle_timeout, forwarded: 0, span };

	stream::unfold(relay, |relay| {
		let span = relay.span.clone();

		step(relay).instrument(span)
	})
	.boxed()
}

/// Formats one terminal error event. Line breaks in `message` would split the event, so they
/// become spaces.
pub fn error_event(message: &str) -> Bytes {
	let message = message.replace(['\r', '\n'], " ");

	Bytes::from(format!("{ERROR_EVENT_PREFIX}{message}\n\n"))
}

pub(crate) fn upstream_chunks(chunks: remedy_providers::ChunkStream) -> ChunkStream {
	chunks.map(|chunk| chunk.map_err(UpstreamError::from)).boxed()
}

async fn step(mut relay: Relay) -> Option<(Result<Bytes, Infallible>, Relay)> {
	loop {
		let state = relay.session.state();

		match std::mem::replace(&mut relay.session, Session::Done(state)) {
			Session::Connecting(connect) => match connect.await {
				Ok(upstream) => {
					tracing::info!("Upstream connected.");

					relay.session = Session::Streaming(upstream);
				},
				Err(err) => {
					let event = relay.fail(err);

					return Some((event, relay));
				},
			},
			Session::Streaming(mut upstream) => {
				let next = match relay.idle_timeout {
					Some(limit) => match tokio::time::timeout(limit, upstream.next()).await {
						Ok(next) => next,
						Err(_) => Some(Err(UpstreamError::new(format!(
							"No data from upstream for {} ms.",
							limit.as_millis()
						)))),
					},
					None => upstream.next().await,
				};

				return match next {
					Some(Ok(chunk)) => {
						relay.forwarded += 1;
						relay.session = Session::Streaming(upstream);

						Some((Ok(chunk), relay))
					},
					Some(Err(err)) => {
						let event = relay.fail(err);

						Some((event, relay))
					},
					None => {
						relay.session = Session::Done(RelayState::Closed);

						tracing::info!(forwarded = relay.forwarded, "Upstream closed.");

						None
					},
				};
			},
			Session::Done(state) => {
				tracing::trace!(?state, "Relay session finished.");

				return None;
			},
		}
	}
}
