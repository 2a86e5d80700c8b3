//! Scripted event-stream server standing in for the recommendation backend.

use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
	Router,
	body::{Body, Bytes},
	extract::State,
	http::header::CONTENT_TYPE,
	response::{IntoResponse, Response},
	routing::get,
};
use futures::{StreamExt, stream};
use tokio::{net::TcpListener, task::JoinHandle};

use crate::Result;

pub const STREAM_PATH: &str = "/api/recommendations/stream";

#[derive(Clone, Debug)]
pub enum UpstreamStep {
	/// Sent to the client as one body chunk.
	Chunk(String),
	Pause(Duration),
	/// Aborts the response body mid-stream.
	Fail(String),
}
impl UpstreamStep {
	pub fn chunk(text: &str) -> Self {
		Self::Chunk(text.to_string())
	}
}

pub struct UpstreamServer {
	addr: SocketAddr,
	handle: JoinHandle<()>,
}
impl UpstreamServer {
	/// Binds `127.0.0.1:0` and replays `script` to every client that connects.
	pub async fn spawn(script: Vec<UpstreamStep>) -> Result<Self> {
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let app = Router::new().route(STREAM_PATH, get(replay)).with_state(Arc::new(script));
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, app).await {
				eprintln!("Upstream test server stopped: {err}.");
			}
		});

		Ok(Self { addr, handle })
	}

	pub fn url(&self) -> String {
		format!("http://{}{STREAM_PATH}", self.addr)
	}
}
impl Drop for UpstreamServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn replay(State(script): State<Arc<Vec<UpstreamStep>>>) -> Response {
	let steps = script.as_ref().clone();
	let body = stream::iter(steps)
		.then(|step| async move {
			match step {
				UpstreamStep::Chunk(text) => Some(Ok(Bytes::from(text))),
				UpstreamStep::Pause(duration) => {
					tokio::time::sleep(duration).await;

					None
				},
				UpstreamStep::Fail(message) => Some(Err(io::Error::other(message))),
			}
		})
		.filter_map(|item| async move { item });

	([(CONTENT_TYPE, "text/event-stream")], Body::from_stream(body)).into_response()
}
