pub mod recommendation_stream;

mod error;

pub use error::{Error, Result};
pub use recommendation_stream::{ChunkStream, StreamClient};
