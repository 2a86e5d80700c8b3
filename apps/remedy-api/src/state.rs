use std::sync::Arc;

use remedy_model::Artifacts;
use remedy_service::RemedyService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RemedyService>,
}
impl AppState {
	/// Loads every artifact up front; an incoherent set fails here, before anything binds.
	pub fn new(config: remedy_config::Config) -> color_eyre::Result<Self> {
		let artifacts = Artifacts::load(&config.artifacts)?;
		let service = RemedyService::new(config, artifacts)?;

		Ok(Self { service: Arc::new(service) })
	}
}
