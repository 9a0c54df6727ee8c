use std::sync::Arc;

use loupe_service::SessionService;
use loupe_store::mongo::MongoSessionStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SessionService>,
}
impl AppState {
	pub async fn new(config: loupe_config::Config) -> color_eyre::Result<Self> {
		let store = MongoSessionStore::connect(&config.storage.mongo).await?;
		let service = SessionService::new(config, Arc::new(store));

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: Arc<SessionService>) -> Self {
		Self { service }
	}
}
