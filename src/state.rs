use crate::config::AppConfig;
use crate::services::sessions::SessionStore;
use crate::services::upstream::AssistantBackend;

pub struct AppState {
    pub config: AppConfig,
    pub backend: Box<dyn AssistantBackend>,
    pub sessions: SessionStore,
}
