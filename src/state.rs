use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::hotel::{AccountService, BookingLedger, IdentityProvider, RoomDirectory};
use crate::services::session::SessionStore;

pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub sessions: Arc<dyn SessionStore>,
    pub rooms: Box<dyn RoomDirectory>,
    pub bookings: Box<dyn BookingLedger>,
    pub accounts: Box<dyn AccountService>,
    pub identity: Box<dyn IdentityProvider>,
}
