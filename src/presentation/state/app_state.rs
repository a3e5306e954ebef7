use std::sync::Arc;

use crate::application::services::{CapabilityManager, JournalService};

#[derive(Clone)]
pub struct AppState {
    pub journal_service: Arc<JournalService>,
    pub capabilities: Arc<CapabilityManager>,
}
