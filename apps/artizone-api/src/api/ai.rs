//! AI assistant routes

use axum::Router;
use domain_ai::{AiService, MongoAiRepository, StaticTranscriber, text_generator};
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoAiRepository::new(&state.db);
    let generator = text_generator(&state.config.openai);
    let service = AiService::new(repository, generator, Arc::new(StaticTranscriber));
    domain_ai::router(service)
}
