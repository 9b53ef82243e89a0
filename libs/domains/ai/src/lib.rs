//! AI Domain
//!
//! Stateless helpers layered over a text-generation backend:
//!
//! - price suggestions grounded in comparable listings
//! - marketing copy in three flavors
//! - role-aware recommendations and mentorship matching
//! - audio story transcription
//!
//! Without `OPENAI_API_KEY` the offline generator drafts from the prompt so the
//! endpoints stay usable in development.

mod config;
mod error;
mod generator;
pub mod handlers;
mod models;
mod mongodb;
mod repository;
mod service;
mod transcriber;

pub use config::OpenAiConfig;
pub use error::{AiError, AiResult};
pub use generator::{
    GenerationRequest, OfflineTextGenerator, OpenAiTextGenerator, TextGenerator, text_generator,
};
pub use handlers::{ApiDoc, router};
pub use mongodb::MongoAiRepository;
pub use repository::AiRepository;
pub use service::AiService;
pub use transcriber::{StaticTranscriber, Transcriber, Transcript};
