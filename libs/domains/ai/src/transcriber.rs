//! Audio story transcription

use async_trait::async_trait;

use crate::error::AiResult;

/// Returned by [`StaticTranscriber`] for every recording
pub const SAMPLE_STORY: &str = "I've been crafting pottery for over 15 years, learning the art from my grandmother who taught me the traditional techniques passed down through generations. Each piece I create tells a story of our heritage and the beauty of handmade craftsmanship.";

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub confidence: f64,
}

/// Speech-to-text over a hosted recording
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_url: &str) -> AiResult<Transcript>;
}

/// Fixed transcript; stands in until a speech-to-text backend is wired up
pub struct StaticTranscriber;

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, audio_url: &str) -> AiResult<Transcript> {
        tracing::debug!(audio_url, "Returning sample transcript");
        Ok(Transcript {
            text: SAMPLE_STORY.to_string(),
            confidence: 0.95,
        })
    }
}
