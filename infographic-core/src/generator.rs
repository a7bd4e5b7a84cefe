//! Generation client boundary.
//!
//! A [`Generator`] turns a topic plus the cards generated so far into raw
//! model text. Parsing that text is the extractor's job, not the generator's.

use crate::card::Card;
use crate::config::GeneratorConfig;
use crate::prompt::{regenerate_prompt, section_prompt, system_prompt};
use async_trait::async_trait;
use claude::{Claude, ContentBlock, Message, Request, Response, ServerTool, StopReason};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by a generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No API key configured - set ANTHROPIC_API_KEY")]
    NoApiKey,

    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("The model declined to answer")]
    Refused,

    #[error("{0}")]
    Other(String),
}

/// Something that can produce infographic card text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce the next section for `topic`, given every card so far.
    async fn generate(&self, topic: &str, history: &[Card]) -> Result<String, GenerationError>;

    /// Produce a replacement for the card at `index` of `history`.
    async fn regenerate(
        &self,
        topic: &str,
        history: &[Card],
        index: usize,
    ) -> Result<String, GenerationError>;
}

/// Generator backed by the Claude Messages API.
pub struct ClaudeGenerator {
    client: Option<Claude>,
    config: GeneratorConfig,
}

impl ClaudeGenerator {
    /// Create a generator from configuration.
    ///
    /// A missing API key is not an error here; each request fails with
    /// [`GenerationError::NoApiKey`] instead, so the interface can still start.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let client = match config.api_key.as_deref() {
            Some(key) => {
                let client = Claude::new(key)?;
                Some(match config.model.as_deref() {
                    Some(model) => client.with_model(model),
                    None => client,
                })
            }
            None => {
                warn!("ANTHROPIC_API_KEY is not set; generation requests will fail");
                None
            }
        };
        Ok(Self { client, config })
    }

    pub fn has_credentials(&self) -> bool {
        self.client.is_some()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build_request(&self, prompt: String) -> Request {
        let mut request = Request::new(vec![Message::user(prompt)])
            .with_system(system_prompt())
            .with_max_tokens(self.config.max_tokens);
        if let Some(temp) = self.config.temperature {
            request = request.with_temperature(temp);
        }
        if self.config.web_search {
            request = request.with_tool(ServerTool::WebSearch {
                max_uses: self.config.max_searches,
            });
        }
        request
    }

    async fn send(&self, prompt: String) -> Result<String, GenerationError> {
        let client = self.client.as_ref().ok_or(GenerationError::NoApiKey)?;
        debug!(prompt_chars = prompt.len(), "requesting cards");

        let response = client.complete(self.build_request(prompt)).await?;
        match response.stop_reason {
            StopReason::Refusal => return Err(GenerationError::Refused),
            StopReason::MaxTokens => warn!("response hit the token limit; JSON may be truncated"),
            StopReason::PauseTurn => warn!("server tool turn was paused; response may be partial"),
            _ => {}
        }

        log_searches(&response);
        let text = response.text();
        info!(
            chars = text.len(),
            citations = response.citations().len(),
            searches = response.usage.web_search_requests,
            output_tokens = response.usage.output_tokens,
            "generation complete"
        );
        Ok(text)
    }
}

fn log_searches(response: &Response) {
    for block in &response.content {
        match block {
            ContentBlock::ServerToolUse { name, input, .. } => {
                let query = input.get("query").and_then(|q| q.as_str()).unwrap_or_default();
                debug!(tool = %name, query, "server tool call");
            }
            ContentBlock::WebSearchResults { results, .. } => {
                debug!(hits = results.len(), "search results");
            }
            ContentBlock::Text { .. } => {}
        }
    }
}

#[async_trait]
impl Generator for ClaudeGenerator {
    async fn generate(&self, topic: &str, history: &[Card]) -> Result<String, GenerationError> {
        self.send(section_prompt(topic, history)).await
    }

    async fn regenerate(
        &self,
        topic: &str,
        history: &[Card],
        index: usize,
    ) -> Result<String, GenerationError> {
        self.send(regenerate_prompt(topic, history, index)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_per_request() {
        let generator = ClaudeGenerator::new(GeneratorConfig::default()).unwrap();
        assert!(!generator.has_credentials());

        let result = generator.generate("Volcanoes", &[]).await;
        assert!(matches!(result, Err(GenerationError::NoApiKey)));

        let result = generator.regenerate("Volcanoes", &[Card::title("V")], 0).await;
        assert!(matches!(result, Err(GenerationError::NoApiKey)));
    }

    #[test]
    fn test_request_carries_config() {
        let generator = ClaudeGenerator::new(
            GeneratorConfig::new()
                .with_api_key("test-key")
                .with_max_tokens(1000)
                .with_temperature(0.3)
                .with_max_searches(3),
        )
        .unwrap();
        assert!(generator.has_credentials());

        let request = generator.build_request("prompt".to_string());
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.temperature, Some(0.3));
        assert!(request.system.as_deref().unwrap_or("").contains("## Role"));
        assert_eq!(request.tools.len(), 1);
        assert!(matches!(
            request.tools[0],
            ServerTool::WebSearch { max_uses: Some(3) }
        ));
    }

    #[test]
    fn test_web_search_can_be_disabled() {
        let generator = ClaudeGenerator::new(
            GeneratorConfig::new()
                .with_api_key("test-key")
                .with_web_search(false),
        )
        .unwrap();
        assert!(generator.build_request("p".into()).tools.is_empty());
    }
}
