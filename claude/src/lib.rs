//! Minimal Anthropic Claude API client.
//!
//! This crate provides a focused client for Claude's Messages API with:
//! - Non-streaming text completions
//! - The server-side web search tool, for grounded answers with citations
//! - Typed errors for missing credentials, transport and API failures

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const WEB_SEARCH_TOOL: &str = "web_search_20250305";

/// Errors that can occur when using the Claude client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Claude API client.
#[derive(Clone)]
pub struct Claude {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl Claude {
    /// Create a new Claude client with the given API key.
    ///
    /// Web-search grounded requests can take a while, so the request
    /// timeout is generous.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::NoApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(180))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Set the default model for this client.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The model used when a request does not name one.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a completion request and return the full response.
    pub async fn complete(&self, request: Request) -> Result<Response, Error> {
        let api_request = self.build_api_request(&request);
        let headers = self.build_headers()?;

        debug!(
            model = %api_request.model,
            messages = api_request.messages.len(),
            tools = api_request.tools.as_ref().map_or(0, Vec::len),
            "sending completion request"
        );

        let response = self
            .client
            .post(format!("{API_BASE}/messages"))
            .headers(headers)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(api_response.into())
    }

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| Error::Config(format!("Invalid API key: {e}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    fn build_api_request(&self, request: &Request) -> ApiRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::User => "user",
                },
                content: m.text.clone(),
            })
            .collect();

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(request.tools.iter().map(ApiTool::from).collect())
        };

        ApiRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            max_tokens: request.max_tokens,
            system: request.system.clone(),
            messages,
            temperature: request.temperature,
            tools,
        }
    }
}

// ============================================================================
// Public types
// ============================================================================

/// A completion request to send to Claude.
#[derive(Debug, Clone)]
pub struct Request {
    pub model: Option<String>,
    pub max_tokens: usize,
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub tools: Vec<ServerTool>,
}

impl Request {
    /// Create a new request with the given messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            model: None,
            max_tokens: 4096,
            system: None,
            messages,
            temperature: None,
            tools: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_tool(mut self, tool: ServerTool) -> Self {
        self.tools.push(tool);
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    /// Create a user message with text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
}

/// A tool executed on Anthropic's side during the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerTool {
    /// Web search, capped at `max_uses` searches per request.
    WebSearch { max_uses: Option<u32> },
}

/// A block of content in a response.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text {
        text: String,
        citations: Vec<Citation>,
    },
    /// The model invoked a server tool (e.g. issued a web search).
    ServerToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// Pages returned by a web search.
    WebSearchResults {
        tool_use_id: String,
        results: Vec<SearchResult>,
    },
}

impl ContentBlock {
    /// Extract text from a Text content block.
    pub fn as_text(&self) -> Option<&str> {
        if let ContentBlock::Text { text, .. } = self {
            Some(text)
        } else {
            None
        }
    }
}

/// A web page the model cited for a span of its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub url: String,
    pub title: Option<String>,
    pub cited_text: Option<String>,
}

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
}

/// A completion response from Claude.
#[derive(Debug, Clone)]
pub struct Response {
    pub id: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl Response {
    /// Get all text content concatenated.
    ///
    /// Grounded answers arrive split across several text blocks (one per
    /// cited span), so the pieces are joined without separators.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// All citations across text blocks, first occurrence of each URL only.
    pub fn citations(&self) -> Vec<&Citation> {
        let mut seen = std::collections::HashSet::new();
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { citations, .. } => Some(citations.iter()),
                _ => None,
            })
            .flatten()
            .filter(|c| seen.insert(c.url.as_str()))
            .collect()
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    /// A long-running server tool turn was paused; the text may be partial.
    PauseTurn,
    Refusal,
}

impl StopReason {
    fn parse(s: &str) -> Self {
        match s {
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            "tool_use" => StopReason::ToolUse,
            "pause_turn" => StopReason::PauseTurn,
            "refusal" => StopReason::Refusal,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub web_search_requests: usize,
}

// ============================================================================
// Internal API types
// ============================================================================

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ApiTool>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ApiTool {
    r#type: &'static str,
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_uses: Option<u32>,
}

impl From<&ServerTool> for ApiTool {
    fn from(tool: &ServerTool) -> Self {
        match tool {
            ServerTool::WebSearch { max_uses } => ApiTool {
                r#type: WEB_SEARCH_TOOL,
                name: "web_search",
                max_uses: *max_uses,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    id: String,
    model: String,
    content: Vec<ApiContent>,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContent {
    Text {
        text: String,
        #[serde(default)]
        citations: Option<Vec<ApiCitation>>,
    },
    ServerToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    WebSearchToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ApiCitation {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    cited_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchHit {
    url: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: usize,
    output_tokens: usize,
    #[serde(default)]
    server_tool_use: Option<ApiServerToolUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiServerToolUsage {
    #[serde(default)]
    web_search_requests: usize,
}

impl From<ApiResponse> for Response {
    fn from(api: ApiResponse) -> Self {
        let content = api
            .content
            .into_iter()
            .filter_map(|c| match c {
                ApiContent::Text { text, citations } => Some(ContentBlock::Text {
                    text,
                    citations: citations
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|c| {
                            c.url.map(|url| Citation {
                                url,
                                title: c.title,
                                cited_text: c.cited_text,
                            })
                        })
                        .collect(),
                }),
                ApiContent::ServerToolUse { id, name, input } => {
                    Some(ContentBlock::ServerToolUse { id, name, input })
                }
                ApiContent::WebSearchToolResult {
                    tool_use_id,
                    content,
                } => Some(ContentBlock::WebSearchResults {
                    tool_use_id,
                    results: parse_search_hits(content),
                }),
                ApiContent::Unknown => None,
            })
            .collect();

        Response {
            id: api.id,
            model: api.model,
            content,
            stop_reason: api
                .stop_reason
                .as_deref()
                .map(StopReason::parse)
                .unwrap_or(StopReason::EndTurn),
            usage: Usage {
                input_tokens: api.usage.input_tokens,
                output_tokens: api.usage.output_tokens,
                web_search_requests: api
                    .usage
                    .server_tool_use
                    .map(|u| u.web_search_requests)
                    .unwrap_or(0),
            },
        }
    }
}

/// Search results are an array of hits, or an error object when the search
/// itself failed; the latter yields no hits.
fn parse_search_hits(content: serde_json::Value) -> Vec<SearchResult> {
    serde_json::from_value::<Vec<ApiSearchHit>>(content)
        .map(|hits| {
            hits.into_iter()
                .map(|h| SearchResult {
                    url: h.url,
                    title: h.title,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Claude::new("test-key").unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_client_rejects_blank_key() {
        assert!(matches!(Claude::new("  "), Err(Error::NoApiKey)));
    }

    #[test]
    fn test_client_with_model() {
        let client = Claude::new("test-key").unwrap().with_model("claude-3-opus");
        assert_eq!(client.model(), "claude-3-opus");
    }

    #[test]
    fn test_request_builder() {
        let request = Request::new(vec![Message::user("Hello")])
            .with_system("You are a helpful assistant")
            .with_max_tokens(1000)
            .with_temperature(0.7)
            .with_tool(ServerTool::WebSearch { max_uses: Some(3) });

        assert_eq!(request.max_tokens, 1000);
        assert!(request.system.is_some());
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.tools.len(), 1);
    }

    #[test]
    fn test_api_request_serializes_web_search_tool() {
        let client = Claude::new("test-key").unwrap();
        let request = Request::new(vec![Message::user("Hi")])
            .with_tool(ServerTool::WebSearch { max_uses: Some(5) });

        let json = serde_json::to_value(client.build_api_request(&request)).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hi");
        assert_eq!(json["tools"][0]["type"], "web_search_20250305");
        assert_eq!(json["tools"][0]["name"], "web_search");
        assert_eq!(json["tools"][0]["max_uses"], 5);
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_api_request_without_tools_omits_field() {
        let client = Claude::new("test-key").unwrap();
        let request = Request::new(vec![Message::user("Hi")]).with_model("other-model");

        let json = serde_json::to_value(client.build_api_request(&request)).unwrap();
        assert_eq!(json["model"], "other-model");
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_parse_grounded_response() {
        let body = r#"{
            "id": "msg_1",
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "content": [
                {"type": "server_tool_use", "id": "srv_1", "name": "web_search", "input": {"query": "coffee"}},
                {"type": "web_search_tool_result", "tool_use_id": "srv_1", "content": [
                    {"type": "web_search_result", "url": "https://a.example", "title": "A"}
                ]},
                {"type": "text", "text": "[{\"type\":"},
                {"type": "text", "text": "\"title\"}]", "citations": [
                    {"type": "web_search_result_location", "url": "https://a.example", "title": "A", "cited_text": "x"},
                    {"type": "web_search_result_location", "url": "https://a.example", "title": "A", "cited_text": "y"}
                ]},
                {"type": "something_new"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 20, "server_tool_use": {"web_search_requests": 1}}
        }"#;

        let api: ApiResponse = serde_json::from_str(body).unwrap();
        let response: Response = api.into();

        assert_eq!(response.text(), "[{\"type\":\"title\"}]");
        assert_eq!(response.content.len(), 4);
        assert_eq!(response.citations().len(), 1);
        assert_eq!(response.usage.web_search_requests, 1);
        assert_eq!(response.stop_reason, StopReason::EndTurn);

        let hits = response
            .content
            .iter()
            .find_map(|b| match b {
                ContentBlock::WebSearchResults { results, .. } => Some(results.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(hits[0].url, "https://a.example");
    }

    #[test]
    fn test_search_error_yields_no_hits() {
        let error = serde_json::json!({"type": "web_search_tool_result_error", "error_code": "unavailable"});
        assert!(parse_search_hits(error).is_empty());
    }

    #[test]
    fn test_stop_reason_parse() {
        assert_eq!(StopReason::parse("pause_turn"), StopReason::PauseTurn);
        assert_eq!(StopReason::parse("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::parse("unheard_of"), StopReason::EndTurn);
    }

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user("Hello");
        assert!(matches!(user_msg.role, Role::User));
        assert_eq!(user_msg.text, "Hello");
    }
}
