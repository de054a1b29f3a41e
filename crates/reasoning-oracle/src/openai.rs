//! OpenAI chat-completions implementation of the reasoning oracle.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use pricescout_core_types::{CollapsedElement, TranscriptEntry};

use crate::errors::OracleError;
use crate::prompts;
use crate::provider::{Reasoning, ReasoningOracle};

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gpt-4o-2024-08-06".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct OpenAiOracle {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiConfig) -> Result<Self, OracleError> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::Transport("missing OpenAI API key".into()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| OracleError::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, config })
    }

    async fn complete(
        &self,
        system: &str,
        user: OutboundContent<'_>,
        response_format: Option<Value>,
    ) -> Result<String, OracleError> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let body = ChatCompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            response_format,
            messages: vec![
                OutboundMessage {
                    role: "system",
                    content: OutboundContent::Text(system),
                },
                OutboundMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| OracleError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(OracleError::Api { status, body });
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| OracleError::Transport(format!("invalid response body: {err}")))?;

        debug!(model = %self.config.model, "oracle call completed");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_text())
            .ok_or(OracleError::MissingContent)
    }
}

#[async_trait]
impl ReasoningOracle for OpenAiOracle {
    async fn describe_site(&self, image: &str) -> Result<String, OracleError> {
        self.complete(
            prompts::SITE_DESCRIPTION_PROMPT,
            OutboundContent::image(image),
            None,
        )
        .await
    }

    async fn find_prices(
        &self,
        image: &str,
        site_description: &str,
    ) -> Result<String, OracleError> {
        let prompt = prompts::build_find_prices_prompt(site_description);
        self.complete(&prompt, OutboundContent::image(image), None)
            .await
    }

    async fn identify_collapsed(
        &self,
        image: &str,
        site_description: &str,
        known_roots: &[CollapsedElement],
        current_branch: Option<&CollapsedElement>,
    ) -> Result<CollapsedElement, OracleError> {
        let prompt =
            prompts::build_identify_collapsed_prompt(site_description, known_roots, current_branch);
        let content = self
            .complete(
                &prompt,
                OutboundContent::image(image),
                Some(collapsed_tree_response_format()),
            )
            .await?;
        parse_collapsed(&content)
    }

    async fn next_step(
        &self,
        question: &str,
        transcript: &[TranscriptEntry],
    ) -> Result<Reasoning, OracleError> {
        let user = prompts::render_transcript(question, transcript);
        let content = self
            .complete(
                prompts::REACT_AGENT_PROMPT,
                OutboundContent::Text(&user),
                Some(reasoning_response_format()),
            )
            .await?;
        parse_reasoning(&content)
    }
}

fn parse_collapsed(content: &str) -> Result<CollapsedElement, OracleError> {
    serde_json::from_str(content).map_err(|err| OracleError::Schema(err.to_string()))
}

fn parse_reasoning(content: &str) -> Result<Reasoning, OracleError> {
    serde_json::from_str(content).map_err(|err| OracleError::Schema(err.to_string()))
}

/// Strict recursive schema for the collapsed-tree shape:
/// `{label, children: [self]}`.
fn collapsed_tree_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "collapsed_elements",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "label": { "type": "string" },
                    "children": { "type": "array", "items": { "$ref": "#" } }
                },
                "required": ["label", "children"],
                "additionalProperties": false
            }
        }
    })
}

/// Strict schema for the reasoning shape: `{thought, action:{name, input?}}`.
fn reasoning_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "reasoning_action",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "thought": { "type": "string" },
                    "action": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "input": { "type": ["string", "null"] }
                        },
                        "required": ["name", "input"],
                        "additionalProperties": false
                    }
                },
                "required": ["thought", "action"],
                "additionalProperties": false
            }
        }
    })
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    messages: Vec<OutboundMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    role: &'a str,
    content: OutboundContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OutboundContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

impl<'a> OutboundContent<'a> {
    /// A single high-detail image reference, passed by locator.
    fn image(url: &'a str) -> Self {
        OutboundContent::Parts(vec![ContentPart {
            kind: "image_url",
            image_url: Some(ImageUrl { url, detail: "high" }),
        }])
    }
}

#[derive(Debug, Serialize)]
struct ContentPart<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<ImageUrl<'a>>,
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
    detail: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: ChatCompletionContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatCompletionContent {
    Text(String),
    Parts(Vec<ChatCompletionPart>),
}

impl ChatCompletionContent {
    fn as_text(&self) -> Option<String> {
        match self {
            ChatCompletionContent::Text(value) => Some(value.clone()),
            ChatCompletionContent::Parts(parts) => {
                let text = parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n");
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionPart {
    #[serde(default)]
    text: Option<String>,
}
