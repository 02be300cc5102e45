//! Blocking client for a generateContent-style vision endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tab_receipt::{Language, Receipt};
use tracing::{debug, info};

use super::image::ImagePayload;
use super::{ReceiptAnalyzer, Result, VisionError};

/// Default endpoint root.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default whole-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the vision model.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Endpoint root, up to but excluding `/models/...`.
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    /// Whole-request timeout, connection included.
    pub timeout: Duration,
}

impl Default for VisionConfig {
    fn default() -> Self {
        VisionConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`ReceiptAnalyzer`] backed by an HTTP vision model.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    config: VisionConfig,
}

impl GeminiClient {
    pub fn new(config: VisionConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(GeminiClient { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl ReceiptAnalyzer for GeminiClient {
    fn analyze(&self, image: &ImagePayload, language: Language) -> Result<Receipt> {
        let prompt = extraction_prompt(language);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::text(&prompt), Part::image(image)],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        info!(
            model = %self.config.model,
            mime_type = image.mime_type(),
            image_b64_len = image.data().len(),
            language = %language,
            "requesting receipt analysis"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(VisionError::Server {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        debug!(
            status = status.as_u16(),
            body_len = body.len(),
            "analysis reply received"
        );

        let receipt = parse_reply(&body)?;
        info!(
            restaurant = %receipt.restaurant_name,
            items = receipt.items.len(),
            total = receipt.total,
            "receipt extracted"
        );
        Ok(receipt)
    }
}

/// The instruction sent alongside the image.
///
/// Kept public because the prompt is part of the upstream contract: it
/// pins the JSON field names the validator expects to see back.
pub fn extraction_prompt(language: Language) -> String {
    format!(
        "You are reading a photo of a restaurant receipt. Respond with a single JSON \
         object and nothing else, shaped exactly like this: {{\"restaurantName\": string, \
         \"date\": string, \"currency\": string, \"items\": [{{\"id\": string, \
         \"quantity\": number, \"description\": string, \"price\": number, \
         \"originalDescription\": string}}], \"subtotal\": number, \"tax\": number, \
         \"tip\": number, \"total\": number}}. Use ids \"item-1\", \"item-2\", ... in \
         printed order. price is the full line price, not the unit price. Translate each \
         description into {target}; put the printed text in originalDescription and omit \
         it when it equals description. currency is the symbol printed on the receipt. \
         Use 0 for amounts you cannot read.",
        target = language.english_name()
    )
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

/// One multimodal part: either text or inline image data, never both.
#[derive(Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

impl<'a> Part<'a> {
    fn text(text: &'a str) -> Self {
        Part {
            text: Some(text),
            inline_data: None,
        }
    }

    fn image(image: &'a ImagePayload) -> Self {
        Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type(),
                data: image.data(),
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ReplyContent>,
}

#[derive(Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

// ============================================================================
// Reply handling
// ============================================================================

/// Turn a raw 2xx reply body into a validated receipt.
fn parse_reply(body: &str) -> Result<Receipt> {
    let reply: GenerateResponse =
        serde_json::from_str(body).map_err(|err| VisionError::Unparsable {
            reason: format!("reply envelope: {err}"),
        })?;

    let text: String = reply
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(VisionError::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_str(strip_code_fences(&text)).map_err(|err| VisionError::Unparsable {
            reason: format!("receipt JSON: {err}"),
        })?;

    Ok(tab_receipt::validate(&value)?)
}

/// Remove a surrounding ``` fence, with or without a language tag.
///
/// `response_mime_type` asks for bare JSON, but replies still arrive
/// fenced often enough that decoding without this is flaky.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence info string ("json", usually) up to the first newline.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Bound the body text carried inside a `Server` error.
fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 2000;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_CHARS).collect();
    format!("{}...", cut.trim_end())
}
