//! End-of-run shoutout from the generative text service
//!
//! One `generateContent` call per finished session, no retries. Every failure
//! turns into the fixed fallback line, so the game-over screen always has
//! something to say.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Difficulty;

/// Shown whenever the service can't provide a line
pub const FALLBACK_COMMENTARY: &str = "The market is safe... for now! Great job!";

#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service answered with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response contained no text")]
    Empty,
}

/// Vendor persona prompt for a finished run
pub fn prompt(score: u64, difficulty: Difficulty) -> String {
    format!(
        "The player just scored {score} points on {} difficulty in the Neon Night Market. \
         Act as a street food vendor from the night market. Give them a cool nickname and a short, \
         funny arcade-style shoutout (max 20 words). Examples: \"Neon Ninja\", \"Dumpling Defender\".",
        difficulty.as_str()
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// JSON body for a `generateContent` call
pub fn request_body(prompt: &str) -> Result<String, CommentaryError> {
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt.to_string()),
            }],
        }],
    };
    Ok(serde_json::to_string(&request)?)
}

/// Extract the text of the first candidate
pub fn parse_response(body: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(CommentaryError::Empty);
    }
    Ok(text.to_string())
}

/// Text to display for a finished request
pub fn text_or_fallback(result: Result<String, CommentaryError>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => FALLBACK_COMMENTARY.to_string(),
        Err(e) => {
            log::warn!("Commentary unavailable: {e}");
            FALLBACK_COMMENTARY.to_string()
        }
    }
}

/// Ask the service for a shoutout (browser fetch)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_commentary(
    settings: &crate::settings::CommentarySettings,
    score: u64,
    difficulty: Difficulty,
) -> Result<String, CommentaryError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    fn js_err(e: JsValue) -> CommentaryError {
        CommentaryError::Transport(e.as_string().unwrap_or_else(|| format!("{e:?}")))
    }

    let key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(CommentaryError::MissingApiKey)?;
    let body = request_body(&prompt(score, difficulty))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&settings.url(), &opts).map_err(js_err)?;
    let headers = request.headers();
    headers.set("Content-Type", "application/json").map_err(js_err)?;
    headers.set("x-goog-api-key", key).map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| CommentaryError::Transport("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    if !response.ok() {
        return Err(CommentaryError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();
    parse_response(&text)
}
