//! Chat-completions vision client producing structured room descriptions.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use roomrank_core::config::CaptionSettings;
use roomrank_core::traits::Captioner;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Field schema the keyword groups of the named queries rely on.
pub const CAPTION_PROMPT: &str = "You are analyzing a hotel room image. Please describe it using the following structured format:\n\n\
bed_count: (1xDouble and 2xSingle ...)(Give the bed size details as a list)\n\
max_guest_capacity: (e.g., 2, 3, 4(you can understand by looking at the pillow count on beds and bed sizes))\n\
view: (e.g., sea, city, garden, mountain, none)\n\
heating_cooling: (e.g., air conditioning, fan, heater, none(for cooling only consider Split or Ductless Air Conditioners as they are the only ones that used for cooling in Turkey))\n\
furnitures: (e.g., desk(1)(which you can work on), chair(2), bed(2), lamp(3), wardrobe(1), bed side table(1))\n\
rooms: (balcony, guest room, master bedroom)(give as a list)\n\n\
If an attribute is unclear from the image, write \"unknown\" for that field. \
You can select more than one option.";

pub struct OpenAiCaptioner {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl OpenAiCaptioner {
    pub fn new(settings: &CaptionSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            bail!("captioning API key is empty");
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .context("caption http client")?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_key,
        })
    }

    /// Reads the key from `OPENAI_API_KEY`.
    pub fn from_env(settings: &CaptionSettings) -> Result<Self> {
        let key = std::env::var(API_KEY_VAR).with_context(|| format!("{API_KEY_VAR} is required for captioning"))?;
        Self::new(settings, key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Captioner for OpenAiCaptioner {
    fn caption(&self, image: &Path) -> Result<String> {
        let data_url = image_data_url(image)?;
        let body = request_body(&self.model, self.max_tokens, &data_url);
        debug!(image = %image.display(), model = %self.model, "requesting caption");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("caption request for {}", image.display()))?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().unwrap_or_default();
            bail!("caption HTTP {status}: {detail}");
        }
        let parsed: ChatResponse = response.json().context("caption response parse")?;
        first_message(parsed).ok_or_else(|| anyhow!("caption response for {} had no content", image.display()))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

fn first_message(response: ChatResponse) -> Option<String> {
    response.choices.into_iter().next().and_then(|c| c.message.content).filter(|c| !c.trim().is_empty())
}

/// `data:` URL with the base64-encoded image bytes.
pub fn image_data_url(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
    let mime = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn request_body(model: &str, max_tokens: u32, data_url: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "image_url", "image_url": { "url": data_url } },
                { "type": "text", "text": CAPTION_PROMPT }
            ]
        }]
    })
}
