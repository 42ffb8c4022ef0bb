use async_trait::async_trait;
use base64::prelude::*;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;

use super::ImageGenerator;
use crate::core::config::ImageGenConfig;
use crate::core::error::AppError;

const API_BASE: &str = "https://api.cloudflare.com/client/v4/accounts";

/// JSON envelope some Workers AI models answer with
#[derive(Debug, Deserialize)]
struct WorkersAiResponse {
    result: Option<WorkersAiResult>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkersAiResult {
    image_base64: Option<String>,
    image: Option<String>,
}

/// Cloudflare Workers AI client
pub struct CloudflareImageGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl CloudflareImageGenerator {
    pub fn new(config: ImageGenConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}/ai/run/{}", API_BASE, config.account_id, config.model),
            api_token: config.api_token,
        })
    }
}

#[async_trait]
impl ImageGenerator for CloudflareImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, AppError> {
        tracing::debug!("Requesting image from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Cloudflare AI no respondió: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Cloudflare AI returned {}: {}", status, body);
            return Err(AppError::Upstream(format!(
                "Cloudflare AI respondió {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Respuesta de Cloudflare AI incompleta: {}", e)))?;

        decode_image(&content_type, &body)
    }
}

/// Models answer either with JSON carrying base64 or with the raw PNG
fn decode_image(content_type: &str, body: &[u8]) -> Result<Vec<u8>, AppError> {
    if !content_type.contains("application/json") {
        return Ok(body.to_vec());
    }

    let parsed: WorkersAiResponse = serde_json::from_slice(body)
        .map_err(|e| AppError::Upstream(format!("Respuesta de Cloudflare AI inválida: {}", e)))?;

    let encoded = parsed
        .result
        .and_then(|r| r.image_base64.or(r.image))
        .or(parsed.image)
        .ok_or_else(|| AppError::Upstream("Respuesta sin imagen".to_string()))?;

    BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::Upstream(format!("Imagen en base64 inválida: {}", e)))
}
