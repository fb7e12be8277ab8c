//! Generative-AI HR assistant backed by the Gemini `generateContent` API.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::GeminiConfig;

const PREAMBLE: &str = "Eres el asistente virtual de Recursos Humanos del portal de empleados. \
Responde en español, de forma breve y amable. Puedes orientar sobre solicitudes de permisos, \
vacaciones, incapacidades, retiro de cesantías, PQRSF y documentos de la empresa. \
Si no conoces una política interna, indica que el empleado debe consultar con Recursos Humanos.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// One prompt: the preamble followed by the transcript, one line per turn.
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push_str("\n\n");
    for message in messages {
        let speaker = match message.role.to_lowercase().as_str() {
            "assistant" | "model" | "bot" => "Asistente",
            _ => "Empleado",
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(message.content.trim());
        prompt.push('\n');
    }
    prompt.push_str("Asistente:");
    prompt
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client, config })
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&json!({
                "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await
            .map_err(|e| format!("Gemini request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(512)
                .collect::<String>();
            return Err(format!("Gemini returned {status}: {body}"));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| format!("Invalid Gemini response: {e}"))?;

        extract_text(&body).ok_or_else(|| "Gemini response has no text".to_string())
    }
}
