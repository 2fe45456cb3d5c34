//! Interpretation collaborator: asks a translation service what a
//! transliterated string "means" in English.

use std::time::Duration;

use serde::Deserialize;

use crate::config::TranslateSettings;
use crate::error::InterpretError;

/// Translates script text back into the target language.
pub trait Interpreter: Send + Sync {
    /// # Arguments
    /// - `text`: The transliterated phrase.
    /// - `source_language`: The script profile's translation code (`he`, `ar`, `hi`).
    fn interpret(&self, text: &str, source_language: &str) -> Result<String, InterpretError>;

    fn name(&self) -> &'static str;
}

/// Google Cloud Translation (v2 REST) client.
pub struct GoogleTranslate {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    target_language: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl GoogleTranslate {
    pub fn new(api_key: impl Into<String>, settings: &TranslateSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.into(),
            target_language: settings.target_language.clone(),
        }
    }

    /// Reads the API key from the environment variable named in `settings`.
    pub fn from_env(settings: &TranslateSettings) -> Result<Self, InterpretError> {
        match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim(), settings)),
            _ => Err(InterpretError::MissingApiKey {
                env: settings.api_key_env.clone(),
            }),
        }
    }
}

impl Interpreter for GoogleTranslate {
    fn interpret(&self, text: &str, source_language: &str) -> Result<String, InterpretError> {
        let body = serde_json::json!({
            "q": text,
            "source": source_language,
            "target": self.target_language,
            "format": "text",
        });

        let resp = self
            .agent
            .post(&self.endpoint)
            .query("key", &self.api_key)
            .send_json(body)
            .map_err(|e| match e {
                ureq::Error::Status(status, resp) => InterpretError::Status {
                    status,
                    body: resp.into_string().unwrap_or_default(),
                },
                other => InterpretError::Request {
                    message: other.to_string(),
                },
            })?;

        let parsed: TranslateResponse = resp.into_json().map_err(|e| InterpretError::Parse {
            message: e.to_string(),
        })?;

        parse_translation(parsed)
    }

    fn name(&self) -> &'static str {
        "GoogleTranslate"
    }
}

fn parse_translation(resp: TranslateResponse) -> Result<String, InterpretError> {
    resp.data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or(InterpretError::EmptyResponse)
}
