//! HTTP client for the ElevenLabs text-to-speech API.

use serde::Serialize;
use tokio::time::Duration;

use crate::error::PitchError;

const BASE_URL: &str = "https://api.elevenlabs.io";
const MODEL_ID: &str = "eleven_monolingual_v1";
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// Client for voicing pitch text.
pub struct ElevenLabsClient {
    http: reqwest::Client,
    api_key: String,
    voice_id: String,
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

impl ElevenLabsClient {
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Result<Self, PitchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            voice_id: voice_id.into(),
        })
    }

    /// Synthesize text with the configured voice. Returns MP3 bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, PitchError> {
        let body = SynthesizeRequest {
            text,
            model_id: MODEL_ID,
        };

        let resp = self
            .http
            .post(format!(
                "{}/v1/text-to-speech/{}",
                BASE_URL, self.voice_id
            ))
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(PitchError::InvalidCredentials(
                "ElevenLabs API key rejected".to_string(),
            ));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PitchError::RateLimit);
        }
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(PitchError::Api(format!(
                "ElevenLabs API returned {}: {}",
                status,
                &text[..text.len().min(200)]
            )));
        }

        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Validate the API key against the user info endpoint.
    pub async fn validate(&self) -> Result<(), PitchError> {
        let resp = self
            .http
            .get(format!("{}/v1/user", BASE_URL))
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(PitchError::InvalidCredentials(
                "ElevenLabs API key rejected".to_string(),
            ));
        }
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(PitchError::Api(format!(
                "ElevenLabs API returned {}: {}",
                status,
                &text[..text.len().min(200)]
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = SynthesizeRequest {
            text: "We have it in stock.",
            model_id: MODEL_ID,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "We have it in stock.");
        assert_eq!(json["model_id"], "eleven_monolingual_v1");
    }
}
