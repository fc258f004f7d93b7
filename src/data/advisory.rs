use std::{fs, path::Path, time::Duration};

use base64::{Engine as _, engine::general_purpose};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::domain::weather::WeatherSnapshot;

const ADVISORY_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("no API key set (GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,
    #[error("advisory request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("advisory service returned {0}")]
    Status(StatusCode),
    #[error("advisory response contained no text")]
    EmptyResponse,
    #[error("failed to parse advisory response: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("failed to read spot image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalAdvice {
    pub strategy_name: String,
    pub bait_advice: String,
    pub rig_advice: String,
    pub spot_advice: String,
    pub reasoning: String,
    pub activity_score: f32,
}

/// The snapshot subset and angler context sent to the advisory model.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryRequest {
    pub temperature_c: i32,
    pub pressure_hpa: i32,
    pub wind_speed_kmh: i32,
    pub wind_direction: &'static str,
    pub moon_phase: &'static str,
    pub moon_illumination_pct: u8,
    pub water_type: String,
    pub season: String,
    /// Base64-encoded JPEG.
    pub image: Option<String>,
}

impl AdvisoryRequest {
    #[must_use]
    pub fn from_snapshot(
        snapshot: &WeatherSnapshot,
        water_type: impl Into<String>,
        season: impl Into<String>,
    ) -> Self {
        Self {
            temperature_c: snapshot.temperature_c,
            pressure_hpa: snapshot.pressure_hpa,
            wind_speed_kmh: snapshot.wind_speed_kmh,
            wind_direction: snapshot.wind_direction.label(),
            moon_phase: snapshot.moon.phase.label(),
            moon_illumination_pct: snapshot.moon.illumination_pct,
            water_type: water_type.into(),
            season: season.into(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_image_bytes(mut self, bytes: &[u8]) -> Self {
        self.image = Some(general_purpose::STANDARD.encode(bytes));
        self
    }
}

/// Reads the spot photo up front so a bad path fails before any request.
pub fn read_spot_image(path: &Path) -> Result<Vec<u8>, AdvisoryError> {
    fs::read(path).map_err(|source| AdvisoryError::Image {
        path: path.display().to_string(),
        source,
    })
}

#[must_use]
pub fn build_prompt(request: &AdvisoryRequest) -> String {
    let image_hint = if request.image.is_some() {
        "Der Nutzer hat ein Foto seines Angelplatzes beigefügt. Analysiere sichtbare Strukturen \
         wie überhängende Bäume, Schilfkanten, Seerosen oder Schatten und nenne konkrete Ziele.\n"
    } else {
        ""
    };

    format!(
        "Erstelle eine moderne taktische Empfehlung für das Karpfenangeln.\n\
         Aktuelle Bedingungen:\n\
         - Temperatur: {temp}°C\n\
         - Luftdruck: {pressure} hPa\n\
         - Wind: {wind} km/h aus {direction}\n\
         - Mond: {moon} ({illumination}%)\n\
         - Gewässertyp: {water}\n\
         - Saison: {season}\n\
         {image_hint}\
         Antworte als JSON mit strategyName, baitAdvice, rigAdvice, spotAdvice, reasoning \
         und activityScore (0 bis 100, Beißwahrscheinlichkeit über alle Faktoren).\n\
         Antworte auf Deutsch.",
        temp = request.temperature_c,
        pressure = request.pressure_hpa,
        wind = request.wind_speed_kmh,
        direction = request.wind_direction,
        moon = request.moon_phase,
        illumination = request.moon_illumination_pct,
        water = request.water_type,
        season = request.season,
    )
}

fn request_body(request: &AdvisoryRequest) -> Value {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = &request.image {
        parts.push(json!({ "inlineData": { "mimeType": "image/jpeg", "data": image } }));
    }
    parts.push(json!({ "text": build_prompt(request) }));

    json!({
        "contents": [{ "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "strategyName": { "type": "STRING" },
                    "baitAdvice": { "type": "STRING" },
                    "rigAdvice": { "type": "STRING" },
                    "spotAdvice": { "type": "STRING" },
                    "reasoning": { "type": "STRING" },
                    "activityScore": { "type": "NUMBER" }
                },
                "required": [
                    "strategyName", "baitAdvice", "rigAdvice",
                    "spotAdvice", "reasoning", "activityScore"
                ]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Extracts the advice from a raw `generateContent` response body.
pub fn parse_advice_response(body: &[u8]) -> Result<TacticalAdvice, AdvisoryError> {
    let response: GenerateResponse =
        serde_json::from_slice(body).map_err(AdvisoryError::Payload)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(AdvisoryError::EmptyResponse)?;
    serde_json::from_str(&text).map_err(AdvisoryError::Payload)
}

#[derive(Debug, Clone)]
pub struct AdvisoryClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl AdvisoryClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("reqwest client"),
            base_url: ADVISORY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, AdvisoryError> {
        API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|key| !key.trim().is_empty()))
            .map(Self::new)
            .ok_or(AdvisoryError::MissingApiKey)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub async fn advise(&self, request: &AdvisoryRequest) -> Result<TacticalAdvice, AdvisoryError> {
        let endpoint = self.endpoint();
        debug!(%endpoint, with_image = request.image.is_some(), "requesting advice");
        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(AdvisoryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Status(status));
        }

        let body = response.bytes().await.map_err(AdvisoryError::Request)?;
        parse_advice_response(&body)
    }
}
