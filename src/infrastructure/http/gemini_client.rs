//! Google Gemini client (`generateContent`), plus the source-image download
//! that feeds it.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{endpoint, send_json, transport_error};
use crate::domain::entities::InlineImage;
use crate::domain::sources::ImageGenerationSource;
use crate::error::ExternalError;

const SERVICE: &str = "gemini";
/// Service tag of errors raised while downloading the source image.
const IMAGE_SERVICE: &str = "image";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Largest source image accepted for reskinning.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// MIME type assumed when the image host does not send an `image/*` type.
const DEFAULT_IMAGE_MIME: &str = "image/png";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini client implementing [`ImageGenerationSource`].
///
/// The API key travels in the `x-goog-api-key` header. Generation calls use
/// their own timeout since image generation is much slower than the other
/// upstream APIs.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Image {
        #[serde(rename = "inlineData")]
        inline_data: RequestBlob<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBlob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<ResponseBlob>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBlob {
    mime_type: String,
    data: String,
}

impl GenerateContentResponse {
    /// Parts of the first candidate; the others are ignored.
    fn into_parts(self) -> Vec<ResponsePart> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
    }
}

fn image_too_large() -> ExternalError {
    ExternalError::Decode {
        service: IMAGE_SERVICE,
        message: format!("image is larger than {MAX_IMAGE_BYTES} bytes"),
    }
}

impl GeminiClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<GenerateContentResponse, ExternalError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Calling generateContent");

        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [
                    RequestPart::Text { text: prompt },
                    RequestPart::Image {
                        inline_data: RequestBlob {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                ],
            }],
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        };

        let path = format!("/v1beta/models/{}:generateContent", self.model);
        let request = self
            .http
            .post(endpoint(&self.base_url, &path))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(&body);

        send_json(SERVICE, request).await
    }
}

#[async_trait]
impl ImageGenerationSource for GeminiClient {
    async fn fetch_image(&self, url: &str) -> Result<InlineImage, ExternalError> {
        debug!("Downloading source image");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(IMAGE_SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalError::Status {
                service: IMAGE_SERVICE,
                status: status.as_u16(),
                body: String::new(),
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_IMAGE_BYTES as u64)
        {
            return Err(image_too_large());
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| v.starts_with("image/"))
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(IMAGE_SERVICE, e))?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(image_too_large());
        }

        Ok(InlineImage::new(mime_type, STANDARD.encode(&bytes)))
    }

    async fn generate_text(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<Option<String>, ExternalError> {
        let response = self.generate(prompt, image).await?;

        Ok(response
            .into_parts()
            .into_iter()
            .filter_map(|p| p.text)
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty()))
    }

    async fn generate_image(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<Option<InlineImage>, ExternalError> {
        let response = self.generate(prompt, image).await?;

        Ok(response
            .into_parts()
            .into_iter()
            .filter_map(|p| p.inline_data)
            .find(|blob| !blob.data.is_empty())
            .map(|blob| InlineImage::new(blob.mime_type, blob.data)))
    }
}
