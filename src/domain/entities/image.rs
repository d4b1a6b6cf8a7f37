//! Images exchanged with the generative model.

use serde::Serialize;

/// Base64 image data with its MIME type, the form the generative API
/// accepts and returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64, no line breaks.
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Parses a `data:<mime>;base64,<payload>` URL.
    ///
    /// Returns `None` for other URLs, non-base64 data URLs and empty payloads.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let (meta, payload) = url.strip_prefix("data:")?.split_once(',')?;
        let mut params = meta.split(';');
        let mime_type = params.next().filter(|m| !m.is_empty())?;

        if !params.any(|p| p.eq_ignore_ascii_case("base64")) || payload.is_empty() {
            return None;
        }

        Some(Self::new(mime_type, payload))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// How the model reads the creature in an NFT image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureGender {
    Male,
    Female,
    Unknown,
}

impl CreatureGender {
    /// Maps a one-word model answer; anything unexpected is `Unknown`.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

/// A reskinned NFT image and the analysis it was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct Reskin {
    pub image: InlineImage,
    pub theme: String,
    pub gender: CreatureGender,
    pub description: String,
}
