//! DTOs for the image reskin endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{CreatureGender, Reskin};

static THEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[\p{L}\p{N}][\p{L}\p{N} -]*\s*$").expect("valid theme regex"));

/// Body of `POST /api/reskin`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReskinRequest {
    /// `http(s)` URL of the NFT image, or a base64 `data:` URL.
    #[validate(length(min = 1, message = "imageUrl is required"))]
    pub image_url: String,

    #[validate(
        length(min = 1, max = 32, message = "theme must be 1-32 characters"),
        regex(path = "*THEME_REGEX", message = "theme may contain letters, digits, spaces and hyphens")
    )]
    pub theme: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReskinResponse {
    /// Generated image as a `data:` URL.
    pub image: String,
    pub theme: String,
    pub gender: CreatureGender,
    pub description: String,
}

impl From<Reskin> for ReskinResponse {
    fn from(reskin: Reskin) -> Self {
        Self {
            image: reskin.image.to_data_url(),
            theme: reskin.theme,
            gender: reskin.gender,
            description: reskin.description,
        }
    }
}
