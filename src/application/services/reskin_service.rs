//! Themed redraw of an NFT image by the generative model.
//!
//! A reskin runs three model calls on the same source image: two short text
//! analyses (gender, visual description) run concurrently, then the image
//! generation whose prompt embeds both answers. The analyses are best effort
//! and fall back to neutral values; only the generation itself can fail the
//! request.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::application::retry::{RetryPolicy, with_retry};
use crate::domain::entities::{CreatureGender, InlineImage, Reskin};
use crate::domain::sources::ImageGenerationSource;
use crate::error::AppError;

/// Longest accepted theme, in characters.
pub const MAX_THEME_CHARS: usize = 32;

pub(crate) const GENDER_PROMPT: &str = "Analyze the creature in this image. Does it appear male or female? Respond with only one word: 'male', 'female', or 'unknown'.";
pub(crate) const DESCRIPTION_PROMPT: &str = "Analyze the creature in this image. Describe its key visual features, such as its species, colors, textures, and overall style, in a short phrase.";

/// Used when the description analysis yields nothing.
pub const FALLBACK_DESCRIPTION: &str = "a creature";

const EXPRESSIONS: [&str; 3] = [
    "a confident expression",
    "a gentle smile",
    "an energized expression, like it is ready for action",
];

const CHRISTIAN_STYLES: [&str; 3] = [
    "modern Catholic priest/nun",
    "modern Evangelical pastor",
    "modern Christian enjoying a church service",
];

/// Item the creature may hold, by theme (matched case-insensitively).
const THEME_ITEMS: [(&str, &str); 6] = [
    ("muslim", "the Holy Quran"),
    ("christian", "the Holy Bible"),
    ("jewish", "a Torah scroll"),
    ("hindu", "the Vedas"),
    ("satanic", "a book of shadows"),
    ("buddhist", "prayer beads"),
];

fn theme_item(theme: &str) -> Option<&'static str> {
    THEME_ITEMS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(theme))
        .map(|(_, item)| *item)
}

/// Builds the image generation prompt.
///
/// The expression, the Christian outfit style and whether the themed item
/// is mentioned (one time in two) are drawn from `rng`.
pub fn reskin_prompt<R: Rng + ?Sized>(
    theme: &str,
    gender: CreatureGender,
    description: &str,
    rng: &mut R,
) -> String {
    let expression = EXPRESSIONS.choose(rng).copied().unwrap_or(EXPRESSIONS[0]);

    let outfit = if theme.eq_ignore_ascii_case("christian") {
        let style = CHRISTIAN_STYLES
            .choose(rng)
            .copied()
            .unwrap_or(CHRISTIAN_STYLES[0]);
        format!("Dress it in unique, {style} attire.")
    } else if theme.eq_ignore_ascii_case("jewish") {
        "Dress it in unique, modern religious Jewish attire, making it look like it's in its 40s."
            .to_string()
    } else {
        format!("Dress it in unique, modern religious {theme} attire.")
    };

    let mut parts = vec![
        format!(
            "Given the image of this {} creature, which looks like {description}, redraw it. \
             The creature's core appearance and species must remain the same.",
            gender.as_str()
        ),
        format!("{outfit} The outfit should be inspired by the creature's original appearance."),
        format!("It should have {expression} on its face."),
        "It should be in a cool, dynamic, and interesting pose.".to_string(),
    ];

    if let Some(item) = theme_item(theme)
        && rng.random_bool(0.5)
    {
        parts.push(format!("The creature can be holding {item}."));
    }

    parts.push(
        "The background must be a simple, single solid color that complements the colors of the new outfit."
            .to_string(),
    );
    parts.push("Return only the final image, with no text or annotations.".to_string());

    parts.join(" ")
}

/// [`reskin_prompt`] drawn from the thread-local generator.
fn random_reskin_prompt(theme: &str, gender: CreatureGender, description: &str) -> String {
    reskin_prompt(theme, gender, description, &mut rand::rng())
}

/// Checks a theme and returns it trimmed.
///
/// A theme is 1 to [`MAX_THEME_CHARS`] characters of letters, digits, spaces
/// and hyphens, starting with a letter or digit.
fn validate_theme(theme: &str) -> Result<&str, AppError> {
    let theme = theme.trim();
    let valid = theme.chars().count() <= MAX_THEME_CHARS
        && theme.chars().next().is_some_and(char::is_alphanumeric)
        && theme
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-');

    if !valid {
        return Err(AppError::bad_request(
            "theme must be 1-32 letters, digits, spaces or hyphens",
            json!({ "theme": theme }),
        ));
    }

    Ok(theme)
}

pub struct ReskinService<I: ImageGenerationSource> {
    images: Arc<I>,
    retry: RetryPolicy,
}

impl<I: ImageGenerationSource> ReskinService<I> {
    pub fn new(images: Arc<I>, retry: RetryPolicy) -> Self {
        Self { images, retry }
    }

    /// Redraws the image at `image_url` in the given theme.
    ///
    /// `image_url` is either an `http(s)` URL, downloaded by the source, or
    /// a base64 `data:` URL used as is.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad theme or image URL.
    /// Returns [`AppError::Upstream`] if the download or the generation fails
    /// after all retries, or the model returns no image.
    pub async fn reskin(&self, image_url: &str, theme: &str) -> Result<Reskin, AppError> {
        let theme = validate_theme(theme)?;
        let source = self.load_image(image_url).await?;

        let (gender, description) =
            tokio::join!(self.analyze_gender(&source), self.analyze_description(&source));

        let prompt = random_reskin_prompt(theme, gender, &description);

        let image = with_retry(&self.retry, "gemini.generate_image", || {
            self.images.generate_image(&prompt, &source)
        })
        .await?
        .ok_or_else(|| {
            AppError::upstream(
                "Image generation returned no image",
                json!({ "service": "gemini" }),
            )
        })?;

        info!(
            theme = %theme,
            gender = gender.as_str(),
            mime_type = %image.mime_type,
            "Image reskinned"
        );

        Ok(Reskin {
            image,
            theme: theme.to_string(),
            gender,
            description,
        })
    }

    async fn load_image(&self, image_url: &str) -> Result<InlineImage, AppError> {
        let image_url = image_url.trim();

        if image_url.starts_with("data:") {
            return InlineImage::from_data_url(image_url)
                .filter(|img| img.mime_type.starts_with("image/"))
                .filter(|img| STANDARD.decode(&img.data).is_ok())
                .ok_or_else(|| {
                    AppError::bad_request(
                        "imageUrl must be a base64 image data URL",
                        json!({}),
                    )
                });
        }

        let url = Url::parse(image_url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| {
                AppError::bad_request(
                    "imageUrl must be an http(s) or data URL",
                    json!({ "imageUrl": image_url }),
                )
            })?;

        let image = with_retry(&self.retry, "image.fetch", || {
            self.images.fetch_image(url.as_str())
        })
        .await?;

        Ok(image)
    }

    async fn analyze_gender(&self, image: &InlineImage) -> CreatureGender {
        let answer = with_retry(&self.retry, "gemini.gender", || {
            self.images.generate_text(GENDER_PROMPT, image)
        })
        .await;

        match answer {
            Ok(Some(text)) => CreatureGender::from_answer(&text),
            Ok(None) => CreatureGender::Unknown,
            Err(e) => {
                warn!(error = %e, "Gender analysis failed, using unknown");
                CreatureGender::Unknown
            }
        }
    }

    async fn analyze_description(&self, image: &InlineImage) -> String {
        let answer = with_retry(&self.retry, "gemini.description", || {
            self.images.generate_text(DESCRIPTION_PROMPT, image)
        })
        .await;

        match answer {
            Ok(Some(text)) => text,
            Ok(None) => FALLBACK_DESCRIPTION.to_string(),
            Err(e) => {
                warn!(error = %e, "Description analysis failed, using fallback");
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }
}
