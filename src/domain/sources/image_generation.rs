use crate::domain::entities::InlineImage;
use crate::error::ExternalError;
use async_trait::async_trait;

/// Multimodal generative model used to reskin NFT artwork.
///
/// Implemented by [`crate::infrastructure::http::GeminiClient`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerationSource: Send + Sync {
    /// Downloads the image at an `http(s)` URL.
    async fn fetch_image(&self, url: &str) -> Result<InlineImage, ExternalError>;

    /// Asks the model about `image`; returns its first text answer, if any.
    async fn generate_text(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<Option<String>, ExternalError>;

    /// Asks the model to redraw `image`; returns the first image it produced, if any.
    async fn generate_image(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<Option<InlineImage>, ExternalError>;
}
