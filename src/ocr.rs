use async_trait::async_trait;

use crate::error::Result;

/// Image-to-text collaborator. The recognition itself happens elsewhere;
/// implementations report failures as `Error::ExternalService` and reject
/// empty images with `Error::InvalidInput`.
#[async_trait]
pub trait OcrService: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}
