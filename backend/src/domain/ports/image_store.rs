//! Port for persisting uploaded post images.
use async_trait::async_trait;

use crate::domain::{PostImage, ValidImage};

use super::define_port_error;

define_port_error! {
    /// Errors raised while storing images.
    pub enum ImageStoreError {
        /// Writing to the backing store failed.
        Io { message: String } => "image store write failed: {message}",
    }
}

/// Destination for uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image bytes and return the path they were saved under.
    async fn store(&self, image: &ValidImage) -> Result<PostImage, ImageStoreError>;

    /// Delete a stored image. Removing an absent image succeeds.
    async fn remove(&self, image: &PostImage) -> Result<(), ImageStoreError>;
}
