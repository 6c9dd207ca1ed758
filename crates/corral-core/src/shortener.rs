use crate::error::Result;
use crate::shortkey::ShortKey;
use async_trait::async_trait;

/// A service that trades original values for short keys and back.
///
/// Transports (HTTP handlers, RPC servers) hold this as
/// `Arc<dyn Shortener>` so they do not depend on a concrete store.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short key for `original`, creating one if needed.
    ///
    /// Shortening the same value twice returns the same key.
    async fn shorten(&self, original: &str) -> Result<ShortKey>;

    /// Resolves a short key to its original value.
    /// Returns `Err(NotFound)` if the key was never handed out.
    async fn resolve(&self, key: &ShortKey) -> Result<String>;
}
