//! The text-to-markdown capability the cache delegates to.

use crate::EnrichmentError;

/// Turns a raw listing description into its enriched form.
///
/// Implementations may be slow and may fail; the cache guarantees they are
/// invoked at most once per successfully enriched id.
#[async_trait::async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Produces the enriched text for `raw`.
    ///
    /// # Errors
    ///
    /// Returns an [`EnrichmentError`] if the text could not be generated.
    async fn generate(&self, raw: &str) -> Result<String, EnrichmentError>;
}

/// Adapts a plain closure into a [`DescriptionGenerator`].
pub struct FnGenerator<F> {
    f: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&str) -> Result<String, EnrichmentError> + Send + Sync,
{
    /// Wraps `f`.
    #[must_use]
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait::async_trait]
impl<F> DescriptionGenerator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String, EnrichmentError> + Send + Sync,
{
    async fn generate(&self, raw: &str) -> Result<String, EnrichmentError> {
        (self.f)(raw)
    }
}
