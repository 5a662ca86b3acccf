//! Shape insights from an external text-generation service.
//!
//! [`InsightSource`] is the seam: anything that can turn an [`InsightRequest`]
//! into text. [`InsightService`] wraps a source and never fails; errors and
//! empty answers become fixed fallback sentences.

mod gemini;

#[cfg(target_arch = "wasm32")]
mod browser;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::InsightError;
use crate::types::InsightRequest;

pub use gemini::{GeminiClient, HttpResponse, HttpTransport};

#[cfg(target_arch = "wasm32")]
pub use browser::{FetchTransport, JsCallbackSource};

/// Shown when the source answered but produced no text.
pub const EMPTY_INSIGHT: &str = "Could not generate insight at this time.";

/// Shown when the source failed.
pub const UNAVAILABLE_INSIGHT: &str =
    "The geometry assistant is currently resting. Feel free to try again later!";

/// Something that can describe a computed shape.
#[async_trait(?Send)]
pub trait InsightSource {
    async fn fetch(&self, request: &InsightRequest) -> Result<String, InsightError>;
}

/// Source used when no credential is configured. Always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredSource;

#[async_trait(?Send)]
impl InsightSource for UnconfiguredSource {
    async fn fetch(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        Err(InsightError::MissingApiKey)
    }
}

/// Infallible wrapper around an [`InsightSource`].
pub struct InsightService {
    source: Box<dyn InsightSource>,
}

impl InsightService {
    pub fn new(source: impl InsightSource + 'static) -> Self {
        InsightService {
            source: Box::new(source),
        }
    }

    /// Insight text for `request`, or a fallback sentence.
    pub async fn insight_for(&self, request: &InsightRequest) -> String {
        match self.source.fetch(request).await {
            Ok(text) if text.is_empty() => {
                debug!(shape = %request.shape, "empty insight");
                EMPTY_INSIGHT.to_string()
            }
            Ok(text) => text,
            Err(err) => {
                warn!(shape = %request.shape, error = %err, "insight request failed");
                UNAVAILABLE_INSIGHT.to_string()
            }
        }
    }
}

/// User prompt sent to the text-generation model.
pub fn build_prompt(request: &InsightRequest) -> String {
    format!(
        "Explain the geometric properties of a {} with an area of {:.2} and a perimeter of {:.2}. \
         Provide a brief interesting fact or practical application for this shape in \
         architecture or engineering.",
        request.shape, request.area, request.perimeter
    )
}
