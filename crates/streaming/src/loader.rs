//! Sequential multi-source world loading with fallback.

use formats::FeatureCollection;
use tracing::{info, warn};

use crate::fetch::Fetcher;
use crate::source::{SourceError, WorldSource, default_sources};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no world sources configured")]
    NoSources,
    #[error("all {attempts} world sources failed; last ({url}): {last}")]
    Exhausted {
        attempts: usize,
        url: String,
        #[source]
        last: SourceError,
    },
}

impl LoadError {
    pub fn attempts(&self) -> usize {
        match self {
            LoadError::NoSources => 0,
            LoadError::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Tries each source in order until one yields polygon features.
#[derive(Debug, Clone)]
pub struct WorldLoader<F> {
    fetcher: F,
    sources: Vec<WorldSource>,
}

impl<F: Fetcher> WorldLoader<F> {
    pub fn new(fetcher: F, sources: Vec<WorldSource>) -> Self {
        Self { fetcher, sources }
    }

    pub fn with_default_sources(fetcher: F) -> Self {
        Self::new(fetcher, default_sources())
    }

    pub fn sources(&self) -> &[WorldSource] {
        &self.sources
    }

    /// Fetch and normalize a single source.
    pub async fn fetch_source(
        &self,
        source: &WorldSource,
    ) -> Result<FeatureCollection, SourceError> {
        let payload = self.fetcher.fetch_text(&source.url).await?;
        source.format.decode(&payload)
    }

    pub async fn load(&self) -> Result<FeatureCollection, LoadError> {
        let mut last = None;
        for (index, source) in self.sources.iter().enumerate() {
            info!(
                attempt = index + 1,
                url = %source.url,
                format = %source.format,
                "fetching world source"
            );
            match self.fetch_source(source).await {
                Ok(features) => {
                    info!(
                        url = %source.url,
                        features = features.len(),
                        polygons = features.area_count(),
                        "world source loaded"
                    );
                    return Ok(features);
                }
                Err(err) => {
                    warn!(url = %source.url, error = %err, "world source failed");
                    last = Some((source.url.clone(), err));
                }
            }
        }
        match last {
            Some((url, last)) => Err(LoadError::Exhausted {
                attempts: self.sources.len(),
                url,
                last,
            }),
            None => Err(LoadError::NoSources),
        }
    }
}
