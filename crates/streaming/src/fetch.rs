//! Text-over-HTTP fetch capability, one implementation per target.

use std::future::Future;
use std::pin::Pin;

/// Boxed future without a `Send` bound; the browser fetcher is single threaded.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// GET a URL and return the response body as text.
///
/// Non-success statuses are errors; redirects follow the platform default.
pub trait Fetcher {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        (**self).fetch_text(url)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestFetcher;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{BoxFuture, FetchError, Fetcher};

    #[derive(Debug, Clone, Default)]
    pub struct ReqwestFetcher {
        client: reqwest::Client,
    }

    impl ReqwestFetcher {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl Fetcher for ReqwestFetcher {
        fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
            Box::pin(async move {
                let resp = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| FetchError::Network(e.to_string()))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                    });
                }
                resp.text().await.map_err(|e| FetchError::Body(e.to_string()))
            })
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::GlooFetcher;

/// Browser `fetch` through gloo-net.
#[cfg(target_arch = "wasm32")]
mod browser {
    use gloo_net::http::Request;

    use super::{BoxFuture, FetchError, Fetcher};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct GlooFetcher;

    impl Fetcher for GlooFetcher {
        fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
            Box::pin(async move {
                let resp = Request::get(url)
                    .send()
                    .await
                    .map_err(|e| FetchError::Network(e.to_string()))?;
                if !resp.ok() {
                    return Err(FetchError::Status {
                        status: resp.status(),
                    });
                }
                resp.text().await.map_err(|e| FetchError::Body(e.to_string()))
            })
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::{Fetcher, ReqwestFetcher};

    fn assert_fetcher<F: Fetcher>(_: &F) {}

    #[test]
    fn native_targets_fetch_through_reqwest() {
        assert_fetcher(&ReqwestFetcher::default());
    }
}
