//! Browser-automation capability for the activity scraper.
//!
//! The crate does not own a browser; it consumes one through [`PageBrowser`],
//! keeping the scraping pipeline testable and the automation backend (a
//! WebDriver wrapper, a headless-browser sidecar, ...) swappable at
//! composition time. Implementations with blocking internals should dispatch
//! to a blocking thread themselves.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Navigate-and-read capability over one browser instance.
///
/// Each worker in the scraping pool owns one instance for its lifetime; the
/// trait itself is not assumed safe for concurrent page-level use.
#[async_trait]
pub trait PageBrowser: Send + Sync {
    /// Navigate to `url` and wait for the page to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Attempt to dismiss a consent dialog if one is present.
    ///
    /// Expected to fail on pages that never show the dialog; callers go
    /// through [`dismiss_consent_best_effort`], which ignores all outcomes.
    async fn dismiss_consent(&self) -> Result<()>;

    /// The rendered HTML of the current page, after lazy content has loaded
    async fn rendered_html(&self) -> Result<String>;
}

/// Run the consent pre-step as a best-effort scoped operation.
///
/// All outcomes are intentionally ignored: the dialog is frequently absent
/// (already dismissed, new tab), and a page that never shows it is still
/// scrapeable. Outcomes are traced at debug level only, never as errors.
pub async fn dismiss_consent_best_effort(browser: &dyn PageBrowser, timeout: Duration) {
    match tokio::time::timeout(timeout, browser.dismiss_consent()).await {
        Ok(Ok(())) => tracing::debug!("consent dialog dismissed"),
        Ok(Err(e)) => tracing::debug!(error = %e, "no consent dialog dismissed"),
        Err(_) => tracing::debug!(timeout_ms = timeout.as_millis() as u64, "consent dismissal timed out"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StuckConsentBrowser {
        navigations: AtomicUsize,
    }

    #[async_trait]
    impl PageBrowser for StuckConsentBrowser {
        async fn navigate(&self, _url: &str) -> Result<()> {
            self.navigations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn dismiss_consent(&self) -> Result<()> {
            // Simulates a wait-for-element that never resolves
            std::future::pending::<()>().await;
            Ok(())
        }

        async fn rendered_html(&self) -> Result<String> {
            Ok("<html></html>".into())
        }
    }

    struct NoDialogBrowser;

    #[async_trait]
    impl PageBrowser for NoDialogBrowser {
        async fn navigate(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn dismiss_consent(&self) -> Result<()> {
            Err(Error::Browser("element not found".into()))
        }

        async fn rendered_html(&self) -> Result<String> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn consent_timeout_does_not_propagate() {
        let browser = StuckConsentBrowser {
            navigations: AtomicUsize::new(0),
        };
        // Returns normally despite the never-resolving dismissal
        dismiss_consent_best_effort(&browser, Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn missing_dialog_is_ignored() {
        dismiss_consent_best_effort(&NoDialogBrowser, Duration::from_millis(20)).await;
    }
}
