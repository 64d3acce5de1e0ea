//! Test session lifecycle management.
//!
//! One [`TestSession`] owns the browser handle for a whole test run and at
//! most one live page at a time. The lifecycle is the explicit state
//! machine `Unstarted -> BrowserReady -> [PageReady -> PageClosed]* ->
//! BrowserClosed`; transitions attempted from the wrong state fail with
//! `IngresoError::InvalidState` instead of silently doing the wrong thing.
//!
//! Browser-launch failure is fatal for the run. A single page's setup
//! failure leaves the browser in `BrowserReady`, so subsequent test cases
//! proceed with a fresh page.

use crate::browser::sim::{SimBehavior, SimBrowser};
use crate::browser::LaunchOptions;
use crate::driver::{BrowserDriver, PageDriver};
use crate::result::{IngresoError, IngresoResult};

/// Lifecycle state of a [`TestSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No browser yet
    Unstarted,
    /// Browser launched, no page open
    BrowserReady,
    /// Browser launched and one page open
    PageReady,
    /// Terminal: browser freed
    BrowserClosed,
}

impl SessionState {
    /// Human-readable state name for error messages and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unstarted => "Unstarted",
            Self::BrowserReady => "BrowserReady",
            Self::PageReady => "PageReady",
            Self::BrowserClosed => "BrowserClosed",
        }
    }
}

/// Run-scoped browser plus per-test page lifecycle.
///
/// # Example
///
/// ```ignore
/// let mut session = TestSession::new();
/// session.start_simulated(LaunchOptions::default(), Box::new(Storefront::new()))?;
/// session.open_page()?;
/// // ... drive the page through a page object ...
/// session.close_page()?;
/// session.shutdown()?;
/// ```
pub struct TestSession {
    state: SessionState,
    browser: Option<Box<dyn BrowserDriver>>,
    page: Option<Box<dyn PageDriver>>,
}

impl std::fmt::Debug for TestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSession")
            .field("state", &self.state)
            .field("has_page", &self.page.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSession {
    /// Create an unstarted session
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Unstarted,
            browser: None,
            page: None,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    fn invalid(&self, attempted: &str) -> IngresoError {
        IngresoError::InvalidState {
            message: format!("{attempted} in state {}", self.state.as_str()),
        }
    }

    fn install(&mut self, browser: Box<dyn BrowserDriver>) {
        self.browser = Some(browser);
        self.state = SessionState::BrowserReady;
        tracing::info!(target: "ingreso::session", "session entered BrowserReady");
    }

    /// Launch the simulated backend hosting `behavior`.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the session is `Unstarted`.
    pub fn start_simulated(
        &mut self,
        options: LaunchOptions,
        behavior: Box<dyn SimBehavior>,
    ) -> IngresoResult<()> {
        if self.state != SessionState::Unstarted {
            return Err(self.invalid("start_simulated"));
        }
        self.install(Box::new(SimBrowser::launch(options, behavior)));
        Ok(())
    }

    /// Launch a real Chromium backend.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the session is `Unstarted`; `BrowserLaunch`
    /// when the browser process cannot be started (fatal for the run).
    #[cfg(feature = "browser")]
    pub fn start_chromium(&mut self, options: LaunchOptions) -> IngresoResult<()> {
        if self.state != SessionState::Unstarted {
            return Err(self.invalid("start_chromium"));
        }
        let browser = crate::browser::cdp::ChromiumBrowser::launch(options)?;
        self.install(Box::new(browser));
        Ok(())
    }

    /// Adopt an already-launched browser (custom backends).
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the session is `Unstarted`.
    pub fn start_with(&mut self, browser: Box<dyn BrowserDriver>) -> IngresoResult<()> {
        if self.state != SessionState::Unstarted {
            return Err(self.invalid("start_with"));
        }
        self.install(browser);
        Ok(())
    }

    /// Open the page for one test case.
    ///
    /// A page-setup failure leaves the session in `BrowserReady`: only the
    /// test case it belongs to is lost.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the session is `BrowserReady`; `Page` when the
    /// backend cannot create the page.
    pub fn open_page(&mut self) -> IngresoResult<&mut dyn PageDriver> {
        if self.state != SessionState::BrowserReady {
            return Err(self.invalid("open_page"));
        }
        let browser = self
            .browser
            .as_mut()
            .ok_or_else(|| IngresoError::InvalidState {
                message: "browser handle missing in BrowserReady".to_string(),
            })?;
        let page = browser.new_page()?;
        self.state = SessionState::PageReady;
        tracing::debug!(target: "ingreso::session", "page opened");
        Ok(&mut **self.page.insert(page))
    }

    /// The live page, if one is open
    pub fn page(&mut self) -> Option<&mut (dyn PageDriver + 'static)> {
        self.page.as_deref_mut()
    }

    /// Close the current page, draining its remaining diagnostics.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no page is open.
    pub fn close_page(&mut self) -> IngresoResult<()> {
        if self.state != SessionState::PageReady {
            return Err(self.invalid("close_page"));
        }
        if let Some(mut page) = self.page.take() {
            let leftover = page.take_events();
            if !leftover.is_empty() {
                tracing::debug!(
                    target: "ingreso::session",
                    count = leftover.len(),
                    "diagnostics still pending at page close"
                );
                for event in &leftover {
                    event.log();
                }
            }
            page.close()?;
        }
        self.state = SessionState::BrowserReady;
        tracing::debug!(target: "ingreso::session", "page closed");
        Ok(())
    }

    /// Close any live page, then the browser. Terminal; calling again on a
    /// closed session is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the backend's close failure.
    pub fn shutdown(&mut self) -> IngresoResult<()> {
        if self.state == SessionState::BrowserClosed {
            return Ok(());
        }
        if self.state == SessionState::PageReady {
            self.close_page()?;
        }
        if let Some(mut browser) = self.browser.take() {
            browser.close()?;
        }
        self.state = SessionState::BrowserClosed;
        tracing::info!(target: "ingreso::session", "session entered BrowserClosed");
        Ok(())
    }
}

impl Drop for TestSession {
    fn drop(&mut self) {
        if self.state != SessionState::BrowserClosed && self.state != SessionState::Unstarted {
            tracing::warn!(
                target: "ingreso::session",
                state = self.state.as_str(),
                "session dropped before shutdown; tearing down"
            );
            let _ = self.shutdown();
        }
    }
}
