//! Browser backends and launch configuration.
//!
//! [`LaunchOptions`] is the project's standard test environment as a fixed
//! configuration object: visible browser, 1366x768 viewport, 50ms
//! interaction slow-down, sandbox disabled for CI containers. Callers may
//! override individual fields through the builders.
//!
//! Two backends implement the driver contract. The [`sim`] module hosts an
//! in-process application model and is always available, which keeps
//! `cargo test` hermetic. With the `browser` feature, the [`cdp`] module
//! drives a real Chromium over the DevTools protocol via chromiumoxide.

use crate::result::{IngresoError, IngresoResult};
use std::time::Duration;

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Delay inserted after each interaction to mimic human timing
    pub slow_mo: Duration,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: false,
            viewport_width: 1366,
            viewport_height: 768,
            slow_mo: Duration::from_millis(50),
            sandbox: false,
            chromium_path: None,
        }
    }
}

impl LaunchOptions {
    /// Create options with the standard test-environment defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the interaction slow-down delay
    #[must_use]
    pub const fn with_slow_mo(mut self, slow_mo: Duration) -> Self {
        self.slow_mo = slow_mo;
        self
    }

    /// Enable or disable the sandbox
    #[must_use]
    pub const fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }
}

// ============================================================================
// Simulated backend (always available)
// ============================================================================

/// In-process page host driven by a pluggable application model.
pub mod sim {
    use super::{Duration, IngresoError, IngresoResult, LaunchOptions};
    use crate::driver::{BrowserDriver, ElementHandle, PageDriver, Screenshot};
    use crate::wait::PageEvent;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, PoisonError};

    /// The canonical 1x1 transparent PNG. Simulated captures return real
    /// PNG bytes so artifact tests can check the signature.
    const PIXEL_PNG: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    /// A single element in a simulated page
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SimElement {
        /// Tag name, lowercase
        pub tag: String,
        /// Text content
        pub text: String,
        /// Form value (inputs)
        pub value: String,
        /// Whether the element is visible
        pub visible: bool,
    }

    impl SimElement {
        /// Create an element with the given tag
        #[must_use]
        pub fn new(tag: impl Into<String>) -> Self {
            Self {
                tag: tag.into(),
                text: String::new(),
                value: String::new(),
                visible: true,
            }
        }

        /// Set the text content
        #[must_use]
        pub fn with_text(mut self, text: impl Into<String>) -> Self {
            self.text = text.into();
            self
        }

        /// Set the form value
        #[must_use]
        pub fn with_value(mut self, value: impl Into<String>) -> Self {
            self.value = value.into();
            self
        }

        /// Set visibility
        #[must_use]
        pub const fn with_visible(mut self, visible: bool) -> Self {
            self.visible = visible;
            self
        }
    }

    /// Selector-keyed snapshot of one page
    #[derive(Debug, Clone, Default)]
    pub struct SimDom {
        /// URL this snapshot represents
        pub url: String,
        /// Document title
        pub title: String,
        elements: BTreeMap<String, SimElement>,
    }

    impl SimDom {
        /// Create an empty page snapshot
        #[must_use]
        pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                title: title.into(),
                elements: BTreeMap::new(),
            }
        }

        /// Add an element under a selector (builder form)
        #[must_use]
        pub fn with_element(mut self, selector: impl Into<String>, element: SimElement) -> Self {
            self.elements.insert(selector.into(), element);
            self
        }

        /// Insert or replace an element under a selector
        pub fn insert(&mut self, selector: impl Into<String>, element: SimElement) {
            self.elements.insert(selector.into(), element);
        }

        /// Remove an element
        pub fn remove(&mut self, selector: &str) -> Option<SimElement> {
            self.elements.remove(selector)
        }

        /// Look up an element
        #[must_use]
        pub fn element(&self, selector: &str) -> Option<&SimElement> {
            self.elements.get(selector)
        }

        /// Look up an element mutably
        pub fn element_mut(&mut self, selector: &str) -> Option<&mut SimElement> {
            self.elements.get_mut(selector)
        }

        /// Whether a selector matches a visible element
        #[must_use]
        pub fn is_visible(&self, selector: &str) -> bool {
            self.elements.get(selector).is_some_and(|e| e.visible)
        }
    }

    /// Follow-up effect of a click, applied by the page after the handler
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SimAction {
        /// Load another page of the application
        Navigate(String),
        /// Record a passive diagnostic
        Emit(PageEvent),
    }

    /// Application model hosted by the simulated backend.
    ///
    /// `page_for` supplies the DOM snapshot for a URL (`None` marks the
    /// address unreachable); `on_click` implements the application's
    /// reaction to activating an element, mutating the current DOM in
    /// place and/or returning follow-up actions.
    pub trait SimBehavior: Send {
        /// Page snapshot for a URL
        fn page_for(&self, url: &str) -> Option<SimDom>;

        /// React to a click on `selector`
        fn on_click(&mut self, selector: &str, dom: &mut SimDom) -> Vec<SimAction>;
    }

    type SharedBehavior = Arc<Mutex<Box<dyn SimBehavior>>>;

    /// Simulated browser instance
    pub struct SimBrowser {
        options: LaunchOptions,
        behavior: SharedBehavior,
        closed: bool,
    }

    impl std::fmt::Debug for SimBrowser {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SimBrowser")
                .field("options", &self.options)
                .field("closed", &self.closed)
                .finish_non_exhaustive()
        }
    }

    impl SimBrowser {
        /// Launch a simulated browser hosting `behavior`
        pub fn launch(options: LaunchOptions, behavior: Box<dyn SimBehavior>) -> Self {
            tracing::info!(
                target: "ingreso::browser",
                headless = options.headless,
                width = options.viewport_width,
                height = options.viewport_height,
                "launching simulated browser"
            );
            Self {
                options,
                behavior: Arc::new(Mutex::new(behavior)),
                closed: false,
            }
        }

        /// Get the launch options
        #[must_use]
        pub const fn options(&self) -> &LaunchOptions {
            &self.options
        }
    }

    impl BrowserDriver for SimBrowser {
        fn new_page(&mut self) -> IngresoResult<Box<dyn PageDriver>> {
            if self.closed {
                return Err(IngresoError::Page {
                    message: "browser is closed".to_string(),
                });
            }
            Ok(Box::new(SimPage {
                behavior: Arc::clone(&self.behavior),
                dom: SimDom::new("about:blank", ""),
                events: Vec::new(),
                width: self.options.viewport_width,
                height: self.options.viewport_height,
                closed: false,
            }))
        }

        fn close(&mut self) -> IngresoResult<()> {
            self.closed = true;
            Ok(())
        }
    }

    /// One simulated page
    pub struct SimPage {
        behavior: SharedBehavior,
        dom: SimDom,
        events: Vec<PageEvent>,
        width: u32,
        height: u32,
        closed: bool,
    }

    impl std::fmt::Debug for SimPage {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SimPage")
                .field("url", &self.dom.url)
                .field("events", &self.events.len())
                .field("closed", &self.closed)
                .finish_non_exhaustive()
        }
    }

    impl SimPage {
        fn ensure_open(&self) -> IngresoResult<()> {
            if self.closed {
                return Err(IngresoError::Page {
                    message: "page is closed".to_string(),
                });
            }
            Ok(())
        }

        fn record(&mut self, event: PageEvent) {
            event.log();
            self.events.push(event);
        }

        fn load(&mut self, url: &str) -> IngresoResult<()> {
            let behavior = Arc::clone(&self.behavior);
            let guard = behavior.lock().unwrap_or_else(PoisonError::into_inner);
            match guard.page_for(url) {
                Some(dom) => {
                    self.dom = dom;
                    Ok(())
                }
                None => {
                    drop(guard);
                    self.record(PageEvent::RequestFailed {
                        url: url.to_string(),
                        reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                    });
                    Err(IngresoError::Navigation {
                        url: url.to_string(),
                        message: "address is not reachable".to_string(),
                    })
                }
            }
        }
    }

    impl PageDriver for SimPage {
        fn goto(&mut self, url: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            self.load(url)
        }

        fn type_text(&mut self, selector: &str, text: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            match self.dom.element_mut(selector) {
                Some(element) => {
                    element.value.push_str(text);
                    Ok(())
                }
                None => Err(IngresoError::ElementNotFound {
                    selector: selector.to_string(),
                }),
            }
        }

        fn click(&mut self, selector: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            if !self.dom.is_visible(selector) {
                return Err(IngresoError::ElementNotFound {
                    selector: selector.to_string(),
                });
            }
            let behavior = Arc::clone(&self.behavior);
            let actions = {
                let mut guard = behavior.lock().unwrap_or_else(PoisonError::into_inner);
                guard.on_click(selector, &mut self.dom)
            };
            for action in actions {
                match action {
                    SimAction::Navigate(url) => self.load(&url)?,
                    SimAction::Emit(event) => self.record(event),
                }
            }
            Ok(())
        }

        fn clear_text(&mut self, selector: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            match self.dom.element_mut(selector) {
                Some(element) => {
                    element.value.clear();
                    Ok(())
                }
                None => Err(IngresoError::ElementNotFound {
                    selector: selector.to_string(),
                }),
            }
        }

        fn wait_for_selector(
            &mut self,
            selector: &str,
            timeout: Duration,
        ) -> IngresoResult<ElementHandle> {
            self.ensure_open()?;
            // The DOM only changes through driver calls, so absence is
            // final and the wait resolves without sleeping.
            match self.dom.element(selector) {
                Some(element) if element.visible => Ok(ElementHandle::new(element.tag.clone())
                    .with_text(element.text.clone())),
                _ => Err(IngresoError::Timeout {
                    ms: timeout.as_millis() as u64,
                }),
            }
        }

        fn text_content(&mut self, selector: &str) -> IngresoResult<Option<String>> {
            self.ensure_open()?;
            Ok(self.dom.element(selector).map(|e| e.text.clone()))
        }

        fn title(&mut self) -> IngresoResult<String> {
            self.ensure_open()?;
            Ok(self.dom.title.clone())
        }

        fn current_url(&self) -> &str {
            &self.dom.url
        }

        fn screenshot(&mut self) -> IngresoResult<Screenshot> {
            self.ensure_open()?;
            Ok(Screenshot::new(PIXEL_PNG.to_vec(), self.width, self.height))
        }

        fn take_events(&mut self) -> Vec<PageEvent> {
            std::mem::take(&mut self.events)
        }

        fn close(&mut self) -> IngresoResult<()> {
            self.closed = true;
            Ok(())
        }

        fn is_closed(&self) -> bool {
            self.closed
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used, clippy::expect_used)]
    mod tests {
        use super::*;

        const LOGIN_URL: &str = "app:/login";
        const HOME_URL: &str = "app:/home";

        /// Two-page app: a form page whose button navigates home when the
        /// input holds "ok", otherwise shows an error banner.
        struct FormApp;

        impl FormApp {
            fn login_dom() -> SimDom {
                SimDom::new(LOGIN_URL, "Form")
                    .with_element("#field", SimElement::new("input"))
                    .with_element("#submit", SimElement::new("button").with_text("Go"))
            }

            fn home_dom() -> SimDom {
                SimDom::new(HOME_URL, "Home")
                    .with_element("#greeting", SimElement::new("div").with_text("hello"))
            }
        }

        impl SimBehavior for FormApp {
            fn page_for(&self, url: &str) -> Option<SimDom> {
                match url {
                    LOGIN_URL => Some(Self::login_dom()),
                    HOME_URL => Some(Self::home_dom()),
                    _ => None,
                }
            }

            fn on_click(&mut self, selector: &str, dom: &mut SimDom) -> Vec<SimAction> {
                if selector != "#submit" {
                    return vec![];
                }
                let value = dom.element("#field").map(|e| e.value.clone()).unwrap_or_default();
                if value == "ok" {
                    vec![SimAction::Navigate(HOME_URL.to_string())]
                } else {
                    dom.insert("#error", SimElement::new("h3").with_text("bad value"));
                    vec![SimAction::Emit(PageEvent::ConsoleError {
                        text: "form rejected".to_string(),
                    })]
                }
            }
        }

        fn open_page() -> Box<dyn PageDriver> {
            let mut browser = SimBrowser::launch(LaunchOptions::default(), Box::new(FormApp));
            browser.new_page().unwrap()
        }

        #[test]
        fn test_goto_loads_known_page() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            assert_eq!(page.current_url(), LOGIN_URL);
            assert_eq!(page.title().unwrap(), "Form");
        }

        #[test]
        fn test_goto_unknown_url_fails_and_records_request() {
            let mut page = open_page();
            let err = page.goto("app:/nowhere").unwrap_err();
            assert!(matches!(err, IngresoError::Navigation { .. }));
            let events = page.take_events();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].as_str(), "requestfailed");
        }

        #[test]
        fn test_type_appends_to_value() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            page.type_text("#field", "o").unwrap();
            page.type_text("#field", "k").unwrap();
            page.click("#submit").unwrap();
            assert_eq!(page.current_url(), HOME_URL);
        }

        #[test]
        fn test_click_applies_dom_mutation_and_event() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            page.type_text("#field", "wrong").unwrap();
            page.click("#submit").unwrap();
            let banner = page.text_content("#error").unwrap();
            assert_eq!(banner.as_deref(), Some("bad value"));
            let events = page.take_events();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].as_str(), "console");
        }

        #[test]
        fn test_clear_text_empties_value() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            page.type_text("#field", "ok").unwrap();
            page.clear_text("#field").unwrap();
            page.click("#submit").unwrap();
            // Cleared value no longer matches, so we stay on the form.
            assert_eq!(page.current_url(), LOGIN_URL);
        }

        #[test]
        fn test_clear_text_missing_element() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            let err = page.clear_text("#ghost").unwrap_err();
            assert!(matches!(err, IngresoError::ElementNotFound { .. }));
        }

        #[test]
        fn test_wait_for_selector_present() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            let handle = page
                .wait_for_selector("#submit", Duration::from_millis(3000))
                .unwrap();
            assert_eq!(handle.tag_name, "button");
            assert_eq!(handle.text_content, "Go");
        }

        #[test]
        fn test_wait_for_selector_absent_times_out_immediately() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            let start = std::time::Instant::now();
            let err = page
                .wait_for_selector("#error", Duration::from_millis(3000))
                .unwrap_err();
            assert!(matches!(err, IngresoError::Timeout { ms: 3000 }));
            assert!(start.elapsed() < Duration::from_millis(100));
        }

        #[test]
        fn test_screenshot_is_png() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            let shot = page.screenshot().unwrap();
            assert!(shot.data.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
            assert_eq!(shot.width, 1366);
            assert_eq!(shot.height, 768);
        }

        #[test]
        fn test_operations_fail_after_close() {
            let mut page = open_page();
            page.goto(LOGIN_URL).unwrap();
            page.close().unwrap();
            assert!(page.is_closed());
            let err = page.goto(LOGIN_URL).unwrap_err();
            assert!(matches!(err, IngresoError::Page { .. }));
        }

        #[test]
        fn test_closed_browser_refuses_pages() {
            let mut browser = SimBrowser::launch(LaunchOptions::default(), Box::new(FormApp));
            BrowserDriver::close(&mut browser).unwrap();
            assert!(browser.new_page().is_err());
        }
    }
}

// ============================================================================
// Chromium backend over CDP (when the `browser` feature is enabled)
// ============================================================================

/// Real Chromium backend bridging the synchronous driver contract onto
/// chromiumoxide with an owned tokio runtime.
#[cfg(feature = "browser")]
#[allow(clippy::future_not_send, clippy::significant_drop_in_scrutinee)]
pub mod cdp {
    use super::{Duration, IngresoError, IngresoResult, LaunchOptions};
    use crate::driver::{BrowserDriver, ElementHandle, PageDriver, Screenshot};
    use crate::wait::{poll_until, PageEvent, WaitOptions, DEFAULT_POLL_INTERVAL_MS};
    use base64::Engine;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::network::{EventLoadingFailed, EventRequestWillBeSent};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams, CloseParams,
    };
    use chromiumoxide::cdp::js_protocol::runtime::{ConsoleApiCalledType, EventConsoleApiCalled};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex as StdMutex, PoisonError};
    use tokio::runtime::Runtime;

    fn launch_error(message: impl Into<String>) -> IngresoError {
        IngresoError::BrowserLaunch {
            message: message.into(),
        }
    }

    /// Chromium instance with a real CDP connection
    pub struct ChromiumBrowser {
        options: LaunchOptions,
        runtime: Arc<Runtime>,
        inner: Arc<tokio::sync::Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handler: tokio::task::JoinHandle<()>,
        closed: bool,
    }

    impl std::fmt::Debug for ChromiumBrowser {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ChromiumBrowser")
                .field("options", &self.options)
                .field("closed", &self.closed)
                .finish_non_exhaustive()
        }
    }

    impl ChromiumBrowser {
        /// Launch Chromium with the given options
        ///
        /// # Errors
        ///
        /// Returns `BrowserLaunch` when the runtime or the browser process
        /// cannot be started.
        pub fn launch(options: LaunchOptions) -> IngresoResult<Self> {
            let runtime = Arc::new(
                tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()?,
            );

            let mut builder =
                CdpConfig::builder().window_size(options.viewport_width, options.viewport_height);
            if !options.headless {
                builder = builder.with_head();
            }
            if !options.sandbox {
                builder = builder.no_sandbox().arg("--disable-setuid-sandbox");
            }
            if let Some(ref path) = options.chromium_path {
                builder = builder.chrome_executable(path);
            }
            let config = builder.build().map_err(launch_error)?;

            let (browser, handler) = runtime.block_on(async {
                let (browser, mut handler) = CdpBrowser::launch(config)
                    .await
                    .map_err(|e| launch_error(e.to_string()))?;
                let handle = tokio::spawn(async move {
                    while let Some(event) = handler.next().await {
                        if event.is_err() {
                            break;
                        }
                    }
                });
                Ok::<_, IngresoError>((browser, handle))
            })?;

            tracing::info!(
                target: "ingreso::browser",
                headless = options.headless,
                width = options.viewport_width,
                height = options.viewport_height,
                sandbox = options.sandbox,
                "launched chromium"
            );

            Ok(Self {
                options,
                runtime,
                inner: Arc::new(tokio::sync::Mutex::new(browser)),
                handler,
                closed: false,
            })
        }

        /// Get the launch options
        #[must_use]
        pub const fn options(&self) -> &LaunchOptions {
            &self.options
        }
    }

    impl BrowserDriver for ChromiumBrowser {
        fn new_page(&mut self) -> IngresoResult<Box<dyn PageDriver>> {
            if self.closed {
                return Err(IngresoError::Page {
                    message: "browser is closed".to_string(),
                });
            }
            let runtime = Arc::clone(&self.runtime);
            let inner = Arc::clone(&self.inner);
            let events: Arc<StdMutex<Vec<PageEvent>>> = Arc::new(StdMutex::new(Vec::new()));

            let (page, listeners) = runtime.block_on(async {
                let browser = inner.lock().await;
                let page = browser.new_page("about:blank").await.map_err(|e| {
                    IngresoError::Page {
                        message: e.to_string(),
                    }
                })?;
                let listeners = spawn_observers(&page, Arc::clone(&events)).await?;
                Ok::<_, IngresoError>((page, listeners))
            })?;

            Ok(Box::new(ChromiumPage {
                runtime,
                inner: Arc::new(tokio::sync::Mutex::new(page)),
                events,
                listeners,
                url: String::from("about:blank"),
                slow_mo: self.options.slow_mo,
                closed: false,
            }))
        }

        fn close(&mut self) -> IngresoResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let mut browser = inner.lock().await;
                browser
                    .close()
                    .await
                    .map_err(|e| launch_error(e.to_string()))
            })?;
            Ok(())
        }
    }

    impl Drop for ChromiumBrowser {
        fn drop(&mut self) {
            if !self.closed {
                tracing::warn!(target: "ingreso::browser", "chromium dropped while open; closing");
                let _ = BrowserDriver::close(self);
            }
        }
    }

    /// Wire the two passive observers onto a fresh page: console errors
    /// and failed network requests, both forwarded to tracing and kept
    /// until drained.
    async fn spawn_observers(
        page: &CdpPage,
        events: Arc<StdMutex<Vec<PageEvent>>>,
    ) -> IngresoResult<Vec<tokio::task::JoinHandle<()>>> {
        let wire_error = |e: chromiumoxide::error::CdpError| IngresoError::Page {
            message: e.to_string(),
        };

        let mut console = page
            .event_listener::<EventConsoleApiCalled>()
            .await
            .map_err(wire_error)?;
        let console_events = Arc::clone(&events);
        let console_task = tokio::spawn(async move {
            while let Some(event) = console.next().await {
                if event.r#type != ConsoleApiCalledType::Error {
                    continue;
                }
                let text = event
                    .args
                    .iter()
                    .filter_map(|arg| arg.value.as_ref())
                    .map(|value| match value.as_str() {
                        Some(s) => s.to_string(),
                        None => value.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                let diagnostic = PageEvent::ConsoleError { text };
                diagnostic.log();
                push_event(&console_events, diagnostic);
            }
        });

        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(wire_error)?;
        let mut failures = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(wire_error)?;
        let request_events = Arc::clone(&events);
        let request_task = tokio::spawn(async move {
            // LoadingFailed only carries a request id; remember URLs from
            // RequestWillBeSent to report something readable.
            let mut urls: HashMap<String, String> = HashMap::new();
            loop {
                tokio::select! {
                    sent = requests.next() => {
                        match sent {
                            Some(event) => {
                                urls.insert(
                                    event.request_id.inner().clone(),
                                    event.request.url.clone(),
                                );
                            }
                            None => break,
                        }
                    }
                    failed = failures.next() => {
                        match failed {
                            Some(event) => {
                                let url = urls
                                    .remove(event.request_id.inner())
                                    .unwrap_or_else(|| "<unknown>".to_string());
                                let diagnostic = PageEvent::RequestFailed {
                                    url,
                                    reason: event.error_text.clone(),
                                };
                                diagnostic.log();
                                push_event(&request_events, diagnostic);
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Ok(vec![console_task, request_task])
    }

    fn push_event(events: &Arc<StdMutex<Vec<PageEvent>>>, event: PageEvent) {
        events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// A Chromium page with a real CDP connection
    pub struct ChromiumPage {
        runtime: Arc<Runtime>,
        inner: Arc<tokio::sync::Mutex<CdpPage>>,
        events: Arc<StdMutex<Vec<PageEvent>>>,
        listeners: Vec<tokio::task::JoinHandle<()>>,
        url: String,
        slow_mo: Duration,
        closed: bool,
    }

    impl std::fmt::Debug for ChromiumPage {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ChromiumPage")
                .field("url", &self.url)
                .field("closed", &self.closed)
                .finish_non_exhaustive()
        }
    }

    impl ChromiumPage {
        fn ensure_open(&self) -> IngresoResult<()> {
            if self.closed {
                return Err(IngresoError::Page {
                    message: "page is closed".to_string(),
                });
            }
            Ok(())
        }

        fn pace(&self) {
            if !self.slow_mo.is_zero() {
                std::thread::sleep(self.slow_mo);
            }
        }

        fn find(&self, selector: &str) -> IngresoResult<ElementHandle> {
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                let element =
                    page.find_element(selector)
                        .await
                        .map_err(|_| IngresoError::ElementNotFound {
                            selector: selector.to_string(),
                        })?;
                let text = element.inner_text().await.ok().flatten().unwrap_or_default();
                Ok(ElementHandle::new("").with_text(text))
            })
        }
    }

    impl PageDriver for ChromiumPage {
        fn goto(&mut self, url: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                page.goto(url).await.map_err(|e| IngresoError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                Ok::<_, IngresoError>(())
            })?;
            self.url = url.to_string();
            self.pace();
            Ok(())
        }

        fn type_text(&mut self, selector: &str, text: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                let element =
                    page.find_element(selector)
                        .await
                        .map_err(|_| IngresoError::ElementNotFound {
                            selector: selector.to_string(),
                        })?;
                element
                    .click()
                    .await
                    .map_err(|e| IngresoError::Input {
                        message: e.to_string(),
                    })?;
                element
                    .type_str(text)
                    .await
                    .map_err(|e| IngresoError::Input {
                        message: e.to_string(),
                    })?;
                Ok::<_, IngresoError>(())
            })?;
            self.pace();
            Ok(())
        }

        fn click(&mut self, selector: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                let element =
                    page.find_element(selector)
                        .await
                        .map_err(|_| IngresoError::ElementNotFound {
                            selector: selector.to_string(),
                        })?;
                element.click().await.map_err(|e| IngresoError::Input {
                    message: e.to_string(),
                })?;
                Ok::<_, IngresoError>(())
            })?;
            // A click may navigate; refresh our idea of the URL.
            let inner = Arc::clone(&self.inner);
            if let Some(url) = self.runtime.block_on(async {
                let page = inner.lock().await;
                page.url().await.ok().flatten()
            }) {
                self.url = url;
            }
            self.pace();
            Ok(())
        }

        fn clear_text(&mut self, selector: &str) -> IngresoResult<()> {
            self.ensure_open()?;
            let quoted = serde_json::to_string(selector)?;
            let script = format!("document.querySelector({quoted}).value = ''");
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                page.evaluate(script).await.map_err(|e| IngresoError::Input {
                    message: e.to_string(),
                })?;
                Ok::<_, IngresoError>(())
            })?;
            self.pace();
            Ok(())
        }

        fn wait_for_selector(
            &mut self,
            selector: &str,
            timeout: Duration,
        ) -> IngresoResult<ElementHandle> {
            self.ensure_open()?;
            let options = WaitOptions::new()
                .with_timeout(timeout.as_millis() as u64)
                .with_poll_interval(DEFAULT_POLL_INTERVAL_MS);
            poll_until(&options, || self.find(selector).ok()).ok_or(IngresoError::Timeout {
                ms: timeout.as_millis() as u64,
            })
        }

        fn text_content(&mut self, selector: &str) -> IngresoResult<Option<String>> {
            self.ensure_open()?;
            Ok(self.find(selector).ok().map(|handle| handle.text_content))
        }

        fn title(&mut self) -> IngresoResult<String> {
            self.ensure_open()?;
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                let title = page.get_title().await.map_err(|e| IngresoError::Page {
                    message: e.to_string(),
                })?;
                Ok(title.unwrap_or_default())
            })
        }

        fn current_url(&self) -> &str {
            &self.url
        }

        fn screenshot(&mut self) -> IngresoResult<Screenshot> {
            self.ensure_open()?;
            let inner = Arc::clone(&self.inner);
            let data = self.runtime.block_on(async {
                let page = inner.lock().await;
                let params = CaptureScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build();
                let response =
                    page.execute(params)
                        .await
                        .map_err(|e| IngresoError::Screenshot {
                            message: e.to_string(),
                        })?;
                base64::engine::general_purpose::STANDARD
                    .decode(&response.data)
                    .map_err(|e| IngresoError::Screenshot {
                        message: e.to_string(),
                    })
            })?;
            Ok(Screenshot::new(
                data,
                0, // dimensions live in the PNG header; not re-parsed here
                0,
            ))
        }

        fn take_events(&mut self) -> Vec<PageEvent> {
            std::mem::take(
                &mut *self
                    .events
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            )
        }

        fn close(&mut self) -> IngresoResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            for task in self.listeners.drain(..) {
                task.abort();
            }
            let inner = Arc::clone(&self.inner);
            self.runtime.block_on(async {
                let page = inner.lock().await;
                page.execute(CloseParams::default())
                    .await
                    .map_err(|e| IngresoError::Page {
                        message: e.to_string(),
                    })?;
                Ok::<_, IngresoError>(())
            })?;
            Ok(())
        }

        fn is_closed(&self) -> bool {
            self.closed
        }
    }
}
