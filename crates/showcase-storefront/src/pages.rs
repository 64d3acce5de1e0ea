//! Page objects of the storefront suite.
//!
//! [`LoginPage`] binds the login-page locators to one driver page and
//! exposes the suite's semantic operations. The two outcome queries
//! (`error_message`, `is_logged_in`) use a short bounded wait and degrade
//! silently: a bounded wait elapsing means "the expected state did not
//! appear", which is a valid result for half the scenarios, not a
//! failure. Everything else propagates driver errors.

use crate::config::{LoginSelectors, SuiteConfig};
use ingreso::page_object::{self, PageObject};
use ingreso::{ArtifactStore, IngresoError, IngresoResult, PageDriver};
use std::path::PathBuf;
use std::time::Duration;

/// Bounded wait for the outcome queries, in milliseconds
pub const OUTCOME_WAIT_MS: u64 = 3000;

/// Route descriptor for the login page
#[derive(Debug, Clone)]
struct LoginRoute {
    url: String,
    ready_selector: String,
    load_timeout_ms: u64,
}

impl PageObject for LoginRoute {
    fn url(&self) -> &str {
        &self.url
    }

    fn ready_selector(&self) -> &str {
        &self.ready_selector
    }

    fn load_timeout_ms(&self) -> u64 {
        self.load_timeout_ms
    }

    fn page_name(&self) -> &str {
        "LoginPage"
    }
}

/// The login page, bound to one live driver page
pub struct LoginPage<'d> {
    page: &'d mut dyn PageDriver,
    route: LoginRoute,
    selectors: LoginSelectors,
}

impl std::fmt::Debug for LoginPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPage")
            .field("url", &self.route.url)
            .finish_non_exhaustive()
    }
}

impl<'d> LoginPage<'d> {
    /// Bind the page object to a driver page using the fixture's locators
    pub fn new(page: &'d mut dyn PageDriver, config: &SuiteConfig) -> Self {
        let selectors = config.selectors.login_page.clone();
        Self {
            page,
            route: LoginRoute {
                url: config.base_url.clone(),
                ready_selector: selectors.username_input.clone(),
                load_timeout_ms: config.timeouts.page_load,
            },
            selectors,
        }
    }

    /// The login page's locator set
    #[must_use]
    pub const fn selectors(&self) -> &LoginSelectors {
        &self.selectors
    }

    /// Load the login page and wait for its form to be ready.
    ///
    /// # Errors
    ///
    /// `Navigation` when the page does not settle within the load budget.
    pub fn navigate(&mut self) -> IngresoResult<()> {
        page_object::navigate(&self.route, &mut *self.page)
    }

    /// Type both credentials and submit the form. Does not await the
    /// outcome; callers query [`Self::is_logged_in`] or
    /// [`Self::error_message`] afterwards.
    ///
    /// # Errors
    ///
    /// Propagates driver failures (missing elements, input dispatch).
    pub fn login(&mut self, username: &str, password: &str) -> IngresoResult<()> {
        self.page.type_text(&self.selectors.username_input, username)?;
        self.page.type_text(&self.selectors.password_input, password)?;
        self.page.click(&self.selectors.login_button)
    }

    /// Trimmed text of the error banner, or `None` when it does not
    /// appear within the bounded wait.
    pub fn error_message(&mut self) -> Option<String> {
        let budget = Duration::from_millis(OUTCOME_WAIT_MS);
        match self.page.wait_for_selector(&self.selectors.error_message, budget) {
            Ok(handle) => Some(handle.text_content.trim().to_string()),
            Err(IngresoError::Timeout { .. }) => None,
            Err(other) => {
                tracing::debug!(
                    target: "storefront::pages",
                    error = %other,
                    "error banner query degraded to absent"
                );
                None
            }
        }
    }

    /// Whether the post-login marker appears within the bounded wait
    pub fn is_logged_in(&mut self) -> bool {
        let budget = Duration::from_millis(OUTCOME_WAIT_MS);
        self.page
            .wait_for_selector(&self.selectors.inventory_list, budget)
            .is_ok()
    }

    /// Reset both credential fields to empty (direct value assignment,
    /// no key events). Idempotent.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub fn clear_inputs(&mut self) -> IngresoResult<()> {
        self.page.clear_text(&self.selectors.username_input)?;
        self.page.clear_text(&self.selectors.password_input)
    }

    /// Capture the page into the artifact store under `name`.
    ///
    /// # Errors
    ///
    /// `Screenshot` when the capture fails, `Io` when the store cannot
    /// write.
    pub fn save_screenshot(
        &mut self,
        store: &ArtifactStore,
        name: &str,
    ) -> IngresoResult<PathBuf> {
        let shot = self.page.screenshot()?;
        store.save_screenshot(name, &shot)
    }

    /// Current document title
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub fn title(&mut self) -> IngresoResult<String> {
        self.page.title()
    }

    /// The underlying driver page, for scenarios that drive raw selectors
    pub fn driver(&mut self) -> &mut dyn PageDriver {
        &mut *self.page
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::app::Storefront;
    use crate::config::{MSG_LOCKED_OUT, MSG_MISMATCH};
    use ingreso::{BrowserDriver, LaunchOptions, SimBrowser};

    fn open_page() -> (SuiteConfig, Box<dyn PageDriver>) {
        let config = SuiteConfig::demo();
        let storefront =
            Storefront::new(config.clone()).with_glitch_delay(Duration::from_millis(1));
        let mut browser = SimBrowser::launch(LaunchOptions::default(), Box::new(storefront));
        let page = browser.new_page().unwrap();
        (config, page)
    }

    #[test]
    fn test_navigate_lands_on_ready_form() {
        let (config, mut page) = open_page();
        let mut login = LoginPage::new(page.as_mut(), &config);
        login.navigate().unwrap();
        assert_eq!(login.title().unwrap(), "Swag Labs");
    }

    #[test]
    fn test_login_then_outcome_queries() {
        let (config, mut page) = open_page();
        let mut login = LoginPage::new(page.as_mut(), &config);
        login.navigate().unwrap();
        login.login("standard_user", "secret_sauce").unwrap();
        assert!(login.is_logged_in());
        assert_eq!(login.error_message(), None);
    }

    #[test]
    fn test_error_message_is_trimmed_text() {
        let (config, mut page) = open_page();
        let mut login = LoginPage::new(page.as_mut(), &config);
        login.navigate().unwrap();
        login.login("standard_user", "wrong").unwrap();
        assert_eq!(login.error_message().as_deref(), Some(MSG_MISMATCH));
        assert!(!login.is_logged_in());
    }

    #[test]
    fn test_locked_out_banner() {
        let (config, mut page) = open_page();
        let mut login = LoginPage::new(page.as_mut(), &config);
        login.navigate().unwrap();
        login.login("locked_out_user", "secret_sauce").unwrap();
        assert_eq!(login.error_message().as_deref(), Some(MSG_LOCKED_OUT));
    }

    #[test]
    fn test_clear_inputs_idempotent() {
        let (config, mut page) = open_page();
        let mut login = LoginPage::new(page.as_mut(), &config);
        login.navigate().unwrap();
        login.driver().type_text("input#user-name", "left").unwrap();
        login.driver().type_text("input#password", "over").unwrap();

        login.clear_inputs().unwrap();
        login.clear_inputs().unwrap();

        let username = login
            .driver()
            .wait_for_selector("input#user-name", Duration::from_millis(100))
            .unwrap();
        // Cleared fields submit as empty: the required-username path fires.
        assert_eq!(username.tag_name, "input");
        login.login("", "").unwrap();
        assert!(login.error_message().unwrap().contains("required"));
    }

    #[test]
    fn test_save_screenshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (config, mut page) = open_page();
        let mut login = LoginPage::new(page.as_mut(), &config);
        login.navigate().unwrap();

        let path = login.save_screenshot(&store, "login_page_ui").unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    }
}
