//! The simulated demo storefront.
//!
//! [`Storefront`] is the application model hosted by the harness's
//! simulated backend: a login page whose submit button evaluates the
//! typed credentials against the fixture roster, and an inventory page
//! behind it. The evaluation mirrors the live demo site: exact-match
//! (case-sensitive) credentials, required-field checks with the username
//! checked first, a locked-out account, and an error account that raises
//! a console diagnostic after login.

use crate::config::{
    SuiteConfig, MSG_LOCKED_OUT, MSG_MISMATCH, MSG_PASSWORD_REQUIRED, MSG_USERNAME_REQUIRED,
};
use ingreso::wait::PageEvent;
use ingreso::{SimAction, SimBehavior, SimDom, SimElement};
use std::time::Duration;

/// Login delay of the performance-glitch account
const DEFAULT_GLITCH_DELAY: Duration = Duration::from_millis(100);

/// Simulated storefront application
#[derive(Debug, Clone)]
pub struct Storefront {
    config: SuiteConfig,
    glitch_delay: Duration,
}

impl Storefront {
    /// Create the storefront around a fixture
    #[must_use]
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            glitch_delay: DEFAULT_GLITCH_DELAY,
        }
    }

    /// Override the performance-glitch login delay
    #[must_use]
    pub const fn with_glitch_delay(mut self, delay: Duration) -> Self {
        self.glitch_delay = delay;
        self
    }

    fn login_dom(&self) -> SimDom {
        let selectors = &self.config.selectors.login_page;
        SimDom::new(&self.config.base_url, "Swag Labs")
            .with_element(&selectors.username_input, SimElement::new("input"))
            .with_element(&selectors.password_input, SimElement::new("input"))
            .with_element(
                &selectors.login_button,
                SimElement::new("input").with_value("Login"),
            )
    }

    fn inventory_dom(&self) -> SimDom {
        let selectors = &self.config.selectors.login_page;
        SimDom::new(self.config.inventory_url(), "Swag Labs").with_element(
            &selectors.inventory_list,
            SimElement::new("div").with_text("Products"),
        )
    }

    fn show_error(&self, dom: &mut SimDom, message: &str) {
        let selector = &self.config.selectors.login_page.error_message;
        dom.insert(selector, SimElement::new("h3").with_text(message));
    }

    /// Evaluate the submitted credentials against the roster
    fn submit(&mut self, dom: &mut SimDom) -> Vec<SimAction> {
        let selectors = self.config.selectors.login_page.clone();
        let value_of = |dom: &SimDom, selector: &str| {
            dom.element(selector)
                .map(|e| e.value.clone())
                .unwrap_or_default()
        };
        let username = value_of(dom, &selectors.username_input);
        let password = value_of(dom, &selectors.password_input);

        if username.is_empty() {
            self.show_error(dom, MSG_USERNAME_REQUIRED);
            return vec![];
        }
        if password.is_empty() {
            self.show_error(dom, MSG_PASSWORD_REQUIRED);
            return vec![];
        }

        let roster = &self.config.users;
        if username == roster.locked_out.username && password == roster.locked_out.password {
            self.show_error(dom, MSG_LOCKED_OUT);
            return vec![];
        }

        match roster.find(&username, &password) {
            Some(account) => {
                if account.username == roster.performance_glitch.username {
                    std::thread::sleep(self.glitch_delay);
                }
                let mut actions = vec![SimAction::Navigate(self.config.inventory_url())];
                if account.username == roster.error.username {
                    actions.push(SimAction::Emit(PageEvent::ConsoleError {
                        text: "Failed to add items: error_user backend fault".to_string(),
                    }));
                }
                actions
            }
            None => {
                self.show_error(dom, MSG_MISMATCH);
                vec![]
            }
        }
    }
}

impl SimBehavior for Storefront {
    fn page_for(&self, url: &str) -> Option<SimDom> {
        if url == self.config.base_url {
            Some(self.login_dom())
        } else if url == self.config.inventory_url() {
            Some(self.inventory_dom())
        } else {
            None
        }
    }

    fn on_click(&mut self, selector: &str, dom: &mut SimDom) -> Vec<SimAction> {
        if selector == self.config.selectors.login_page.login_button {
            self.submit(dom)
        } else {
            vec![]
        }
    }
}
