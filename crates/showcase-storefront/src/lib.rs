//! Showcase Storefront - login-flow e2e suite on the Ingreso harness
//!
//! The crate carries three pieces: the canonical suite fixture
//! ([`config::SuiteConfig`]), the simulated storefront application the
//! hermetic suite runs against ([`app::Storefront`]), and the
//! [`pages::LoginPage`] page object. The login scenarios themselves live
//! in `tests/`.
//!
//! # Example
//!
//! ```rust
//! use ingreso::{LaunchOptions, TestSession};
//! use showcase_storefront::app::Storefront;
//! use showcase_storefront::config::SuiteConfig;
//! use showcase_storefront::pages::LoginPage;
//!
//! let config = SuiteConfig::demo();
//! let mut session = TestSession::new();
//! session
//!     .start_simulated(
//!         LaunchOptions::default(),
//!         Box::new(Storefront::new(config.clone())),
//!     )
//!     .unwrap();
//!
//! let page = session.open_page().unwrap();
//! let mut login = LoginPage::new(page, &config);
//! login.navigate().unwrap();
//! login.login("standard_user", "secret_sauce").unwrap();
//! assert!(login.is_logged_in());
//!
//! session.shutdown().unwrap();
//! ```

// Allow common test patterns in this showcase crate
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![deny(missing_docs)]

pub mod app;
pub mod config;
pub mod pages;

/// Commonly used types, one `use` away
pub mod prelude {
    pub use crate::app::Storefront;
    pub use crate::config::{
        SuiteConfig, MSG_LOCKED_OUT, MSG_MISMATCH, MSG_PASSWORD_REQUIRED, MSG_USERNAME_REQUIRED,
    };
    pub use crate::pages::LoginPage;
}
