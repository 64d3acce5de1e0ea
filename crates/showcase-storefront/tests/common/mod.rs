//! Shared support for the integration suites: tracing setup, the demo
//! fixture, and the session-per-test harness mirroring the run's
//! setup/teardown shape.

#![allow(dead_code)]

use ingreso::{LaunchOptions, TestSession};
use showcase_storefront::app::Storefront;
use showcase_storefront::config::SuiteConfig;
use showcase_storefront::pages::LoginPage;
use std::sync::Once;
use std::time::Duration;

/// Login delay of the performance-glitch account in the hermetic suite
pub const GLITCH_DELAY: Duration = Duration::from_millis(20);

static INIT: Once = Once::new();

/// Initialize tracing once for the whole test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The canonical fixture the suite consumes
pub fn suite_config() -> SuiteConfig {
    SuiteConfig::demo()
}

/// Launch a session hosting the simulated storefront. Launch failure is
/// fatal for the run, so it panics rather than returning.
pub fn start_session(config: &SuiteConfig) -> TestSession {
    init_tracing();
    let storefront = Storefront::new(config.clone()).with_glitch_delay(GLITCH_DELAY);
    let mut session = TestSession::new();
    session
        .start_simulated(LaunchOptions::default(), Box::new(storefront))
        .expect("browser launch failed; aborting run");
    session
}

/// One test case: open a page, navigate the login page object to the
/// form, run the body, then tear the page and browser down.
pub fn run_case(config: &SuiteConfig, case: impl FnOnce(&mut LoginPage<'_>)) {
    let mut session = start_session(config);
    let page = session.open_page().expect("page setup failed");
    let mut login = LoginPage::new(page, config);
    login.navigate().expect("login page did not load");
    case(&mut login);
    session.close_page().expect("page teardown failed");
    session.shutdown().expect("browser teardown failed");
}
