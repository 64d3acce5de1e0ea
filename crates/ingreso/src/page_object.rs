//! Page Object seam.
//!
//! A page object binds a fixed set of locator strings to one driver page
//! and exposes semantic operations over them. The trait carries only the
//! navigate-and-verify-loaded contract: the URL the page lives at, the
//! selector that marks it ready, and the load budget. Everything else
//! (the operations themselves) belongs to the concrete page type.

use crate::driver::PageDriver;
use crate::result::{IngresoError, IngresoResult};
use std::time::Duration;

/// Default page-load budget in milliseconds
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 30_000;

/// Contract for a page object over one driver page.
///
/// # Example
///
/// ```ignore
/// struct LoginPage {
///     selectors: SelectorSet,
/// }
///
/// impl PageObject for LoginPage {
///     fn url(&self) -> &str {
///         "https://www.saucedemo.com/"
///     }
///
///     fn ready_selector(&self) -> &str {
///         "input#user-name"
///     }
/// }
/// ```
pub trait PageObject {
    /// URL this page lives at
    fn url(&self) -> &str;

    /// Selector that marks the page as loaded and interactive
    fn ready_selector(&self) -> &str;

    /// Page-load budget in milliseconds
    fn load_timeout_ms(&self) -> u64 {
        DEFAULT_LOAD_TIMEOUT_MS
    }

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Drive `page` to the object's URL and wait for its ready marker.
///
/// The readiness wait failing is a navigation failure, not a sentinel:
/// a page that never becomes interactive fails the test case.
///
/// # Errors
///
/// `Navigation` when the load does not settle or the ready marker does
/// not appear within the load budget.
pub fn navigate<P: PageObject + ?Sized>(
    object: &P,
    page: &mut dyn PageDriver,
) -> IngresoResult<()> {
    let url = object.url();
    tracing::debug!(
        target: "ingreso::page_object",
        page = object.page_name(),
        url,
        "navigating"
    );
    page.goto(url)?;
    let budget = Duration::from_millis(object.load_timeout_ms());
    page.wait_for_selector(object.ready_selector(), budget)
        .map_err(|e| match e {
            IngresoError::Timeout { ms } => IngresoError::Navigation {
                url: url.to_string(),
                message: format!("page did not become ready within {ms}ms"),
            },
            other => other,
        })?;
    Ok(())
}
