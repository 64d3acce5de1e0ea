//! Ingreso: page-object end-to-end testing harness for web login flows
//!
//! Ingreso (Spanish: "login/entry") wraps a browser-automation backend
//! behind a small synchronous driver contract and layers the pieces an
//! end-to-end login suite needs on top of it: a bounded-wait primitive,
//! a page-object seam, a run-scoped session state machine, artifact
//! provisioning, and a run reporter.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    INGRESO Architecture                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────┐   ┌───────────────────────┐ │
//! │  │ Test Case │──►│ Page Object │──►│ PageDriver            │ │
//! │  │ (Rust)    │   │ (LoginPage) │   │  sim  |  cdp (feature)│ │
//! │  └───────────┘   └─────────────┘   └───────────────────────┘ │
//! │        │                                    ▲                 │
//! │        ▼                                    │                 │
//! │  ┌─────────────┐  owns browser + page  ┌────┴────────┐       │
//! │  │ TestSession │───────────────────────│BrowserDriver│       │
//! │  └─────────────┘                       └─────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The default backend is an in-process simulated page host, which keeps
//! `cargo test` hermetic; the `browser` feature adds a real Chromium
//! backend over CDP.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Artifact directory provisioning and screenshot layout
pub mod artifacts;
/// Launch options plus the simulated and Chromium backends
pub mod browser;
/// Driver capability contract: `BrowserDriver` / `PageDriver`
pub mod driver;
/// Page-object seam: `PageObject` trait and the navigate helper
pub mod page_object;
/// Run reporter: results, HTML summary, JSON persistence
pub mod reporter;
/// Error taxonomy
pub mod result;
/// Test session lifecycle state machine
pub mod session;
/// Bounded-wait primitive and page diagnostics
pub mod wait;

pub use artifacts::ArtifactStore;
pub use browser::sim::{SimAction, SimBehavior, SimBrowser, SimDom, SimElement, SimPage};
pub use browser::LaunchOptions;
#[cfg(feature = "browser")]
pub use browser::cdp::{ChromiumBrowser, ChromiumPage};
pub use driver::{BrowserDriver, ElementHandle, PageDriver, Screenshot};
pub use page_object::{navigate, PageObject};
pub use reporter::{FailureMode, Reporter, TestResultEntry, TestStatus};
pub use result::{IngresoError, IngresoResult};
pub use session::{SessionState, TestSession};
pub use wait::{poll_flag, poll_until, PageEvent, WaitOptions};

/// Commonly used types, one `use` away
pub mod prelude {
    pub use crate::artifacts::ArtifactStore;
    pub use crate::browser::sim::{SimAction, SimBehavior, SimBrowser, SimDom, SimElement};
    pub use crate::browser::LaunchOptions;
    pub use crate::driver::{BrowserDriver, ElementHandle, PageDriver, Screenshot};
    pub use crate::page_object::{navigate, PageObject};
    pub use crate::reporter::{Reporter, TestResultEntry, TestStatus};
    pub use crate::result::{IngresoError, IngresoResult};
    pub use crate::session::{SessionState, TestSession};
    pub use crate::wait::{poll_until, PageEvent, WaitOptions};
}
