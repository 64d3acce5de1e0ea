//! Browser driver capability contract.
//!
//! The harness treats the automation engine as an opaque capability
//! provider behind these traits. The default backend is the in-process
//! simulated host in [`crate::browser::sim`]; the `browser` feature adds a
//! real Chromium backend over CDP. Page objects and the session manager
//! only ever see `dyn PageDriver` / `dyn BrowserDriver`.

use crate::result::IngresoResult;
use crate::wait::PageEvent;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Handle to a matched DOM element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Element tag name (lowercase), empty when the backend cannot tell
    pub tag_name: String,
    /// Text content at match time
    pub text_content: String,
    /// Whether the element was visible at match time
    pub visible: bool,
}

impl ElementHandle {
    /// Create a handle for a tag
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            text_content: String::new(),
            visible: true,
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Captured page bitmap
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Encoded image bytes (PNG)
    pub data: Vec<u8>,
    /// Capture width in pixels
    pub width: u32,
    /// Capture height in pixels
    pub height: u32,
}

impl Screenshot {
    /// Create a screenshot from encoded bytes
    #[must_use]
    pub const fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Size of the encoded payload in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the capture produced no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One live page of a running browser.
///
/// All operations on a closed page fail with `IngresoError::Page`.
pub trait PageDriver: Send + std::fmt::Debug {
    /// Navigate to a URL
    fn goto(&mut self, url: &str) -> IngresoResult<()>;

    /// Type text into the element matching `selector` (appends, key-event
    /// semantics)
    fn type_text(&mut self, selector: &str, text: &str) -> IngresoResult<()>;

    /// Click the element matching `selector`
    fn click(&mut self, selector: &str) -> IngresoResult<()>;

    /// Reset the value of the element matching `selector` to empty without
    /// dispatching input events
    fn clear_text(&mut self, selector: &str) -> IngresoResult<()>;

    /// Wait up to `timeout` for `selector` to match a visible element.
    /// Expiry yields `IngresoError::Timeout`.
    fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> IngresoResult<ElementHandle>;

    /// Text content of the first match, `None` when nothing matches
    fn text_content(&mut self, selector: &str) -> IngresoResult<Option<String>>;

    /// Current document title
    fn title(&mut self) -> IngresoResult<String>;

    /// URL the page currently points at
    fn current_url(&self) -> &str;

    /// Capture the current page bitmap
    fn screenshot(&mut self) -> IngresoResult<Screenshot>;

    /// Drain diagnostics accumulated since the last drain
    fn take_events(&mut self) -> Vec<PageEvent>;

    /// Close the page; further operations fail
    fn close(&mut self) -> IngresoResult<()>;

    /// Whether the page has been closed
    fn is_closed(&self) -> bool;
}

/// A running browser that can open pages
pub trait BrowserDriver: Send {
    /// Open a fresh page
    fn new_page(&mut self) -> IngresoResult<Box<dyn PageDriver>>;

    /// Shut the browser down
    fn close(&mut self) -> IngresoResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_builder_defaults() {
            let handle = ElementHandle::new("h3");
            assert_eq!(handle.tag_name, "h3");
            assert!(handle.text_content.is_empty());
            assert!(handle.visible);
        }

        #[test]
        fn test_builder_chain() {
            let handle = ElementHandle::new("input")
                .with_text("secret_sauce")
                .with_visible(false);
            assert_eq!(handle.text_content, "secret_sauce");
            assert!(!handle.visible);
        }
    }

    mod screenshot_tests {
        use super::*;

        #[test]
        fn test_len_and_empty() {
            let empty = Screenshot::new(vec![], 0, 0);
            assert!(empty.is_empty());
            let shot = Screenshot::new(vec![0x89, 0x50, 0x4E, 0x47], 1366, 768);
            assert_eq!(shot.len(), 4);
            assert!(!shot.is_empty());
            assert_eq!(shot.width, 1366);
            assert_eq!(shot.height, 768);
        }
    }
}
