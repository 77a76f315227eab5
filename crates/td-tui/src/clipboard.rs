//! Clipboard seam for the copy-response action.

use crate::error::CollabError;

/// Destination for the customer-response copy action.
pub trait Clipboard: Send {
    fn set(&mut self, contents: &str) -> Result<(), CollabError>;
}

/// System clipboard using arboard, opened on first use and kept alive so
/// X11/Wayland selections outlive the call.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard, CollabError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| CollabError::Clipboard(e.to_string()))?,
        };
        Ok(self.inner.insert(clipboard))
    }
}

impl Clipboard for SystemClipboard {
    fn set(&mut self, contents: &str) -> Result<(), CollabError> {
        self.ensure()?
            .set_text(contents.to_string())
            .map_err(|e| CollabError::Clipboard(e.to_string()))
    }
}
