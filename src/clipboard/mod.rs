use anyhow::{Context, Result, bail};
use arboard::Clipboard;

use crate::models::Visit;

/// Longest URL we are willing to put on the clipboard
const MAX_URL_LEN: usize = 2 * 1024 * 1024;

/// Clipboard sink (mocked in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via arboard
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        bail!("Visit has no URL to copy");
    }
    if url.len() > MAX_URL_LEN {
        bail!("URL too large for clipboard ({} bytes, max {})", url.len(), MAX_URL_LEN);
    }
    if url.chars().any(char::is_control) {
        bail!("URL contains control characters");
    }
    Ok(())
}

/// Copy a visit's full URL (not the display form)
pub fn copy_visit_url(visit: &Visit, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_url(&visit.raw_url)?;
    provider.set_text(&visit.raw_url)
}

/// Copy a visit's URL to the system clipboard. Validation happens before the clipboard is
/// touched, so headless environments still get a precise error for bad input.
pub fn copy_visit_url_to_system(visit: &Visit) -> Result<()> {
    validate_url(&visit.raw_url)?;
    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(&visit.raw_url)
}
