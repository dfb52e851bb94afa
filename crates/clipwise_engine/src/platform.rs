//! Adapters for process-wide platform resources: the system clipboard and
//! the native share sheet.
use clipwise_logging::cw_debug;

use crate::{PlatformError, ShareRequest, ShareStatus};

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), PlatformError>;
}

pub trait ShareSheet: Send + Sync {
    fn is_available(&self) -> bool;
    fn share(&self, request: &ShareRequest) -> Result<ShareStatus, PlatformError>;
}

/// System clipboard through `arboard`. A handle is opened per write; on
/// X11 arboard hands the contents to the clipboard manager when it drops.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardClipboard;

impl Clipboard for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| PlatformError::new(err.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|err| PlatformError::new(err.to_string()))
    }
}

/// Share sheet for platforms without one; callers fall back to copying.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableShareSheet;

impl ShareSheet for UnavailableShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, request: &ShareRequest) -> Result<ShareStatus, PlatformError> {
        cw_debug!("share requested without a share sheet: {}", request.title);
        Err(PlatformError::new("native share is not available"))
    }
}
