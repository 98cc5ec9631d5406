//! Lock (click-through) toggle

use crate::OverlayResult;
use log::{debug, info, warn};

/// `WS_EX_TRANSPARENT`
pub const EX_STYLE_TRANSPARENT: isize = 0x0000_0020;
/// `WS_EX_LAYERED`
pub const EX_STYLE_LAYERED: isize = 0x0008_0000;

/// Extended style after toggling input transparency.
///
/// `added_layered` records whether the layered bit was added by an earlier
/// lock; the returned flag is the updated record. Unlocking removes exactly
/// what locking added.
pub fn next_ex_style(current: isize, transparent: bool, added_layered: bool) -> (isize, bool) {
    if transparent {
        // Top-level windows are only skipped by hit-testing when layered.
        let added = added_layered || current & EX_STYLE_LAYERED == 0;
        (current | EX_STYLE_TRANSPARENT | EX_STYLE_LAYERED, added)
    } else {
        let mut style = current & !EX_STYLE_TRANSPARENT;
        if added_layered {
            style &= !EX_STYLE_LAYERED;
        }
        (style, false)
    }
}

/// Native window capability: make a window ignore mouse input
pub trait WindowStyleController {
    fn set_input_transparent(&mut self, transparent: bool) -> OverlayResult<()>;
}

/// Lock state mirrored onto the overlay window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockState {
    locked: bool,
    hit_test_visible: bool,
    /// Native window currently ignores the mouse
    passthrough: bool,
}

impl Default for LockState {
    fn default() -> Self {
        Self {
            locked: false,
            hit_test_visible: true,
            passthrough: false,
        }
    }
}

impl LockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether overlay content should react to the pointer
    pub fn hit_test_visible(&self) -> bool {
        self.hit_test_visible
    }

    /// Apply `locked` to both the content and the native window.
    ///
    /// Content hit-testing follows `locked` even when the native call
    /// fails; the error is returned to the caller.
    pub fn set_locked(
        &mut self,
        locked: bool,
        controller: &mut dyn WindowStyleController,
    ) -> OverlayResult<()> {
        self.locked = locked;
        self.hit_test_visible = !locked;

        let result = controller.set_input_transparent(locked);
        match &result {
            Ok(()) => {
                self.passthrough = locked;
                info!("overlay {}", if locked { "locked" } else { "unlocked" })
            }
            Err(e) => warn!("failed to update input transparency: {}", e),
        }
        result
    }

    /// Whether the native window currently lets mouse input through
    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    /// While unlocked, let clicks through everywhere except over content.
    ///
    /// `over_content` is true when the cursor is above an image or a
    /// rotate thumb. The native style is only touched when it changes.
    /// Does nothing while locked.
    pub fn update_hover(
        &mut self,
        over_content: bool,
        controller: &mut dyn WindowStyleController,
    ) -> OverlayResult<()> {
        if self.locked || self.passthrough != over_content {
            return Ok(());
        }

        let passthrough = !over_content;
        controller.set_input_transparent(passthrough)?;
        self.passthrough = passthrough;
        debug!(
            "hover passthrough {}",
            if passthrough { "on" } else { "off" }
        );
        Ok(())
    }
}
