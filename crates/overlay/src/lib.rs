//! Overlay core for ImgOverlay
//!
//! Image collection with per-image transforms, the lock (click-through)
//! toggle and the position-change guard. Native window interop lives in
//! [`win32`] and is only compiled on Windows.

pub mod geometry;
pub mod guard;
pub mod loader;
pub mod lock;
pub mod scene;
pub mod transform;
#[cfg(windows)]
pub mod win32;

pub use geometry::{Point, Rect};
pub use guard::{PendingMove, PositionChangeGuard, SuppressUnlessDragging};
pub use loader::{ImageData, LoadError};
pub use lock::{LockState, WindowStyleController};
pub use scene::{ImageEntry, ImageId, Scene};
pub use transform::Transform;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("No image with id {0}")]
    UnknownImage(ImageId),

    #[error("Window has no native handle yet")]
    NoWindowHandle,

    #[error("Position hook could not be installed")]
    HookUnavailable,
}

pub type OverlayResult<T> = Result<T, OverlayError>;
