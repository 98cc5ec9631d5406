//! Native dialogs

use log::warn;
use overlay::loader::SUPPORTED_EXTENSIONS;
use overlay::LoadError;
use std::path::PathBuf;

/// Ask the user for an image file; `None` when cancelled
pub fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Load image")
        .add_filter("Images", SUPPORTED_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()
}

/// Blocking error box for a failed load
pub fn show_load_error(err: &LoadError) {
    warn!("{}: {}", err.path().display(), describe(err));

    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(err.to_string())
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn describe(err: &LoadError) -> String {
    match err {
        LoadError::DecodeFailure { source, .. } => format!("{} ({})", err, source),
        _ => err.to_string(),
    }
}
