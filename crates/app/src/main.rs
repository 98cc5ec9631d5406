//! ImgOverlay - reference images pinned above every other window

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;
mod dialogs;
mod panel;
mod platform;
mod state;
mod ui;

use crate::ui::ImgOverlayApp;
use eframe::egui;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Virtual screen metrics are only reported in physical pixels when DPI aware
    #[cfg(windows)]
    unsafe {
        use windows::Win32::UI::HiDpi::{
            SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        };
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let args = cli::parse_args();
    info!(
        "starting ImgOverlay (locked: {}, {} startup image(s))",
        args.locked,
        args.images.len()
    );

    // Sized to the virtual screen once the native window exists
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ImgOverlay")
            .with_position([0.0, 0.0])
            .with_inner_size([800.0, 600.0])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "ImgOverlay",
        native_options,
        Box::new(|cc| Ok(Box::new(ImgOverlayApp::new(cc, args)))),
    )
    .map_err(|e| anyhow::anyhow!("overlay window failed: {}", e))?;

    Ok(())
}
