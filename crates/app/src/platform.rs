//! Glue between the eframe window and the overlay's native seams

use eframe::egui;
use log::{info, warn};
use overlay::{OverlayResult, WindowStyleController};

/// Native handle of the root viewport, 0 until the window exists
pub fn native_handle(frame: &eframe::Frame) -> isize {
    use raw_window_handle::HasWindowHandle;

    let Ok(handle) = frame.window_handle() else {
        return 0;
    };
    match handle.as_raw() {
        #[cfg(windows)]
        raw_window_handle::RawWindowHandle::Win32(win32) => win32.hwnd.get(),
        _ => 0,
    }
}

/// Fallback controller for platforms without Win32 style bits
pub struct ViewportPassthrough {
    ctx: egui::Context,
}

impl ViewportPassthrough {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl WindowStyleController for ViewportPassthrough {
    fn set_input_transparent(&mut self, transparent: bool) -> OverlayResult<()> {
        self.ctx.send_viewport_cmd_to(
            egui::ViewportId::ROOT,
            egui::ViewportCommand::MousePassthrough(transparent),
        );
        Ok(())
    }
}

/// Controller for the overlay window
pub fn style_controller(ctx: &egui::Context, hwnd: isize) -> Box<dyn WindowStyleController> {
    #[cfg(windows)]
    {
        if hwnd != 0 {
            return Box::new(overlay::win32::Win32StyleController::new(hwnd));
        }
    }

    let _ = hwnd;
    Box::new(ViewportPassthrough::new(ctx.clone()))
}

/// Whether the cursor can be followed while the window ignores the mouse
pub fn tracks_cursor(hwnd: isize) -> bool {
    cfg!(windows) && hwnd != 0
}

/// Cursor position in overlay points, `None` when outside the overlay.
///
/// Read from the OS rather than from egui, which gets no pointer events
/// while the window lets clicks through.
pub fn cursor_pos(ctx: &egui::Context, hwnd: isize) -> Option<egui::Pos2> {
    #[cfg(windows)]
    {
        let (x, y) = match overlay::win32::cursor_in_window(hwnd) {
            Ok(pos) => pos?,
            Err(e) => {
                warn!("cursor position unavailable: {}", e);
                return None;
            }
        };
        let ppp = ctx.pixels_per_point();
        Some(egui::pos2(x as f32 / ppp, y as f32 / ppp))
    }

    #[cfg(not(windows))]
    {
        let _ = (ctx, hwnd);
        None
    }
}

/// Keeps the position guard alive for as long as the overlay runs
pub struct NativeHooks {
    #[cfg(windows)]
    _position: Option<overlay::win32::PositionHook>,
}

/// Size the overlay to the virtual screen, then install the position guard
pub fn attach(ctx: &egui::Context, hwnd: isize, position_guard: bool) -> NativeHooks {
    #[cfg(windows)]
    {
        use overlay::win32::{fit_to_virtual_screen, left_button_down, PositionHook};
        use overlay::SuppressUnlessDragging;

        if let Err(e) = fit_to_virtual_screen(hwnd) {
            warn!("could not size overlay to the virtual screen: {}", e);
        }

        let position = if position_guard {
            match PositionHook::install(hwnd, Box::new(SuppressUnlessDragging::new(left_button_down))) {
                Ok(hook) => Some(hook),
                Err(e) => {
                    warn!("position guard unavailable: {}", e);
                    None
                }
            }
        } else {
            info!("position guard disabled");
            None
        };

        let _ = ctx;
        NativeHooks { _position: position }
    }

    #[cfg(not(windows))]
    {
        let _ = hwnd;
        if position_guard {
            info!("position guard needs Win32; skipped");
        }
        fit_to_monitor(ctx);
        NativeHooks {}
    }
}

#[cfg(not(windows))]
fn fit_to_monitor(ctx: &egui::Context) {
    match ctx.input(|i| i.viewport().monitor_size) {
        Some(size) => {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::Pos2::ZERO));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
            info!("overlay covers monitor {}x{}", size.x, size.y);
        }
        None => warn!("monitor size unknown; overlay keeps its initial size"),
    }
}
