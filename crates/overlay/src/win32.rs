//! Win32 implementations of the overlay's platform seams

use crate::geometry::Rect;
use crate::guard::{PendingMove, PositionChangeGuard, SWP_NOMOVE_FLAG};
use crate::lock::{next_ex_style, WindowStyleController, EX_STYLE_LAYERED, EX_STYLE_TRANSPARENT};
use crate::{OverlayError, OverlayResult};
use log::{debug, info};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, GetWindowLongPtrW, GetWindowRect, IsWindow, SetWindowLongPtrW,
    SetWindowPos, GWL_EXSTYLE, SET_WINDOW_POS_FLAGS, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN,
    SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER, WINDOWPOS,
    WM_WINDOWPOSCHANGING, WS_EX_LAYERED, WS_EX_TRANSPARENT,
};

const POSITION_HOOK_ID: usize = 0x494d_474f;

const _: () = assert!(WS_EX_TRANSPARENT.0 as isize == EX_STYLE_TRANSPARENT);
const _: () = assert!(WS_EX_LAYERED.0 as isize == EX_STYLE_LAYERED);
const _: () = assert!(SWP_NOMOVE.0 == SWP_NOMOVE_FLAG);

pub fn hwnd_from_raw(raw: isize) -> HWND {
    HWND(raw as *mut std::ffi::c_void)
}

fn checked_hwnd(raw: isize) -> OverlayResult<HWND> {
    let hwnd = hwnd_from_raw(raw);
    if hwnd.is_invalid() || unsafe { !IsWindow(hwnd).as_bool() } {
        return Err(OverlayError::NoWindowHandle);
    }
    Ok(hwnd)
}

/// Bounding box of all monitors
pub fn virtual_screen_rect() -> Rect {
    unsafe {
        Rect::new(
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN).max(0) as u32,
            GetSystemMetrics(SM_CYVIRTUALSCREEN).max(0) as u32,
        )
    }
}

/// Resize the window to cover the whole virtual screen
pub fn fit_to_virtual_screen(hwnd_raw: isize) -> OverlayResult<Rect> {
    let hwnd = checked_hwnd(hwnd_raw)?;
    let rect = virtual_screen_rect();

    unsafe {
        SetWindowPos(
            hwnd,
            None,
            rect.x,
            rect.y,
            rect.width as i32,
            rect.height as i32,
            SWP_NOZORDER | SWP_NOACTIVATE,
        )?;
    }

    info!(
        "overlay covers virtual screen {}x{} at ({}, {})",
        rect.width, rect.height, rect.x, rect.y
    );
    Ok(rect)
}

/// Cursor position relative to the window's top-left corner, in physical
/// pixels. `None` when the cursor is outside the window.
pub fn cursor_in_window(hwnd_raw: isize) -> OverlayResult<Option<(i32, i32)>> {
    let hwnd = checked_hwnd(hwnd_raw)?;
    let mut cursor = POINT::default();
    let mut bounds = RECT::default();
    unsafe {
        GetCursorPos(&mut cursor)?;
        GetWindowRect(hwnd, &mut bounds)?;
    }

    let inside = cursor.x >= bounds.left
        && cursor.x < bounds.right
        && cursor.y >= bounds.top
        && cursor.y < bounds.bottom;
    Ok(inside.then(|| (cursor.x - bounds.left, cursor.y - bounds.top)))
}

/// Live state of the left mouse button
pub fn left_button_down() -> bool {
    let state = unsafe { GetAsyncKeyState(VK_LBUTTON.0 as i32) };
    (state as u16 & 0x8000) != 0
}

/// Toggles `WS_EX_TRANSPARENT` on a native window
pub struct Win32StyleController {
    hwnd: isize,
    added_layered: bool,
}

impl Win32StyleController {
    pub fn new(hwnd: isize) -> Self {
        Self {
            hwnd,
            added_layered: false,
        }
    }
}

impl WindowStyleController for Win32StyleController {
    fn set_input_transparent(&mut self, transparent: bool) -> OverlayResult<()> {
        let hwnd = checked_hwnd(self.hwnd)?;

        unsafe {
            let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
            let (new_style, added_layered) =
                next_ex_style(ex_style, transparent, self.added_layered);
            self.added_layered = added_layered;

            if new_style != ex_style {
                SetWindowLongPtrW(hwnd, GWL_EXSTYLE, new_style);
            }
            debug!("ex style {:#x} -> {:#x}", ex_style, new_style);
        }
        Ok(())
    }
}

/// Window subclass routing `WM_WINDOWPOSCHANGING` through a guard.
/// Removed when dropped.
pub struct PositionHook {
    hwnd: isize,
    guard: *mut Box<dyn PositionChangeGuard>,
}

impl PositionHook {
    pub fn install(hwnd_raw: isize, guard: Box<dyn PositionChangeGuard>) -> OverlayResult<Self> {
        let hwnd = checked_hwnd(hwnd_raw)?;
        let guard = Box::into_raw(Box::new(guard));

        let installed = unsafe {
            SetWindowSubclass(
                hwnd,
                Some(position_subclass_proc),
                POSITION_HOOK_ID,
                guard as usize,
            )
        };

        if !installed.as_bool() {
            // SAFETY: the subclass was not registered, so nothing else holds the pointer.
            drop(unsafe { Box::from_raw(guard) });
            return Err(OverlayError::HookUnavailable);
        }

        info!("position guard installed");
        Ok(Self {
            hwnd: hwnd_raw,
            guard,
        })
    }
}

impl Drop for PositionHook {
    fn drop(&mut self) {
        unsafe {
            let hwnd = hwnd_from_raw(self.hwnd);
            let removed = IsWindow(hwnd).as_bool()
                && RemoveWindowSubclass(hwnd, Some(position_subclass_proc), POSITION_HOOK_ID)
                    .as_bool();
            if !removed {
                debug!("position subclass already gone");
            }
            drop(Box::from_raw(self.guard));
        }
    }
}

unsafe extern "system" fn position_subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    ref_data: usize,
) -> LRESULT {
    if msg == WM_WINDOWPOSCHANGING && lparam.0 != 0 && ref_data != 0 {
        let guard = &*(ref_data as *const Box<dyn PositionChangeGuard>);
        let pos = &mut *(lparam.0 as *mut WINDOWPOS);

        let mut pending = PendingMove::from_window_pos(pos.x, pos.y, pos.cx, pos.cy, pos.flags.0);
        guard.on_position_changing(&mut pending);
        pos.flags = SET_WINDOW_POS_FLAGS(pending.apply_to_flags(pos.flags.0));
    }

    DefSubclassProc(hwnd, msg, wparam, lparam)
}
