//! Veto for OS-initiated window moves

/// Pending window position change, as reported by the OS before it is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingMove {
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
    /// Keep the current position and ignore `x`/`y`
    pub no_move: bool,
}

/// `SWP_NOMOVE`
pub const SWP_NOMOVE_FLAG: u32 = 0x0002;

impl PendingMove {
    /// View of a `WINDOWPOS` notification
    pub fn from_window_pos(x: i32, y: i32, cx: i32, cy: i32, flags: u32) -> Self {
        Self {
            x,
            y,
            cx,
            cy,
            no_move: flags & SWP_NOMOVE_FLAG != 0,
        }
    }

    /// `flags` with the move veto folded back in
    pub fn apply_to_flags(&self, flags: u32) -> u32 {
        if self.no_move {
            flags | SWP_NOMOVE_FLAG
        } else {
            flags
        }
    }
}

/// Called for every pending position change of the overlay window
pub trait PositionChangeGuard {
    fn on_position_changing(&self, pending: &mut PendingMove);
}

/// Blocks moves unless the left mouse button is held
pub struct SuppressUnlessDragging {
    left_button_down: Box<dyn Fn() -> bool>,
}

impl SuppressUnlessDragging {
    /// `left_button_down` reports the live state of the left mouse button
    pub fn new(left_button_down: impl Fn() -> bool + 'static) -> Self {
        Self {
            left_button_down: Box::new(left_button_down),
        }
    }
}

impl PositionChangeGuard for SuppressUnlessDragging {
    fn on_position_changing(&self, pending: &mut PendingMove) {
        if !(self.left_button_down)() {
            pending.no_move = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> PendingMove {
        PendingMove {
            x: -200,
            y: 40,
            cx: 800,
            cy: 600,
            no_move: false,
        }
    }

    #[test]
    fn window_pos_flags_round_trip_through_guard() {
        const SWP_NOSIZE: u32 = 0x0001;
        const SWP_NOZORDER: u32 = 0x0004;
        let flags = SWP_NOSIZE | SWP_NOZORDER;

        let mut p = PendingMove::from_window_pos(-50, 10, 300, 200, flags);
        assert!(!p.no_move);
        assert_eq!(p.apply_to_flags(flags), flags);

        SuppressUnlessDragging::new(|| false).on_position_changing(&mut p);
        assert_eq!(p.apply_to_flags(flags), flags | SWP_NOMOVE_FLAG);
    }

    #[test]
    fn existing_no_move_is_preserved() {
        let mut p = PendingMove::from_window_pos(0, 0, 10, 10, SWP_NOMOVE_FLAG);
        assert!(p.no_move);
        SuppressUnlessDragging::new(|| true).on_position_changing(&mut p);
        assert_eq!(p.apply_to_flags(SWP_NOMOVE_FLAG), SWP_NOMOVE_FLAG);
    }

    #[test]
    fn os_move_is_vetoed() {
        let guard = SuppressUnlessDragging::new(|| false);
        let mut p = pending();
        guard.on_position_changing(&mut p);
        assert!(p.no_move);
        assert_eq!((p.x, p.y), (-200, 40));
    }

    #[test]
    fn user_drag_passes_through() {
        let guard = SuppressUnlessDragging::new(|| true);
        let mut p = pending();
        guard.on_position_changing(&mut p);
        assert_eq!(p, pending());
    }
}
