//! Pointer gesture state for the overlay

use overlay::ImageId;

/// What the primary button is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    /// Nothing pressed, or pressed over empty space
    #[default]
    Idle,
    /// Dragging an image body
    Moving(ImageId),
    /// Dragging a rotate thumb
    Rotating(ImageId),
}

impl Gesture {
    pub fn image(&self) -> Option<ImageId> {
        match self {
            Gesture::Idle => None,
            Gesture::Moving(id) | Gesture::Rotating(id) => Some(*id),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }
}

/// Pick the gesture started by a press: thumbs win over image bodies
pub fn gesture_for_press(handle: Option<ImageId>, body: Option<ImageId>) -> Gesture {
    match (handle, body) {
        (Some(id), _) => Gesture::Rotating(id),
        (None, Some(id)) => Gesture::Moving(id),
        (None, None) => Gesture::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_takes_priority_over_body() {
        let g = gesture_for_press(Some(ImageId(0)), Some(ImageId(1)));
        assert_eq!(g, Gesture::Rotating(ImageId(0)));
        assert_eq!(g.image(), Some(ImageId(0)));
    }

    #[test]
    fn empty_space_stays_idle() {
        let g = gesture_for_press(None, None);
        assert!(!g.is_active());
        assert_eq!(g.image(), None);
    }
}
