//! # Player Input
//!
//! The window layer fills an [`InputState`] between ticks. Held keys stay
//! set until released; mouse motion and button presses are consumed by
//! the next tick.

/// Input gathered since the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    /// Move along the view direction.
    pub forward: bool,
    /// Move against the view direction.
    pub back: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Horizontal mouse motion in pixels, positive to the right.
    pub mouse_dx: f32,
    /// Vertical mouse motion in pixels, positive downwards.
    pub mouse_dy: f32,
    /// Mouse look is only applied while the cursor is grabbed.
    pub cursor_grabbed: bool,
    /// Left hand punch.
    pub primary: bool,
    /// Right hand punch.
    pub secondary: bool,
    /// Pick up the targeted item.
    pub pickup: bool,
    /// First person view; third person otherwise.
    pub first_person: bool,
}

impl InputState {
    /// Accumulates mouse motion.
    #[inline]
    pub fn move_mouse(&mut self, dx: f32, dy: f32) {
        self.mouse_dx += dx;
        self.mouse_dy += dy;
    }

    /// Switches between first and third person.
    #[inline]
    pub fn toggle_view(&mut self) {
        self.first_person = !self.first_person;
    }

    /// Movement intent as `(forward, rightward)`, each in `-1..=1`.
    #[must_use]
    pub fn movement(&self) -> (f32, f32) {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        (axis(self.forward, self.back), axis(self.right, self.left))
    }

    /// Clears the per-tick parts, keeping held keys and view mode.
    pub fn end_tick(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.primary = false;
        self.secondary = false;
        self.pickup = false;
    }
}
