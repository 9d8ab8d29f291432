// scroll.rs - Drag, touch and wheel input folded into one damped scroll
//
// Input only ever moves `target`. Each frame `current` eases toward it,
// which is where the inertia comes from. Releasing a drag, or letting the
// wheel go quiet, snaps `target` onto an item boundary.

use crate::lerp;

/// Pixels of drag per unit of scroll speed
const DRAG_SCALE: f32 = 0.025;
/// Scroll units per wheel notch per unit of scroll speed
const WHEEL_STEP: f32 = 0.2;
/// Quiet time after the last wheel event before snapping
pub const WHEEL_IDLE_MS: f64 = 200.0;
/// Easing used on mobile-width containers
pub const MOBILE_EASE: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
    pub last: f32,
    pub ease: f32,
}

impl ScrollState {
    /// Movement since the previous frame
    pub fn speed(&self) -> f32 {
        self.current - self.last
    }
}

/// Fires once, `wait_ms` after the most recent `arm`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Debounce {
    wait_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(wait_ms: f64) -> Self {
        Self { wait_ms, deadline: None }
    }

    pub fn arm(&mut self, now: f64) {
        self.deadline = Some(now + self.wait_ms);
    }

    pub fn fire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(t) if now >= t => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    start_x: f32,
    baseline: f32,
}

#[derive(Clone, Debug)]
pub struct ScrollController {
    state: ScrollState,
    speed: f32,
    drag: Option<Drag>,
    wheel_idle: Debounce,
}

impl ScrollController {
    pub fn new(speed: f32, ease: f32) -> Self {
        Self {
            state: ScrollState { ease, ..Default::default() },
            speed,
            drag: None,
            wheel_idle: Debounce::new(WHEEL_IDLE_MS),
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.drag = Some(Drag { start_x: x, baseline: self.state.current });
    }

    /// Returns false when no drag is in progress.
    pub fn pointer_move(&mut self, x: f32) -> bool {
        let Some(drag) = self.drag else { return false };
        let distance = (drag.start_x - x) * (self.speed * DRAG_SCALE);
        self.state.target = drag.baseline + distance;
        true
    }

    pub fn pointer_up(&mut self, item_width: f32) {
        self.drag = None;
        self.snap(item_width);
    }

    /// Zero deltas carry no direction and are ignored.
    pub fn wheel(&mut self, delta: f32, now: f64) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let step = if delta > 0.0 { self.speed } else { -self.speed };
        self.state.target += step * WHEEL_STEP;
        self.wheel_idle.arm(now);
        true
    }

    /// Snap if the wheel has been idle long enough. Returns whether it did.
    pub fn poll_idle(&mut self, now: f64, item_width: f32) -> bool {
        if self.wheel_idle.fire(now) {
            self.snap(item_width);
            return true;
        }
        false
    }

    /// Round `target` to the nearest whole item, keeping its sign.
    pub fn snap(&mut self, item_width: f32) {
        if !(item_width > 0.0) {
            return;
        }
        let index = (self.state.target.abs() / item_width).round();
        let item = item_width * index;
        self.state.target = if self.state.target < 0.0 { -item } else { item };
    }

    /// Ease `current` toward `target`; the direction compares against the
    /// previous frame's position.
    pub fn advance(&mut self) -> Direction {
        self.state.current = lerp(self.state.current, self.state.target, self.state.ease);
        if self.state.current > self.state.last { Direction::Right } else { Direction::Left }
    }

    /// Close the frame: the next `advance` measures movement from here.
    pub fn commit(&mut self) {
        self.state.last = self.state.current;
    }

    pub fn set_ease(&mut self, ease: f32) {
        self.state.ease = ease;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_moves_target_from_baseline() {
        let mut s = ScrollController::new(2.0, 0.05);
        assert!(!s.pointer_move(10.0));
        s.pointer_down(500.0);
        assert!(s.pointer_move(400.0));
        assert!((s.state().target - 100.0 * 2.0 * 0.025).abs() < 1e-6);
        assert!(s.pointer_move(600.0));
        assert!((s.state().target + 5.0).abs() < 1e-6);
    }

    #[test]
    fn release_snaps_to_item() {
        let mut s = ScrollController::new(2.0, 0.05);
        s.pointer_down(0.0);
        s.pointer_move(-70.0); // target 3.5
        s.pointer_up(2.0);
        assert!(!s.is_dragging());
        assert_eq!(s.state().target, 4.0);
    }

    #[test]
    fn snap_keeps_sign_and_is_idempotent() {
        let mut s = ScrollController::new(1.0, 0.05);
        s.state.target = -7.3;
        s.snap(2.5);
        assert_eq!(s.state().target, -7.5);
        let once = s.state().target;
        s.snap(2.5);
        assert_eq!(s.state().target, once);

        for t in [-13.7f32, -0.4, 0.0, 0.9, 3.14, 1234.5] {
            s.state.target = t;
            s.snap(3.3);
            let first = s.state().target;
            s.snap(3.3);
            assert_eq!(s.state().target, first, "target {t}");
        }
    }

    #[test]
    fn snap_ignores_degenerate_width() {
        let mut s = ScrollController::new(1.0, 0.05);
        s.state.target = 1.7;
        s.snap(0.0);
        s.snap(f32::NAN);
        assert_eq!(s.state().target, 1.7);
    }

    #[test]
    fn wheel_steps_then_snaps_after_idle() {
        let mut s = ScrollController::new(2.0, 0.05);
        assert!(s.wheel(120.0, 0.0));
        assert!(s.wheel(3.0, 50.0));
        assert!((s.state().target - 0.8).abs() < 1e-6);
        assert!(!s.poll_idle(200.0, 1.0));
        assert!(s.poll_idle(250.0, 1.0));
        assert_eq!(s.state().target, 1.0);
        assert!(!s.poll_idle(1000.0, 1.0));

        assert!(!s.wheel(0.0, 1000.0));
        assert!(s.wheel(-1.0, 1000.0));
        assert!((s.state().target - 0.6).abs() < 1e-6);
    }

    #[test]
    fn current_eases_toward_target() {
        let mut s = ScrollController::new(1.0, 0.5);
        s.state.target = 8.0;
        assert_eq!(s.advance(), Direction::Right);
        assert_eq!(s.state().current, 4.0);
        assert_eq!(s.state().speed(), 4.0);
        s.commit();
        s.advance();
        assert_eq!(s.state().current, 6.0);
        s.commit();

        s.state.target = 0.0;
        assert_eq!(s.advance(), Direction::Left);
        assert!(s.state().speed() < 0.0);
    }

    #[test]
    fn standing_still_reads_as_left() {
        let mut s = ScrollController::new(1.0, 0.1);
        assert_eq!(s.advance(), Direction::Left);
    }
}
