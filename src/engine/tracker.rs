use std::time::{Duration, Instant};

/// One settle per stop: the slot that will sit under the viewport center
/// once the view snaps, and the offset the view must animate to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settle {
    pub index: usize,
    pub snap_offset: f64,
}

/// Watches continuous scroll motion and debounces it into discrete settle
/// events. Motion restarts the idle deadline; the deadline expiring with no
/// further motion fires exactly one settle. The deadline is polled from the
/// shell's tick rather than run on a timer thread, so the whole engine stays
/// single-threaded and the idle timer is trivially cancellable.
pub struct ScrollTracker {
    offset: f64,
    viewport: f64,
    slot_height: f64,
    idle_timeout: Duration,
    idle_deadline: Option<Instant>,
}

impl ScrollTracker {
    pub fn new(slot_height: f64, viewport: f64, idle_timeout: Duration) -> Self {
        Self {
            offset: 0.0,
            viewport,
            slot_height,
            idle_timeout,
            idle_deadline: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: f64) {
        self.viewport = viewport;
    }

    pub fn set_idle_timeout(&mut self, idle_timeout: Duration) {
        self.idle_timeout = idle_timeout;
    }

    /// Midpoint of the viewport in wheel coordinates.
    pub fn center_line(&self) -> f64 {
        self.offset + self.viewport / 2.0
    }

    /// Record a motion update: the new offset plus an idle-deadline restart.
    pub fn record_motion(&mut self, offset: f64, now: Instant) {
        self.offset = offset.max(0.0);
        self.idle_deadline = Some(now + self.idle_timeout);
    }

    /// Move the offset without arming the debounce. Used for the grid snap
    /// itself and for rebuild repositioning, neither of which is spectator
    /// motion.
    pub fn reset_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
        self.idle_deadline = None;
    }

    /// Topmost visible slot once the view snaps to the grid.
    pub fn nearest_top_index(&self) -> usize {
        (self.offset / self.slot_height).round().max(0.0) as usize
    }

    /// How many slots sit between the viewport top and its center line.
    pub fn center_slots(&self) -> usize {
        (self.viewport / self.slot_height / 2.0).floor() as usize
    }

    /// Fire the pending settle if the idle deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Settle> {
        let deadline = self.idle_deadline?;
        if now < deadline {
            return None;
        }
        self.idle_deadline = None;
        let top = self.nearest_top_index();
        Some(Settle {
            index: top + self.center_slots(),
            snap_offset: top as f64 * self.slot_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ScrollTracker {
        // 5-slot viewport, unit slots, 100ms idle window
        ScrollTracker::new(1.0, 5.0, Duration::from_millis(100))
    }

    #[test]
    fn no_motion_no_settle() {
        let mut t = tracker();
        assert_eq!(t.poll(Instant::now()), None);
    }

    #[test]
    fn motion_then_idle_fires_exactly_once() {
        let mut t = tracker();
        let t0 = Instant::now();
        t.record_motion(7.3, t0);

        assert_eq!(t.poll(t0 + Duration::from_millis(50)), None);
        let settle = t.poll(t0 + Duration::from_millis(120)).unwrap();
        // round(7.3) = 7 top slot, center two slots below
        assert_eq!(settle.index, 9);
        assert_eq!(settle.snap_offset, 7.0);
        // Fired once; nothing further until new motion
        assert_eq!(t.poll(t0 + Duration::from_millis(500)), None);
    }

    #[test]
    fn fresh_motion_restarts_the_idle_window() {
        let mut t = tracker();
        let t0 = Instant::now();
        t.record_motion(3.0, t0);
        t.record_motion(4.0, t0 + Duration::from_millis(80));

        // First window would have expired here, but motion superseded it
        assert_eq!(t.poll(t0 + Duration::from_millis(110)), None);
        let settle = t.poll(t0 + Duration::from_millis(190)).unwrap();
        assert_eq!(settle.snap_offset, 4.0);
    }

    #[test]
    fn reset_offset_does_not_arm_the_debounce() {
        let mut t = tracker();
        let t0 = Instant::now();
        t.reset_offset(12.0);
        assert_eq!(t.offset(), 12.0);
        assert_eq!(t.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn offsets_clamp_at_zero() {
        let mut t = tracker();
        t.record_motion(-3.0, Instant::now());
        assert_eq!(t.offset(), 0.0);
        assert_eq!(t.nearest_top_index(), 0);
    }

    #[test]
    fn center_line_tracks_viewport() {
        let mut t = tracker();
        t.reset_offset(10.0);
        assert_eq!(t.center_line(), 12.5);
        t.set_viewport(9.0);
        assert_eq!(t.center_line(), 14.5);
        assert_eq!(t.center_slots(), 4);
    }
}
