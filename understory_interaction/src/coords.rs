// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate tracking for a pointer set.

use kurbo::{Point, Vec2};

use crate::pointer::Pointer;

/// Page and client position at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CoordSnapshot {
    /// Position relative to the document.
    pub page: Point,
    /// Position relative to the viewport.
    pub client: Point,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
}

impl CoordSnapshot {
    /// Bit-identical page and client positions, ignoring the timestamp.
    #[must_use]
    pub fn same_position(&self, other: &Self) -> bool {
        bits_eq(self.page, other.page) && bits_eq(self.client, other.client)
    }
}

fn bits_eq(a: Point, b: Point) -> bool {
    a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits()
}

/// A change in page and client position over `time_stamp` milliseconds.
///
/// Also used for velocities, in which case the vectors are in units per second.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CoordDelta {
    /// Change in document position.
    pub page: Vec2,
    /// Change in viewport position.
    pub client: Vec2,
    /// Elapsed milliseconds.
    pub time_stamp: u64,
}

/// Start, previous and current snapshots plus the derived delta and velocity.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CoordsSet {
    /// Snapshot at the last down transition while idle.
    pub start: CoordSnapshot,
    /// Last snapshot that counted as real movement.
    pub prev: CoordSnapshot,
    /// Latest snapshot.
    pub cur: CoordSnapshot,
    /// `cur - prev`.
    pub delta: CoordDelta,
    /// `delta` per second.
    pub velocity: CoordDelta,
}

impl CoordsSet {
    /// Set `cur` to the centroid of `pointers`.
    ///
    /// An empty set leaves the positions unchanged and only updates the
    /// timestamp.
    pub fn set_current<'a>(
        &mut self,
        pointers: impl IntoIterator<Item = &'a Pointer>,
        time_stamp: u64,
    ) {
        let mut page = Vec2::ZERO;
        let mut client = Vec2::ZERO;
        let mut n = 0_u32;
        for p in pointers {
            page += p.page.to_vec2();
            client += p.client.to_vec2();
            n += 1;
        }
        if n > 0 {
            let n = f64::from(n);
            self.cur.page = (page / n).to_point();
            self.cur.client = (client / n).to_point();
        }
        self.cur.time_stamp = time_stamp;
    }

    /// Recompute `delta` from `prev` and `cur`.
    pub fn update_delta(&mut self) {
        self.delta = CoordDelta {
            page: self.cur.page - self.prev.page,
            client: self.cur.client - self.prev.client,
            time_stamp: self.cur.time_stamp.saturating_sub(self.prev.time_stamp),
        };
    }

    /// Derive `velocity` from the current `delta`.
    ///
    /// The elapsed time is clamped to one millisecond so that two reports in
    /// the same tick do not divide by zero.
    pub fn update_velocity(&mut self) {
        let secs = (self.delta.time_stamp as f64 / 1000.0).max(0.001);
        self.velocity = CoordDelta {
            page: self.delta.page / secs,
            client: self.delta.client / secs,
            time_stamp: self.delta.time_stamp,
        };
    }

    /// Zero the delta, keeping nothing of the last change.
    pub fn zero_delta(&mut self) {
        self.delta = CoordDelta::default();
    }

    /// Make `cur` the new `start` and `prev`.
    pub fn reset_start(&mut self) {
        self.start = self.cur;
        self.prev = self.cur;
    }

    /// Make `cur` the new `prev`.
    pub fn advance_prev(&mut self) {
        self.prev = self.cur;
    }

    /// `true` if `cur` and `prev` are at bit-identical positions.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.cur.same_position(&self.prev)
    }

    /// Client-space distance travelled since `start`.
    #[must_use]
    pub fn client_distance_from_start(&self) -> f64 {
        (self.cur.client - self.start.client).hypot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::Pointer;

    #[test]
    fn current_is_the_centroid() {
        let mut c = CoordsSet::default();
        let a = Pointer::touch(1, Point::new(0.0, 0.0));
        let b = Pointer::touch(2, Point::new(10.0, 20.0)).with_client(Point::new(2.0, 4.0));
        c.set_current([&a, &b], 7);
        assert_eq!(c.cur.page, Point::new(5.0, 10.0));
        assert_eq!(c.cur.client, Point::new(1.0, 2.0));
        assert_eq!(c.cur.time_stamp, 7);
    }

    #[test]
    fn empty_set_keeps_position() {
        let mut c = CoordsSet::default();
        c.cur.page = Point::new(3.0, 3.0);
        c.set_current([], 9);
        assert_eq!(c.cur.page, Point::new(3.0, 3.0));
        assert_eq!(c.cur.time_stamp, 9);
    }

    #[test]
    fn velocity_clamps_zero_elapsed_time() {
        let mut c = CoordsSet::default();
        c.prev.time_stamp = 100;
        c.cur = CoordSnapshot {
            page: Point::new(1.0, 0.0),
            client: Point::new(1.0, 0.0),
            time_stamp: 100,
        };
        c.update_delta();
        c.update_velocity();
        assert_eq!(c.delta.time_stamp, 0);
        assert_eq!(c.velocity.page, Vec2::new(1000.0, 0.0));
    }

    #[test]
    fn velocity_in_units_per_second() {
        let mut c = CoordsSet::default();
        c.cur = CoordSnapshot {
            page: Point::new(10.0, -5.0),
            client: Point::new(10.0, -5.0),
            time_stamp: 500,
        };
        c.update_delta();
        c.update_velocity();
        assert_eq!(c.velocity.page, Vec2::new(20.0, -10.0));
        assert_eq!(c.velocity.client, Vec2::new(20.0, -10.0));
    }

    #[test]
    fn duplicate_is_bitwise() {
        let mut c = CoordsSet::default();
        assert!(c.is_duplicate());
        c.cur.page.x = -0.0;
        assert!(!c.is_duplicate());
        c.cur.page.x = 0.0;
        c.cur.client.y = f64::EPSILON;
        assert!(!c.is_duplicate());
    }

    #[test]
    fn reset_start_copies_current() {
        let mut c = CoordsSet::default();
        c.cur.client = Point::new(3.0, 4.0);
        c.reset_start();
        assert_eq!(c.start, c.cur);
        assert_eq!(c.prev, c.cur);
        c.cur.client = Point::new(6.0, 8.0);
        assert_eq!(c.client_distance_from_start(), 5.0);
    }
}
