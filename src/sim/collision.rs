//! Catch-zone collision between falling items and the truck
//!
//! Everything is 1-D: the catch zone is a horizontal band on y, and contact
//! is an overlap of two closed x-intervals. Using a band instead of a line
//! means fast items can't tunnel past the truck between frames.

use super::state::{FallingItem, Truck};
use crate::consts::*;

/// What happens to an item after it has moved this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Touching the truck inside the catch zone
    Contact,
    /// Fell off the bottom of the playfield
    Exited,
    /// Still falling
    Falling,
}

/// Closed-interval overlap test
#[inline]
pub fn spans_overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    a.1 >= b.0 && a.0 <= b.1
}

/// Whether `y` lies strictly inside the catch band
#[inline]
pub fn in_catch_zone(y: f32) -> bool {
    y > CATCH_ZONE_TOP && y < CATCH_ZONE_BOTTOM
}

/// Classify an item against the truck. The catch zone is checked before the
/// exit line.
pub fn classify(item: &FallingItem, truck: &Truck) -> ItemOutcome {
    if in_catch_zone(item.pos.y) && spans_overlap(item.span(), truck.span()) {
        ItemOutcome::Contact
    } else if item.pos.y > EXIT_Y {
        ItemOutcome::Exited
    } else {
        ItemOutcome::Falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ItemKind;
    use glam::Vec2;

    fn item_at(x: f32, y: f32) -> FallingItem {
        FallingItem {
            id: 0,
            pos: Vec2::new(x, y),
            kind: ItemKind::Parcel,
            speed: 0.3,
        }
    }

    #[test]
    fn test_overlap_is_inclusive() {
        assert!(spans_overlap((0.0, 1.0), (1.0, 2.0)));
        assert!(!spans_overlap((0.0, 0.99), (1.0, 2.0)));
        assert!(spans_overlap((1.5, 1.6), (1.0, 2.0)));
    }

    #[test]
    fn test_catch_zone_bounds_are_exclusive() {
        assert!(!in_catch_zone(70.0));
        assert!(in_catch_zone(70.01));
        assert!(in_catch_zone(84.99));
        assert!(!in_catch_zone(85.0));
    }

    #[test]
    fn test_contact_near_truck() {
        let truck = Truck { position: 50.0 };
        assert_eq!(classify(&item_at(52.0, 75.0), &truck), ItemOutcome::Contact);
        // Edges touch: item [58, 64] vs truck [42, 58]
        assert_eq!(classify(&item_at(61.0, 75.0), &truck), ItemOutcome::Contact);
    }

    #[test]
    fn test_no_contact_when_spans_apart() {
        let truck = Truck { position: 50.0 };
        assert_eq!(classify(&item_at(70.0, 75.0), &truck), ItemOutcome::Falling);
    }

    #[test]
    fn test_exit_below_playfield() {
        let truck = Truck { position: 50.0 };
        assert_eq!(classify(&item_at(50.0, 90.5), &truck), ItemOutcome::Exited);
        // Between the catch zone and the exit line it keeps falling
        assert_eq!(classify(&item_at(50.0, 87.0), &truck), ItemOutcome::Falling);
    }
}
