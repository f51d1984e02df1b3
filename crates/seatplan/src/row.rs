//! Row filler: seats along one arc at a fixed minimum separation.
//!
//! Procedure
//! - Capacity is `floor(arc_length / distancing) + 1`.
//! - Without categories the row fills to capacity with plain seats; a category
//!   list longer than the capacity degrades to plain seats (warned).
//! - Several slots start at `arc.start`; a single slot sits at the arc midpoint.
//! - The chord to the second of `n` evenly spread positions is the step. Each
//!   further seat is the clockwise intersection of the band circle with a
//!   circle of that radius around the previous seat, so consecutive seats are
//!   exactly one step apart.
//! - A failed intersection truncates the row instead of aborting the layout.

use tracing::{debug, warn};

use crate::category::Category;
use crate::geom::cfg::EPS;
use crate::geom::{distance, ArcAngles, Circle, Rotation};
use crate::layout::{Seat, SeatTally};

/// Rounding allowance in ulps of `arc_length / distancing`.
const SLOT_ULPS: f64 = 8.0;

/// Number of slots an arc of `arc_length` holds at `distancing` separation.
///
/// Ratios a few ulps short of an integer count as that integer; anything
/// further below rounds down. `distancing` must be positive (see
/// `LayoutParams::validate`).
pub fn max_slots(arc_length: f64, distancing: f64) -> usize {
    debug_assert!(distancing > 0.0, "distancing must be positive");
    let ratio = arc_length / distancing;
    (ratio + ratio.abs() * SLOT_ULPS * f64::EPSILON).floor() as usize + 1
}

/// Category per slot for an arc of `arc_length`.
pub fn slots_for(categories: Option<&[Category]>, arc_length: f64, distancing: f64) -> Vec<Category> {
    let capacity = max_slots(arc_length, distancing);
    match categories {
        None => vec![Category::Seat; capacity],
        Some(list) if list.len() > capacity => {
            warn!(
                requested = list.len(),
                capacity, "row has too many seats for its length, using plain seats"
            );
            vec![Category::Seat; capacity]
        }
        Some(list) => list.to_vec(),
    }
}

/// Place one row on `circle` over `arc`, pushing seats into `tally`.
///
/// Returns the number of seats placed.
pub fn fill_row(
    circle: &Circle,
    arc: &ArcAngles,
    distancing: f64,
    categories: Option<&[Category]>,
    band: usize,
    tally: &mut SeatTally,
) -> usize {
    let slots = slots_for(categories, circle.arc_length(arc), distancing);
    let n = slots.len();
    if n == 0 {
        return 0;
    }

    let mut current = if n > 1 {
        circle.point_at(arc.start)
    } else {
        circle.point_at(arc.mid())
    };
    let step = if n > 1 {
        let second = circle.point_at(arc.start + arc.span() / (n - 1) as f64);
        distance(current, second)
    } else {
        0.0
    };
    debug!(band, radius = circle.radius, slots = n, step, "fill_row");

    let mut placed = 0;
    for (k, &category) in slots.iter().enumerate() {
        tally.push(Seat {
            position: current,
            angle: circle.angle_of(current),
            band,
            category,
        });
        placed += 1;
        if k + 1 == n || step <= EPS {
            break;
        }
        match circle.intersection(&Circle::new(current, step), Rotation::Clockwise) {
            Some(next) => current = next,
            None => {
                warn!(band, placed, wanted = n, "row truncated: no next seat position");
                break;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;
    use proptest::prelude::*;

    fn fill(circle: &Circle, arc: ArcAngles, d: f64, cats: Option<&[Category]>) -> Vec<Seat> {
        let mut tally = SeatTally::new();
        let placed = fill_row(circle, &arc, d, cats, 0, &mut tally);
        assert_eq!(placed, tally.count());
        tally.into_seats()
    }

    #[test]
    fn slot_count_boundaries() {
        assert_eq!(max_slots(300.0, 100.0), 4);
        assert_eq!(max_slots(299.9, 100.0), 3);
        // half a billionth short of 3 is still short
        assert_eq!(max_slots(300.0 - 5e-8, 100.0), 3);
        assert_eq!(max_slots(0.0, 150.0), 1);
        // π·r arcs that divide exactly up to rounding
        let c = Circle::new(point(0.0, 0.0), 300.0 / std::f64::consts::PI);
        assert_eq!(max_slots(c.arc_length(&ArcAngles::new(180.0, 360.0)), 100.0), 4);
    }

    #[test]
    fn untagged_row_fills_to_capacity_with_equal_steps() {
        let c = Circle::new(point(790.0, 960.0), 300.0);
        let arc = ArcAngles::new(180.0, 360.0);
        let seats = fill(&c, arc, 150.0, None);
        // π·300 / 150 = 6.28 → 7 seats
        assert_eq!(seats.len(), 7);
        let step = 2.0 * 300.0 * (15.0f64).to_radians().sin();
        for w in seats.windows(2) {
            assert!((distance(w[0].position, w[1].position) - step).abs() < 1e-6);
        }
        assert!((seats[0].angle - 180.0).abs() < 1e-9);
        let last = seats[6].angle;
        assert!(last > 359.999 || last < 1e-3, "last angle {last}");
        assert!(seats.iter().all(|s| s.category == Category::Seat));
    }

    #[test]
    fn single_category_sits_mid_arc() {
        let c = Circle::new(point(0.0, 0.0), 400.0);
        let seats = fill(&c, ArcAngles::new(190.0, 350.0), 150.0, Some(&[Category::Tuba]));
        assert_eq!(seats.len(), 1);
        assert!((seats[0].angle - 270.0).abs() < 1e-9);
        assert_eq!(seats[0].category, Category::Tuba);
    }

    #[test]
    fn point_arc_places_one_central_seat() {
        let c = Circle::new(point(0.0, 0.0), 250.0);
        let seats = fill(&c, ArcAngles::new(270.0, 270.0), 150.0, None);
        assert_eq!(seats.len(), 1);
        assert!((seats[0].position - point(0.0, -250.0)).norm() < 1e-9);
    }

    #[test]
    fn categories_spread_over_whole_arc() {
        let c = Circle::new(point(0.0, 0.0), 500.0);
        let cats = [Category::Flute, Category::Oboe, Category::Clarinet];
        let seats = fill(&c, ArcAngles::new(200.0, 340.0), 100.0, Some(&cats));
        assert_eq!(seats.len(), 3);
        assert!((seats[1].angle - 270.0).abs() < 1e-6);
        assert!((seats[2].angle - 340.0).abs() < 1e-6);
        let got: Vec<_> = seats.iter().map(|s| s.category).collect();
        assert_eq!(got, cats.to_vec());
    }

    #[test]
    fn oversubscribed_row_degrades_to_plain_seats() {
        let c = Circle::new(point(0.0, 0.0), 100.0);
        // 10° at r=100 is ~17.5 cm: room for 2 seats at 15 cm
        let cats = [Category::Horn; 5];
        let seats = fill(&c, ArcAngles::new(260.0, 270.0), 15.0, Some(&cats));
        assert_eq!(seats.len(), 2);
        assert!(seats.iter().all(|s| s.category == Category::Seat));
    }

    #[test]
    fn tally_counts_by_category() {
        let c = Circle::new(point(0.0, 0.0), 500.0);
        let mut tally = SeatTally::new();
        let cats = [Category::Flute, Category::Reserved, Category::Flute];
        fill_row(&c, &ArcAngles::new(200.0, 340.0), 100.0, Some(&cats), 2, &mut tally);
        assert_eq!(tally.count(), 3);
        assert_eq!(tally.by_category()[&Category::Flute], 2);
        assert_eq!(tally.by_category()[&Category::Reserved], 1);
        assert!(tally.seats().iter().all(|s| s.band == 2));
    }

    proptest! {
        #[test]
        fn consecutive_seats_are_one_step_apart(
            r in 100.0f64..2000.0,
            start in 180.0f64..260.0,
            span in 10.0f64..100.0,
            d in 50.0f64..200.0,
        ) {
            let c = Circle::new(point(0.0, 0.0), r);
            let arc = ArcAngles::new(start, start + span);
            let seats = fill(&c, arc, d, None);
            prop_assert_eq!(seats.len(), max_slots(c.arc_length(&arc), d));
            if seats.len() >= 2 {
                let step = distance(c.point_at(arc.start), c.point_at(arc.start + span / (seats.len() - 1) as f64));
                for w in seats.windows(2) {
                    prop_assert!((distance(w[0].position, w[1].position) - step).abs() < 1e-6);
                }
            }
        }
    }
}
