use crate::elevator::CarState;
use crate::selection::policy::{first_minimum, SelectionPolicy};
use crate::shared::{Direction, Floor, Mode};

/**
 * Cost-based selection with grouping.
 *
 * Every eligible car gets a cost and the cheapest one wins; on a tie the car that
 * comes first in the fleet wins.
 *
 * | Situation                                   | Cost             |
 * |---------------------------------------------|------------------|
 * | already picking someone up at `floor`       | 0                |
 * | idle                                        | distance + 1     |
 * | moving the same way, `floor` ahead or at    | distance + 1     |
 * | moving the same way, `floor` behind         | 3 * distance + 1 |
 * | moving the other way                        | 2 * distance + 1 |
 * | maintenance or full                         | not eligible     |
 *
 * The `+ 1` keeps grouping strictly cheaper than an idle car already standing at
 * the pickup floor.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct CostPolicy;

impl CostPolicy {
    pub fn cost(car: &CarState, floor: Floor, direction: Direction) -> Option<u32> {
        if car.mode() == Mode::Maintenance || !car.is_available() {
            return None;
        }
        if car.has_pending_pickup_at(floor) {
            return Some(0);
        }

        let distance = car.distance_to(floor);
        let cost = match car.mode() {
            Mode::Idle => distance + 1,
            Mode::Moving if car.direction() == direction => {
                if car.is_ahead(floor, direction) {
                    distance + 1
                } else {
                    3 * distance + 1
                }
            }
            Mode::Moving => 2 * distance + 1,
            Mode::Maintenance => return None,
        };
        Some(cost)
    }
}

impl SelectionPolicy for CostPolicy {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn choose(&self, fleet: &[CarState], floor: Floor, direction: Direction) -> Option<usize> {
        first_minimum(fleet, |car| CostPolicy::cost(car, floor, direction))
    }
}
