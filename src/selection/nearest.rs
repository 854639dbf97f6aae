use crate::elevator::CarState;
use crate::selection::policy::{first_minimum, SelectionPolicy};
use crate::shared::{Direction, Floor};

/// Nearest car that can pick the passenger up on its way, falling back to the
/// nearest available car in any direction. Does no grouping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestPolicy;

impl SelectionPolicy for NearestPolicy {
    fn name(&self) -> &'static str {
        "nearest"
    }

    fn choose(&self, fleet: &[CarState], floor: Floor, direction: Direction) -> Option<usize> {
        first_minimum(fleet, |car| {
            car.can_serve(floor, direction)
                .then(|| car.distance_to(floor))
        })
        .or_else(|| {
            first_minimum(fleet, |car| {
                car.is_available().then(|| car.distance_to(floor))
            })
        })
    }
}
