/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::CarState;
use crate::selection::{CostPolicy, NearestPolicy};
use crate::shared::{Direction, Floor};

/// Picks the car that should serve a pickup at `floor` heading `direction`.
///
/// Implementations must be pure: the answer depends on the arguments only, and the
/// fleet snapshot is never mutated. Returns the index of the chosen car in `fleet`,
/// or `None` when no car can take the request.
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose(&self, fleet: &[CarState], floor: Floor, direction: Direction) -> Option<usize>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Cost,
    Nearest,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn SelectionPolicy> {
        match self {
            PolicyKind::Cost => Box::new(CostPolicy),
            PolicyKind::Nearest => Box::new(NearestPolicy),
        }
    }
}

/// Index of the first car with the lowest key. Cars mapped to `None` never win.
pub(crate) fn first_minimum<F>(fleet: &[CarState], mut key: F) -> Option<usize>
where
    F: FnMut(&CarState) -> Option<u32>,
{
    let mut best: Option<(usize, u32)> = None;
    for (index, car) in fleet.iter().enumerate() {
        if let Some(value) = key(car) {
            match best {
                Some((_, best_value)) if best_value <= value => {}
                _ => best = Some((index, value)),
            }
        }
    }
    best.map(|(index, _)| index)
}
