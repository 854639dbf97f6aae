/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Floor;

/// Everything that can go wrong inside the dispatch core.
///
/// `InvalidFloor`, `SameFloor` and `NoCarAvailable` are per-request outcomes that
/// callers are expected to handle. The rest are setup or sequencing mistakes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid floor {floor}, building has floors 0 to {top_floor}")]
    InvalidFloor { floor: Floor, top_floor: Floor },

    #[error("origin and destination are both floor {floor}")]
    SameFloor { floor: Floor },

    #[error("no available elevator for {request}")]
    NoCarAvailable { request: String },

    #[error("elevator {car_id} is not part of the fleet")]
    UnknownCar { car_id: String },

    #[error("elevator {car_id} is already part of the fleet")]
    DuplicateCar { car_id: String },

    #[error("{request} is already assigned to elevator {car_id}")]
    RequestAlreadyAssigned { request: String, car_id: String },

    #[error("elevator {car_id} is at full capacity ({max_capacity})")]
    CapacityExceeded { car_id: String, max_capacity: usize },

    #[error("elevator {car_id} is under maintenance")]
    CarInMaintenance { car_id: String },
}

impl DispatchError {
    /// True when the same call may succeed later without any change by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::NoCarAvailable { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidFloor { .. } | DispatchError::SameFloor { .. }
        )
    }
}
