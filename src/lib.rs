//! Elevator dispatch for a multi-car building.
//!
//! Pickup requests go to [`DispatchCoordinator::assign`], which asks the active
//! [`SelectionPolicy`] for a car and queues the request there. A later call to
//! [`DispatchCoordinator::dispatch_all`] makes every car serve its queue and reports
//! what happened as a list of [`CarEvent`]s.

pub mod config;
pub mod coordinator;
pub mod elevator;
pub mod selection;
pub mod shared;

pub use coordinator::DispatchCoordinator;
pub use elevator::{CarController, CarState};
pub use selection::{CostPolicy, NearestPolicy, PolicyKind, SelectionPolicy};
pub use shared::{CarEvent, CarStatus, Direction, DispatchError, Floor, Mode, Person, Request};
