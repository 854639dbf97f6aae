/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::DispatchError;

pub type Floor = u8;
pub type CarId = String;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Idle,
    Moving,
    Maintenance,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "IDLE"),
            Mode::Moving => write!(f, "MOVING"),
            Mode::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

/// Travel direction of a car or of a request. `Stop` is the "no direction" value
/// an idle or parked car reports.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    /// Direction of travel needed to get from `from` to `to`.
    pub fn between(from: Floor, to: Floor) -> Direction {
        if from < to {
            Direction::Up
        } else if from > to {
            Direction::Down
        } else {
            Direction::Stop
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Stop => write!(f, "NONE"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub name: String,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Person {
        Person {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/**
 * A single pickup request.
 *
 * Built by the coordinator, which is also the only one to set `assigned_car`. After
 * assignment the request is wrapped in an `Arc` and shared with the car's pending
 * queue, so nothing can change it from then on.
 *
 * # Fields
 * - `id`:              Sequential number, rendered as `REQ-<id>`.
 * - `person`:          Who is riding.
 * - `origin`:          Pickup floor.
 * - `destination`:     Drop-off floor, never equal to `origin`.
 * - `direction`:       `Up` if `origin < destination`, else `Down`.
 * - `assigned_car`:    Car chosen at assignment time. Set at most once.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    id: u64,
    person: Person,
    origin: Floor,
    destination: Floor,
    direction: Direction,
    assigned_car: Option<CarId>,
}

impl Request {
    pub fn new(
        id: u64,
        person: Person,
        origin: Floor,
        destination: Floor,
    ) -> Result<Request, DispatchError> {
        if origin == destination {
            return Err(DispatchError::SameFloor { floor: origin });
        }

        let direction = if origin < destination {
            Direction::Up
        } else {
            Direction::Down
        };

        Ok(Request {
            id,
            person,
            origin,
            destination,
            direction,
            assigned_car: None,
        })
    }

    pub fn assign_car(&mut self, car_id: &str) -> Result<(), DispatchError> {
        if let Some(current) = &self.assigned_car {
            return Err(DispatchError::RequestAlreadyAssigned {
                request: self.label(),
                car_id: current.clone(),
            });
        }
        self.assigned_car = Some(car_id.to_string());
        Ok(())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> String {
        format!("REQ-{}", self.id)
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn origin(&self) -> Floor {
        self.origin
    }

    pub fn destination(&self) -> Floor {
        self.destination
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn assigned_car(&self) -> Option<&str> {
        self.assigned_car.as_deref()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request[{}] {}: Floor {} -> Floor {} ({})",
            self.label(),
            self.person,
            self.origin,
            self.destination,
            self.direction
        )?;
        if let Some(car_id) = &self.assigned_car {
            write!(f, " via {}", car_id)?;
        }
        Ok(())
    }
}

/// Read-only telemetry for one car, as shown on status displays.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarStatus {
    pub id: CarId,
    pub floor: Floor,
    pub mode: Mode,
    pub direction: Direction,
    pub onboard: usize,
    pub max_capacity: usize,
    pub pending: usize,
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Elevator {}: Floor {}, {}, Passengers: {}/{}, Pending: {}",
            self.id, self.floor, self.mode, self.onboard, self.max_capacity, self.pending
        )
    }
}

/// Events emitted by a car while it executes a batch, in stop order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CarEvent {
    CarMoved {
        car_id: CarId,
        from: Floor,
        to: Floor,
        direction: Direction,
    },
    PassengerPickedUp {
        car_id: CarId,
        person: Person,
        floor: Floor,
    },
    PassengerDroppedOff {
        car_id: CarId,
        person: Person,
        floor: Floor,
    },
}

impl CarEvent {
    pub fn car_id(&self) -> &str {
        match self {
            CarEvent::CarMoved { car_id, .. }
            | CarEvent::PassengerPickedUp { car_id, .. }
            | CarEvent::PassengerDroppedOff { car_id, .. } => car_id,
        }
    }
}

impl fmt::Display for CarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarEvent::CarMoved {
                car_id,
                from,
                to,
                direction,
            } => write!(f, "[{}] Moving {}: Floor {} -> Floor {}", car_id, direction, from, to),
            CarEvent::PassengerPickedUp {
                car_id,
                person,
                floor,
            } => write!(f, "[{}] Picked up {} at Floor {}", car_id, person, floor),
            CarEvent::PassengerDroppedOff {
                car_id,
                person,
                floor,
            } => write!(f, "[{}] Dropped off {} at Floor {}", car_id, person, floor),
        }
    }
}
