/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{CarEvent, CarId, CarStatus, Direction, DispatchError, Floor, Mode, Request};

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * State of one elevator car.
 *
 * A `CarState` is only ever mutated by the `CarController` that owns it. Everyone
 * else gets a cloned copy through `CarController::snapshot`, which is what the
 * selection policies read.
 *
 * # Fields
 * - `id`:              Stable car identifier.
 * - `floor`:           Current floor.
 * - `mode`:            Idle, moving or parked for maintenance.
 * - `direction`:       Direction of the last move, `Stop` when idle or parked.
 * - `onboard`:         Passengers currently inside the car.
 * - `max_capacity`:    Upper bound on `onboard + pending.len()`.
 * - `pending`:         Assigned requests whose passenger has not boarded yet.
 */
#[derive(Debug, Clone)]
pub struct CarState {
    id: CarId,
    floor: Floor,
    mode: Mode,
    direction: Direction,
    onboard: usize,
    max_capacity: usize,
    pending: Vec<Arc<Request>>,
}

impl CarState {
    pub fn new(id: impl Into<CarId>, max_capacity: usize) -> CarState {
        CarState {
            id: id.into(),
            floor: 0,
            mode: Mode::Idle,
            direction: Direction::Stop,
            onboard: 0,
            max_capacity,
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn onboard(&self) -> usize {
        self.onboard
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn pending(&self) -> &[Arc<Request>] {
        &self.pending
    }

    /// Passengers on board plus passengers the car has promised to pick up.
    pub fn load(&self) -> usize {
        self.onboard + self.pending.len()
    }

    pub fn is_available(&self) -> bool {
        self.mode != Mode::Maintenance && self.load() < self.max_capacity
    }

    pub fn has_pending_pickup_at(&self, floor: Floor) -> bool {
        self.pending.iter().any(|request| request.origin() == floor)
    }

    pub fn distance_to(&self, floor: Floor) -> u32 {
        u32::from(self.floor.abs_diff(floor))
    }

    /// Whether `floor` lies ahead of (or at) the car when it travels in `direction`.
    pub fn is_ahead(&self, floor: Floor, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.floor <= floor,
            Direction::Down => self.floor >= floor,
            Direction::Stop => false,
        }
    }

    /// Available, and either idle or already heading for `floor` in `direction`
    /// without having passed it.
    pub fn can_serve(&self, floor: Floor, direction: Direction) -> bool {
        if !self.is_available() {
            return false;
        }
        match self.mode {
            Mode::Idle => true,
            Mode::Moving => self.direction == direction && self.is_ahead(floor, direction),
            Mode::Maintenance => false,
        }
    }

    pub fn status(&self) -> CarStatus {
        CarStatus {
            id: self.id.clone(),
            floor: self.floor,
            mode: self.mode,
            direction: self.direction,
            onboard: self.onboard,
            max_capacity: self.max_capacity,
            pending: self.pending.len(),
        }
    }

    // Floor, direction and mode change together, and only when the car really moves.
    fn move_to(&mut self, target: Floor, events: &mut Vec<CarEvent>) {
        if target == self.floor {
            return;
        }

        let direction = Direction::between(self.floor, target);
        debug!(
            "[{}] Moving {}: Floor {} -> Floor {}",
            self.id, direction, self.floor, target
        );
        events.push(CarEvent::CarMoved {
            car_id: self.id.clone(),
            from: self.floor,
            to: target,
            direction,
        });

        self.direction = direction;
        self.mode = Mode::Moving;
        self.floor = target;
    }

    #[cfg(test)]
    pub(crate) fn with_position(mut self, floor: Floor, mode: Mode, direction: Direction) -> CarState {
        self.floor = floor;
        self.mode = mode;
        self.direction = direction;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_onboard(mut self, onboard: usize) -> CarState {
        self.onboard = onboard;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_pending(mut self, request: Request) -> CarState {
        self.pending.push(Arc::new(request));
        self
    }
}

/**
 * Owns one car and serializes every access to it.
 *
 * All reads and writes go through a single mutex. `execute_batch` holds it for the
 * whole batch, so a concurrent `enqueue` either lands before the pending queue is
 * taken or waits and becomes part of the next batch. Nothing is lost or served twice.
 */
#[derive(Debug)]
pub struct CarController {
    id: CarId,
    state: Mutex<CarState>,
}

impl CarController {
    pub fn new(id: impl Into<CarId>, max_capacity: usize) -> CarController {
        let id = id.into();
        CarController {
            state: Mutex::new(CarState::new(id.clone(), max_capacity)),
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock_state(&self) -> MutexGuard<'_, CarState> {
        // Poisoning is ignored, no code path panics between two related writes.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> CarState {
        self.lock_state().clone()
    }

    pub fn status(&self) -> CarStatus {
        self.lock_state().status()
    }

    pub fn is_available(&self) -> bool {
        self.lock_state().is_available()
    }

    pub fn has_pending_pickup_at(&self, floor: Floor) -> bool {
        self.lock_state().has_pending_pickup_at(floor)
    }

    pub fn distance_to(&self, floor: Floor) -> u32 {
        self.lock_state().distance_to(floor)
    }

    pub fn can_serve(&self, floor: Floor, direction: Direction) -> bool {
        self.lock_state().can_serve(floor, direction)
    }

    /// Adds an assigned request to the pending queue. The car does not move.
    pub fn enqueue(&self, request: Arc<Request>) -> Result<(), DispatchError> {
        let mut state = self.lock_state();

        if state.mode == Mode::Maintenance {
            return Err(DispatchError::CarInMaintenance {
                car_id: self.id.clone(),
            });
        }
        if state.load() + 1 > state.max_capacity {
            return Err(DispatchError::CapacityExceeded {
                car_id: self.id.clone(),
                max_capacity: state.max_capacity,
            });
        }

        debug!("[{}] Queued {}", self.id, request);
        state.pending.push(request);
        Ok(())
    }

    /**
     * Serves every request queued so far and returns what happened, in order.
     *
     * Pickup floors are visited in ascending floor order, not arrival order. After
     * loading everyone at a pickup floor the car delivers exactly those passengers,
     * again in ascending floor order, before going to the next pickup floor. This
     * is a simplified sweep, not a real SCAN scheduler: a car sitting high up will
     * still go to the lowest pickup first.
     *
     * A car in maintenance does nothing and keeps its queue for later.
     */
    pub fn execute_batch(&self) -> Vec<CarEvent> {
        let mut state = self.lock_state();
        let mut events = Vec::new();

        if state.mode == Mode::Maintenance {
            if !state.pending.is_empty() {
                debug!(
                    "[{}] Under maintenance, holding {} pending request(s)",
                    self.id,
                    state.pending.len()
                );
            }
            return events;
        }

        let batch = std::mem::take(&mut state.pending);
        if batch.is_empty() {
            return events;
        }

        let mut by_origin: BTreeMap<Floor, Vec<Arc<Request>>> = BTreeMap::new();
        for request in batch {
            by_origin.entry(request.origin()).or_default().push(request);
        }

        for (origin, boarding) in by_origin {
            state.move_to(origin, &mut events);

            for request in &boarding {
                state.onboard += 1;
                debug!("[{}] Picked up {} at Floor {}", self.id, request.person(), origin);
                events.push(CarEvent::PassengerPickedUp {
                    car_id: self.id.clone(),
                    person: request.person().clone(),
                    floor: origin,
                });
            }

            let mut by_destination: BTreeMap<Floor, Vec<Arc<Request>>> = BTreeMap::new();
            for request in boarding {
                by_destination
                    .entry(request.destination())
                    .or_default()
                    .push(request);
            }

            for (destination, leaving) in by_destination {
                state.move_to(destination, &mut events);

                for request in leaving {
                    state.onboard = state.onboard.saturating_sub(1);
                    debug!(
                        "[{}] Dropped off {} at Floor {}",
                        self.id,
                        request.person(),
                        destination
                    );
                    events.push(CarEvent::PassengerDroppedOff {
                        car_id: self.id.clone(),
                        person: request.person().clone(),
                        floor: destination,
                    });
                }
            }
        }

        if state.onboard == 0 {
            state.mode = Mode::Idle;
            state.direction = Direction::Stop;
        }

        events
    }

    /// Parks the car for maintenance or brings it back as idle. The pending queue
    /// is left untouched; its length is returned so callers can see what stays
    /// waiting on this car.
    pub fn set_maintenance(&self, maintenance: bool) -> usize {
        let mut state = self.lock_state();

        state.mode = if maintenance {
            Mode::Maintenance
        } else {
            Mode::Idle
        };
        state.direction = Direction::Stop;

        let carried = state.pending.len();
        if maintenance && carried > 0 {
            warn!(
                "[{}] Entering maintenance with {} pending request(s), they stay queued",
                self.id, carried
            );
        }
        carried
    }
}
