/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Config;
use crate::elevator::{CarController, CarState};
use crate::selection::SelectionPolicy;
use crate::shared::{CarEvent, CarStatus, DispatchError, Floor, Person, Request};

/***************************************/
/*             Fleet state             */
/***************************************/
struct Fleet {
    cars: Vec<Arc<CarController>>,
    policy: Box<dyn SelectionPolicy>,
    next_request_id: u64,
}

impl Fleet {
    fn find(&self, car_id: &str) -> Result<Arc<CarController>, DispatchError> {
        self.cars
            .iter()
            .find(|car| car.id() == car_id)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownCar {
                car_id: car_id.to_string(),
            })
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Fleet-wide entry point for dispatching.
 *
 * Work happens in two phases. `assign` picks a car for a new request and queues it
 * there, returning straight away. `dispatch_all` later makes every car serve its
 * queue. One coordinator exists per building; share it as an
 * `Arc<DispatchCoordinator>` with whoever needs it.
 *
 * # Fields
 * - `building_name`:   Shown in the status report.
 * - `top_floor`:       Highest valid floor, floors run from 0 to `top_floor`.
 * - `fleet`:           Cars, active policy and the request counter, behind one lock.
 * - `event_tx`:        Optional outbound channel receiving every `CarEvent`.
 *
 * # Locking
 * `assign` holds the fleet lock from snapshot to enqueue, so two concurrent callers
 * can never both claim the last free seat of a car. The fleet lock is always taken
 * before a car lock, never the other way around. `dispatch_all` releases the fleet
 * lock before the cars start moving.
 */
pub struct DispatchCoordinator {
    building_name: String,
    top_floor: Floor,
    fleet: Mutex<Fleet>,
    event_tx: Option<cbc::Sender<CarEvent>>,
}

impl DispatchCoordinator {
    pub fn new(
        building_name: impl Into<String>,
        top_floor: Floor,
        policy: Box<dyn SelectionPolicy>,
    ) -> DispatchCoordinator {
        DispatchCoordinator {
            building_name: building_name.into(),
            top_floor,
            fleet: Mutex::new(Fleet {
                cars: Vec::new(),
                policy,
                next_request_id: 1,
            }),
            event_tx: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<DispatchCoordinator, DispatchError> {
        let coordinator = DispatchCoordinator::new(
            config.building.name.clone(),
            config.building.top_floor,
            config.dispatch.policy.build(),
        );
        for car in &config.fleet {
            coordinator.add_car(CarController::new(car.id.clone(), car.max_capacity))?;
        }
        Ok(coordinator)
    }

    /// Every event produced by `dispatch_all` and `dispatch_car` is also sent here.
    pub fn with_event_sink(mut self, event_tx: cbc::Sender<CarEvent>) -> DispatchCoordinator {
        self.event_tx = Some(event_tx);
        self
    }

    fn lock_fleet(&self) -> MutexGuard<'_, Fleet> {
        self.fleet.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn building_name(&self) -> &str {
        &self.building_name
    }

    pub fn top_floor(&self) -> Floor {
        self.top_floor
    }

    pub fn add_car(&self, car: CarController) -> Result<Arc<CarController>, DispatchError> {
        let mut fleet = self.lock_fleet();
        if fleet.cars.iter().any(|existing| existing.id() == car.id()) {
            return Err(DispatchError::DuplicateCar {
                car_id: car.id().to_string(),
            });
        }

        let car = Arc::new(car);
        fleet.cars.push(Arc::clone(&car));
        debug!("Added elevator {} to {}", car.id(), self.building_name);
        Ok(car)
    }

    pub fn set_selection_policy(&self, policy: Box<dyn SelectionPolicy>) {
        let mut fleet = self.lock_fleet();
        info!("Selection policy: {} -> {}", fleet.policy.name(), policy.name());
        fleet.policy = policy;
    }

    pub fn policy_name(&self) -> &'static str {
        self.lock_fleet().policy.name()
    }

    pub fn car(&self, car_id: &str) -> Option<Arc<CarController>> {
        self.lock_fleet().find(car_id).ok()
    }

    pub fn cars(&self) -> Vec<Arc<CarController>> {
        self.lock_fleet().cars.clone()
    }

    fn check_floor(&self, floor: Floor) -> Result<(), DispatchError> {
        if floor > self.top_floor {
            return Err(DispatchError::InvalidFloor {
                floor,
                top_floor: self.top_floor,
            });
        }
        Ok(())
    }

    /**
     * Phase 1: choose a car for the ride and queue the request on it.
     *
     * Nothing moves here. On success the returned request names its car. A request
     * that no car can take comes back as `DispatchError::NoCarAvailable`, and
     * invalid floors are rejected before any car is looked at. In both cases no
     * car is touched.
     */
    pub fn assign(
        &self,
        person: Person,
        origin: Floor,
        destination: Floor,
    ) -> Result<Arc<Request>, DispatchError> {
        let mut fleet = self.lock_fleet();

        let validated = self
            .check_floor(origin)
            .and_then(|_| self.check_floor(destination))
            .and_then(|_| Request::new(fleet.next_request_id, person, origin, destination));
        let mut request = match validated {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected request: {}", e);
                return Err(e);
            }
        };
        fleet.next_request_id += 1;

        let snapshot: Vec<CarState> = fleet.cars.iter().map(|car| car.snapshot()).collect();
        let chosen = fleet
            .policy
            .choose(&snapshot, origin, request.direction())
            .and_then(|index| fleet.cars.get(index))
            .cloned();

        let car = match chosen {
            Some(car) => car,
            None => {
                warn!("No available elevator for {}", request);
                return Err(DispatchError::NoCarAvailable {
                    request: request.to_string(),
                });
            }
        };

        request.assign_car(car.id())?;
        let request = Arc::new(request);
        car.enqueue(Arc::clone(&request))?;

        info!("{} -> Go to {}", request, car.id());
        Ok(request)
    }

    /**
     * Phase 2: every car serves its pending queue.
     *
     * Cars are independent, so each runs its batch on its own worker thread. The
     * returned events are grouped per car in fleet order, each car's events in the
     * order its stops were visited.
     */
    pub fn dispatch_all(&self) -> Vec<CarEvent> {
        let cars = self.cars();

        let batches: Vec<Vec<CarEvent>> = thread::scope(|scope| {
            let workers: Vec<_> = cars
                .iter()
                .map(|car| {
                    let worker = thread::Builder::new()
                        .name(format!("car_{}", car.id()))
                        .spawn_scoped(scope, move || car.execute_batch());
                    (car, worker)
                })
                .collect();

            workers
                .into_iter()
                .map(|(car, worker)| match worker {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        error!("[{}] Batch worker panicked", car.id());
                        Vec::new()
                    }),
                    Err(e) => {
                        warn!("[{}] Could not start batch worker ({}), running inline", car.id(), e);
                        car.execute_batch()
                    }
                })
                .collect()
        });

        let events: Vec<CarEvent> = batches.into_iter().flatten().collect();
        info!("Dispatched {} elevator(s), {} event(s)", cars.len(), events.len());
        self.publish(&events);
        events
    }

    /// Runs the batch of a single car.
    pub fn dispatch_car(&self, car_id: &str) -> Result<Vec<CarEvent>, DispatchError> {
        let car = self.lock_fleet().find(car_id)?;
        let events = car.execute_batch();
        self.publish(&events);
        Ok(events)
    }

    /// Toggles maintenance on one car. Returns how many pending requests stay
    /// queued on it.
    pub fn set_maintenance(&self, car_id: &str, maintenance: bool) -> Result<usize, DispatchError> {
        let fleet = self.lock_fleet();
        let car = fleet.find(car_id)?;
        let carried = car.set_maintenance(maintenance);
        info!(
            "[{}] Maintenance {}",
            car_id,
            if maintenance { "on" } else { "off" }
        );
        Ok(carried)
    }

    pub fn status(&self) -> Vec<CarStatus> {
        self.cars().iter().map(|car| car.status()).collect()
    }

    pub fn status_report(&self) -> String {
        let mut report = format!("=== {} Elevator System ===\n", self.building_name);
        for status in self.status() {
            report.push_str(&format!("  {}\n", status));
        }
        report
    }

    fn publish(&self, events: &[CarEvent]) {
        if let Some(event_tx) = &self.event_tx {
            for event in events {
                if event_tx.send(event.clone()).is_err() {
                    debug!("Event log receiver is gone, dropping remaining events");
                    return;
                }
            }
        }
    }
}
