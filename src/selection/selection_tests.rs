/*
 * Unit tests for the selection module
 *
 * The unit tests follows the Arrange, Act, Assert pattern. Policies are pure, so the
 * fleets here are plain `CarState` values placed by hand.
 *
 * Tests:
 *  - test_cost_table
 *  - test_cost_excludes_maintenance_and_full
 *  - test_cost_tie_goes_to_first_car
 *  - test_cost_grouping_beats_idle_car_at_floor
 *  - test_cost_grouping_dominance_random_fleets
 *  - test_cost_floor_equal_to_moving_car_is_ahead
 *  - test_cost_empty_or_unavailable_fleet
 *  - test_nearest_prefers_car_on_the_way
 *  - test_nearest_falls_back_to_any_available
 *  - test_nearest_ignores_grouping
 *  - test_policy_kind_builds_matching_policy
 */

/***************************************/
/*             Unit tests              */
/***************************************/
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::elevator::CarState;
use crate::selection::{CostPolicy, NearestPolicy, PolicyKind, SelectionPolicy};
use crate::shared::Direction::{Down, Stop, Up};
use crate::shared::Mode::{Idle, Maintenance, Moving};
use crate::shared::{Floor, Person, Request};

fn idle(id: &str, floor: Floor) -> CarState {
    CarState::new(id, 5).with_position(floor, Idle, Stop)
}

fn pickup(origin: Floor, destination: Floor) -> Request {
    Request::new(1, Person::new("P1", "Alice"), origin, destination).unwrap()
}

#[test]
fn test_cost_table() {
    // Arrange
    let idle_car = idle("A", 2);
    let grouping_car = CarState::new("B", 5)
        .with_position(9, Moving, Down)
        .with_pending(pickup(6, 8));
    let ahead_car = CarState::new("C", 5).with_position(4, Moving, Up);
    let behind_car = CarState::new("D", 5).with_position(8, Moving, Up);
    let opposite_car = CarState::new("E", 5).with_position(3, Moving, Down);

    // Act & Assert
    assert_eq!(CostPolicy::cost(&idle_car, 6, Up), Some(5));
    assert_eq!(CostPolicy::cost(&grouping_car, 6, Up), Some(0));
    assert_eq!(CostPolicy::cost(&ahead_car, 6, Up), Some(3));
    assert_eq!(CostPolicy::cost(&behind_car, 6, Up), Some(7));
    assert_eq!(CostPolicy::cost(&opposite_car, 6, Up), Some(7));
}

#[test]
fn test_cost_excludes_maintenance_and_full() {
    // Arrange
    let parked = idle("A", 6).with_position(6, Maintenance, Stop);
    let full = idle("B", 6).with_onboard(5);
    let fleet = vec![parked.clone(), full.clone()];

    // Act
    let chosen = CostPolicy.choose(&fleet, 6, Up);

    // Assert
    assert_eq!(CostPolicy::cost(&parked, 6, Up), None);
    assert_eq!(CostPolicy::cost(&full, 6, Up), None);
    assert_eq!(chosen, None);
}

#[test]
fn test_cost_tie_goes_to_first_car() {
    // Arrange
    let fleet = vec![idle("A", 0), idle("B", 0), idle("C", 4)];

    // Act
    let chosen = CostPolicy.choose(&fleet, 2, Up);

    // Assert
    assert_eq!(chosen, Some(0));
}

#[test]
fn test_cost_grouping_beats_idle_car_at_floor() {
    // Purpose: a car already stopping at the floor wins over an idle car standing there

    // Arrange
    let fleet = vec![idle("A", 3), idle("B", 9).with_pending(pickup(3, 0))];

    // Act
    let chosen = CostPolicy.choose(&fleet, 3, Down);

    // Assert
    assert_eq!(CostPolicy::cost(&fleet[0], 3, Down), Some(1));
    assert_eq!(chosen, Some(1));
}

#[test]
fn test_cost_grouping_dominance_random_fleets() {
    // Arrange
    let mut rng = StdRng::seed_from_u64(27);

    for _ in 0..200 {
        let floor: Floor = rng.random_range(0..=10);
        let direction = if rng.random_bool(0.5) { Up } else { Down };
        let mut fleet: Vec<CarState> = (0..rng.random_range(1..6))
            .map(|i| {
                let mode = if rng.random_bool(0.5) { Idle } else { Moving };
                let car_direction = match mode {
                    Idle => Stop,
                    _ if rng.random_bool(0.5) => Up,
                    _ => Down,
                };
                CarState::new(format!("C{}", i), 5).with_position(
                    rng.random_range(0..=10),
                    mode,
                    car_direction,
                )
            })
            .collect();
        let grouping_index = rng.random_range(0..=fleet.len());
        let other_floor = (floor + 1) % 11;
        let grouping_car = idle("G", rng.random_range(0..=10)).with_pending(pickup(floor, other_floor));
        fleet.insert(grouping_index, grouping_car);

        // Act
        let chosen = CostPolicy.choose(&fleet, floor, direction);

        // Assert
        assert_eq!(chosen, Some(grouping_index));
    }
}

#[test]
fn test_cost_floor_equal_to_moving_car_is_ahead() {
    // Arrange
    let car = CarState::new("A", 5).with_position(4, Moving, Up);

    // Act
    let cost = CostPolicy::cost(&car, 4, Up);

    // Assert
    assert_eq!(cost, Some(1));
}

#[test]
fn test_cost_empty_or_unavailable_fleet() {
    // Arrange
    let empty: Vec<CarState> = Vec::new();
    let all_parked = vec![
        idle("A", 0).with_position(0, Maintenance, Stop),
        idle("B", 5).with_position(5, Maintenance, Stop),
    ];

    // Act & Assert
    assert_eq!(CostPolicy.choose(&empty, 3, Up), None);
    assert_eq!(CostPolicy.choose(&all_parked, 3, Up), None);
    assert_eq!(NearestPolicy.choose(&empty, 3, Up), None);
    assert_eq!(NearestPolicy.choose(&all_parked, 3, Up), None);
}

#[test]
fn test_nearest_prefers_car_on_the_way() {
    // Purpose: a closer car that already passed the floor loses to one heading for it

    // Arrange
    let fleet = vec![
        CarState::new("A", 5).with_position(6, Moving, Up),
        CarState::new("B", 5).with_position(1, Moving, Up),
    ];

    // Act
    let chosen = NearestPolicy.choose(&fleet, 5, Up);

    // Assert
    assert_eq!(chosen, Some(1));
}

#[test]
fn test_nearest_falls_back_to_any_available() {
    // Arrange
    let fleet = vec![
        CarState::new("A", 5).with_position(9, Moving, Up),
        CarState::new("B", 5).with_position(7, Moving, Down),
        idle("C", 2).with_position(2, Maintenance, Stop),
    ];

    // Act
    let chosen = NearestPolicy.choose(&fleet, 3, Up);

    // Assert
    assert_eq!(chosen, Some(1));
}

#[test]
fn test_nearest_ignores_grouping() {
    // Arrange
    let fleet = vec![idle("A", 9).with_pending(pickup(2, 6)), idle("B", 3)];

    // Act
    let nearest = NearestPolicy.choose(&fleet, 2, Up);
    let cost = CostPolicy.choose(&fleet, 2, Up);

    // Assert
    assert_eq!(nearest, Some(1));
    assert_eq!(cost, Some(0));
}

#[test]
fn test_policy_kind_builds_matching_policy() {
    assert_eq!(PolicyKind::Cost.build().name(), "cost");
    assert_eq!(PolicyKind::Nearest.build().name(), "nearest");
    assert_eq!(PolicyKind::default(), PolicyKind::Cost);
}
