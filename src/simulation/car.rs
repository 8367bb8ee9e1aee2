//! Car movement logic for the city simulation
//!
//! A car follows the route planned when it spawned, one cell per step, and
//! never re-plans. It waits in place behind red lights and other cars.

use log::debug;
use std::collections::VecDeque;

use super::error::SimResult;
use super::features;
use super::grid::{GridWorld, Occupant};
use super::traffic_light::TrafficLightController;
use super::types::{CarId, DestinationId, Direction, Position};

/// Lifecycle of a car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarState {
    Moving,
    /// Terminal; the world retires the car on seeing this
    Arrived,
}

/// Why a car did not move this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallReason {
    RedLight,
    CarAhead,
}

/// Result of a car update indicating what action should be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarUpdateResult {
    Moved(Position),
    Stalled(StallReason),
    /// Route is used up, the car should be retired
    Arrived,
}

/// A car in the city simulation
#[derive(Debug, Clone)]
pub struct SimCar {
    pub id: CarId,
    pub position: Position,
    pub destination: DestinationId,
    pub destination_position: Position,
    /// Remaining cells to drive through, next cell at the front
    pub route: VecDeque<Position>,
    pub direction: Direction,
    pub state: CarState,
    /// False when the planner could not reach the destination
    pub route_complete: bool,
    /// Cells driven so far
    pub cells_travelled: u64,
}

impl SimCar {
    pub fn new(
        id: CarId,
        position: Position,
        destination: DestinationId,
        destination_position: Position,
        route: Vec<Position>,
        route_complete: bool,
        direction: Direction,
    ) -> Self {
        Self {
            id,
            position,
            destination,
            destination_position,
            route: route.into(),
            direction,
            state: CarState::Moving,
            route_complete,
            cells_travelled: 0,
        }
    }

    /// Advance the car by at most one cell
    pub fn update(&mut self, grid: &mut GridWorld, lights: &TrafficLightController) -> SimResult<CarUpdateResult> {
        if self.state == CarState::Arrived {
            return Ok(CarUpdateResult::Arrived);
        }

        let Some(&next) = self.route.front() else {
            self.state = CarState::Arrived;
            return Ok(CarUpdateResult::Arrived);
        };

        // Facing follows the next cell even if we end up waiting
        if let Some(direction) = features::static_direction(grid, next) {
            self.direction = direction;
        }

        if let Some(light) = features::light_at(grid, next) {
            if !lights.is_open(light)? {
                debug!("{} waiting at red light {} ({})", self.id, light, next);
                return Ok(CarUpdateResult::Stalled(StallReason::RedLight));
            }
        }

        if grid.has_car(next) {
            debug!("{} blocked by a car at {}", self.id, next);
            return Ok(CarUpdateResult::Stalled(StallReason::CarAhead));
        }

        grid.move_occupant(Occupant::Car(self.id), self.position, next)?;
        self.route.pop_front();
        self.position = next;
        self.cells_travelled += 1;

        if self.route.is_empty() {
            self.state = CarState::Arrived;
            return Ok(CarUpdateResult::Arrived);
        }

        Ok(CarUpdateResult::Moved(next))
    }
}
