//! Static map features and the road direction rules
//!
//! Every cell carries exactly one static tile. Roads and traffic lights carry a
//! direction, and the direction of the current cell decides which neighbouring
//! cells a car may drive into: straight ahead or turning, never a U-turn.

use super::grid::{GridWorld, Occupant};
use super::types::{DestinationId, Direction, LightId, Position};

/// The immutable tile a cell was loaded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticTile {
    Road(Direction),
    TrafficLight(LightId, Direction),
    Building,
    Destination(DestinationId),
    Empty,
}

impl StaticTile {
    /// Direction used for transit legality, if the tile has one
    pub fn direction(&self) -> Option<Direction> {
        match self {
            StaticTile::Road(direction) | StaticTile::TrafficLight(_, direction) => Some(*direction),
            _ => None,
        }
    }
}

/// Static tile at `pos`; cars are skipped
pub fn static_tile(grid: &GridWorld, pos: Position) -> StaticTile {
    grid.occupants_at(pos)
        .iter()
        .find_map(|occupant| match occupant {
            Occupant::Road { direction } => Some(StaticTile::Road(*direction)),
            Occupant::TrafficLight { id, direction } => Some(StaticTile::TrafficLight(*id, *direction)),
            Occupant::Building => Some(StaticTile::Building),
            Occupant::Destination(id) => Some(StaticTile::Destination(*id)),
            Occupant::Car(_) => None,
        })
        .unwrap_or(StaticTile::Empty)
}

pub fn static_direction(grid: &GridWorld, pos: Position) -> Option<Direction> {
    static_tile(grid, pos).direction()
}

pub fn light_at(grid: &GridWorld, pos: Position) -> Option<LightId> {
    match static_tile(grid, pos) {
        StaticTile::TrafficLight(id, _) => Some(id),
        _ => None,
    }
}

/// Whether a car on `current` facing `facing` may enter `neighbor`, a Moore
/// neighbour whose own tile faces `neighbor_facing`.
pub fn can_transit(facing: Direction, current: Position, neighbor: Position, neighbor_facing: Direction) -> bool {
    if neighbor_facing == facing.opposite() {
        return false;
    }

    let left_ok = neighbor_facing == Direction::Left && neighbor.x <= current.x;
    let right_ok = neighbor_facing == Direction::Right && neighbor.x >= current.x;
    let up_ok = neighbor_facing == Direction::Up && neighbor.z >= current.z;
    let down_ok = neighbor_facing == Direction::Down && neighbor.z <= current.z;

    match facing {
        Direction::Up => left_ok || right_ok || up_ok,
        Direction::Down => neighbor.z < current.z && (left_ok || right_ok || down_ok),
        Direction::Right => neighbor.x >= current.x && (up_ok || down_ok || right_ok),
        Direction::Left => neighbor.x < current.x && (up_ok || down_ok || left_ok),
    }
}

/// Neighbours of `current` a car may move into.
///
/// `goal` is the car's own destination cell: it is always reachable from an
/// adjacent cell, whatever the direction rules say. Other destinations,
/// buildings and empty cells are never legal targets.
pub fn transit_targets(grid: &GridWorld, current: Position, goal: Option<Position>) -> Vec<Position> {
    let Some(facing) = static_direction(grid, current) else {
        return Vec::new();
    };

    grid.neighbors(current)
        .into_iter()
        .filter(|&neighbor| match static_tile(grid, neighbor) {
            StaticTile::Destination(_) => goal == Some(neighbor),
            StaticTile::Building | StaticTile::Empty => false,
            StaticTile::Road(neighbor_facing) | StaticTile::TrafficLight(_, neighbor_facing) => {
                can_transit(facing, current, neighbor, neighbor_facing)
            }
        })
        .collect()
}
