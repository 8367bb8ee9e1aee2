//! Grid world holding every occupant of the city
//!
//! Each cell keeps an ordered list of occupants: the static tile placed at
//! load time plus any cars currently standing on it.

use super::error::{SimError, SimResult};
use super::types::{CarId, DestinationId, Direction, LightId, Position};

/// Anything that can stand on a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Road { direction: Direction },
    TrafficLight { id: LightId, direction: Direction },
    Building,
    Destination(DestinationId),
    Car(CarId),
}

impl Occupant {
    pub fn is_car(&self) -> bool {
        matches!(self, Occupant::Car(_))
    }
}

/// Fixed-size, non-wrapping grid of cells
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    cells: Vec<Vec<Occupant>>,
}

impl GridWorld {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Vec::new(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.z >= 0 && (pos.x as usize) < self.width && (pos.z as usize) < self.height
    }

    fn index(&self, pos: Position) -> SimResult<usize> {
        if !self.in_bounds(pos) {
            return Err(SimError::OutOfBounds(pos));
        }
        Ok(pos.z as usize * self.width + pos.x as usize)
    }

    /// Map cell number of a position: `row * width + column`, with row 0 at the top
    pub fn cell_number(&self, pos: Position) -> usize {
        (self.height - 1 - pos.z as usize) * self.width + pos.x as usize
    }

    /// The four spawn corners, in the order cars are created there
    pub fn corners(&self) -> [Position; 4] {
        let right = self.width as i32 - 1;
        let top = self.height as i32 - 1;
        [
            Position::new(0, 0),
            Position::new(0, top),
            Position::new(right, 0),
            Position::new(right, top),
        ]
    }

    /// Add an occupant on top of whatever is already at `pos`
    pub fn place(&mut self, occupant: Occupant, pos: Position) -> SimResult<()> {
        let index = self.index(pos)?;
        self.cells[index].push(occupant);
        Ok(())
    }

    pub fn remove(&mut self, occupant: Occupant, pos: Position) -> SimResult<()> {
        let index = self.index(pos)?;
        let cell = &mut self.cells[index];
        let slot = cell
            .iter()
            .position(|o| *o == occupant)
            .ok_or_else(|| SimError::Invariant(format!("{:?} is not at {}", occupant, pos)))?;
        cell.remove(slot);
        Ok(())
    }

    pub fn move_occupant(&mut self, occupant: Occupant, from: Position, to: Position) -> SimResult<()> {
        // Validate the target first so a failed move leaves the grid untouched
        self.index(to)?;
        self.remove(occupant, from)?;
        self.place(occupant, to)
    }

    /// Occupants at `pos`, static tile first; empty for positions off the grid
    pub fn occupants_at(&self, pos: Position) -> &[Occupant] {
        match self.index(pos) {
            Ok(index) => &self.cells[index],
            Err(_) => &[],
        }
    }

    pub fn has_car(&self, pos: Position) -> bool {
        self.occupants_at(pos).iter().any(Occupant::is_car)
    }

    /// Moore neighbourhood of `pos`, clipped at the grid edges
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut result = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let candidate = Position::new(pos.x + dx, pos.z + dz);
                if self.in_bounds(candidate) {
                    result.push(candidate);
                }
            }
        }
        result
    }

    /// Every in-bounds position, bottom row first
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32).flat_map(move |z| (0..self.width as i32).map(move |x| Position::new(x, z)))
    }
}
