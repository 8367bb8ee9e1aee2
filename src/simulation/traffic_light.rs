//! Traffic light logic for the city simulation
//!
//! Lights toggle on a shared global clock: a light with period P flips on
//! every step whose count is a multiple of P, no matter when it was created.

use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::types::{Direction, LightId, Position, FAST_LIGHT_PERIOD, SLOW_LIGHT_PERIOD};

/// A traffic light in the city
#[derive(Debug, Clone)]
pub struct SimTrafficLight {
    pub id: LightId,
    pub position: Position,
    pub direction: Direction,
    /// Steps between toggles
    pub period: u64,
    /// Green when true, red when false
    pub open: bool,
}

impl SimTrafficLight {
    pub fn new(id: LightId, position: Position, direction: Direction, period: u64, open: bool) -> Self {
        Self {
            id,
            position,
            direction,
            period,
            open,
        }
    }

    /// Long-period light, starts red
    pub fn slow(id: LightId, position: Position, direction: Direction) -> Self {
        Self::new(id, position, direction, SLOW_LIGHT_PERIOD, false)
    }

    /// Short-period light, starts green
    pub fn fast(id: LightId, position: Position, direction: Direction) -> Self {
        Self::new(id, position, direction, FAST_LIGHT_PERIOD, true)
    }

    /// Flip the light if `step_count` falls on its period
    /// Returns true when the light changed
    pub fn step(&mut self, step_count: u64) -> bool {
        if self.period > 0 && step_count % self.period == 0 {
            self.open = !self.open;
            true
        } else {
            false
        }
    }
}

/// Owns every traffic light and advances them together
#[derive(Debug, Clone, Default)]
pub struct TrafficLightController {
    lights: Vec<SimTrafficLight>,
    index: HashMap<LightId, usize>,
}

impl TrafficLightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, light: SimTrafficLight) {
        self.index.insert(light.id, self.lights.len());
        self.lights.push(light);
    }

    pub fn get(&self, id: LightId) -> Option<&SimTrafficLight> {
        self.index.get(&id).map(|&slot| &self.lights[slot])
    }

    pub fn is_open(&self, id: LightId) -> SimResult<bool> {
        self.get(id).map(|light| light.open).ok_or(SimError::UnknownLight(id))
    }

    /// Step every light against the global step counter
    /// Returns the number of lights that toggled
    pub fn step_all(&mut self, step_count: u64) -> usize {
        self.lights
            .iter_mut()
            .map(|light| light.step(step_count))
            .filter(|toggled| *toggled)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimTrafficLight> {
        self.lights.iter()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
