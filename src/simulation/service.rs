//! Front door for an external renderer or web layer
//!
//! Wraps at most one `SimWorld` and exposes initialize / reset / step plus
//! listings of the static city and of the moving objects. Positions are
//! reported in renderer space: grid `x`/`z` with `y` as the height above
//! ground.

use log::{debug, info};

use super::error::{SimError, SimResult};
use super::features::{self, StaticTile};
use super::map::CityMap;
use super::types::{Dimensions, StepReport};
use super::world::{SimConfig, SimWorld};

/// Height at which cars and lights are drawn
const RAISED_Y: f32 = 1.0;

/// Anything with an id and a place in the city
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Green when true
    pub state: bool,
}

/// Everything that never moves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticObjects {
    pub buildings: Vec<ObjectInfo>,
    pub roads: Vec<ObjectInfo>,
    pub destinations: Vec<ObjectInfo>,
    pub traffic_lights: Vec<ObjectInfo>,
}

/// Everything that changes from step to step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicObjects {
    pub cars: Vec<CarInfo>,
    pub traffic_lights: Vec<LightInfo>,
}

/// Owns the map and the single simulation instance built from it
pub struct CityService {
    map: CityMap,
    config: SimConfig,
    world: Option<SimWorld>,
}

impl CityService {
    pub fn new(map: CityMap, config: SimConfig) -> Self {
        Self {
            map,
            config,
            world: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    pub fn world(&self) -> Option<&SimWorld> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut SimWorld> {
        self.world.as_mut()
    }

    fn require_world(&self) -> SimResult<&SimWorld> {
        self.world.as_ref().ok_or(SimError::NotInitialized)
    }

    /// Build the simulation unless one already exists
    pub fn initialize(&mut self) -> SimResult<Dimensions> {
        if let Some(world) = &self.world {
            debug!("initialize called on a running simulation, keeping it");
            return Ok(world.dimensions());
        }
        self.reset()
    }

    /// Throw away the current simulation and rebuild it from the map
    pub fn reset(&mut self) -> SimResult<Dimensions> {
        let world = SimWorld::from_map(&self.map, self.config)?;
        let dimensions = world.dimensions();
        self.world = Some(world);
        info!("Simulation ready ({}x{})", dimensions.width, dimensions.height);
        Ok(dimensions)
    }

    pub fn step(&mut self) -> SimResult<StepReport> {
        self.world.as_mut().ok_or(SimError::NotInitialized)?.tick()
    }

    pub fn list_city_static_objects(&self) -> SimResult<StaticObjects> {
        let world = self.require_world()?;
        let grid = &world.grid;
        let mut objects = StaticObjects::default();

        for pos in grid.positions() {
            let number = grid.cell_number(pos);
            let (x, z) = (pos.x as f32, pos.z as f32);
            let ground = |prefix: &str| ObjectInfo {
                id: format!("{}_{}", prefix, number),
                x,
                y: 0.0,
                z,
            };
            match features::static_tile(grid, pos) {
                StaticTile::Road(_) => objects.roads.push(ground("r")),
                StaticTile::Building => objects.buildings.push(ground("ob")),
                StaticTile::Destination(id) => objects.destinations.push(ObjectInfo {
                    id: id.to_string(),
                    x,
                    y: 0.0,
                    z,
                }),
                StaticTile::TrafficLight(id, _) => objects.traffic_lights.push(ObjectInfo {
                    id: id.to_string(),
                    x,
                    y: RAISED_Y,
                    z,
                }),
                StaticTile::Empty => {}
            }
        }

        Ok(objects)
    }

    pub fn list_dynamic_objects(&self) -> SimResult<DynamicObjects> {
        let world = self.require_world()?;

        let cars = world
            .cars
            .values()
            .map(|car| CarInfo {
                id: car.id.to_string(),
                x: car.position.x as f32,
                y: RAISED_Y,
                z: car.position.z as f32,
                direction: car.direction.to_string(),
            })
            .collect();

        let traffic_lights = world
            .lights
            .iter()
            .map(|light| LightInfo {
                id: light.id.to_string(),
                x: light.position.x as f32,
                y: RAISED_Y,
                z: light.position.z as f32,
                state: light.open,
            })
            .collect();

        Ok(DynamicObjects { cars, traffic_lights })
    }
}
