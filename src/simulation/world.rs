//! Main simulation world that ties everything together
//!
//! Owns the grid, the route network, the traffic lights and every car, and
//! runs the per-step ordering: lights, corner spawns, cars, counters.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};

use super::car::{CarUpdateResult, SimCar, StallReason};
use super::error::{SimError, SimResult};
use super::features::{self, StaticTile};
use super::grid::{GridWorld, Occupant};
use super::map::{CityMap, LightClass, MapTile};
use super::route_network::{RouteNetwork, RoutePlan};
use super::traffic_light::{SimTrafficLight, TrafficLightController};
use super::types::{
    CarId, DestinationId, Dimensions, LightId, Position, SimId, StepReport, DEFAULT_SPAWN_INTERVAL,
};

/// Knobs for building a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Steps between corner spawn events, 0 disables corner spawning
    pub spawn_interval: u64,
    /// Seed for destination choice; `None` uses the thread RNG
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            seed: None,
        }
    }
}

/// A destination cell cars can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimDestination {
    pub id: DestinationId,
    pub position: Position,
}

/// Running totals kept across steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub cars_spawned: u64,
    pub arrived_count: u64,
    /// Cars whose planner could not reach the destination
    pub incomplete_routes: u64,
    pub stalls_on_light: u64,
    pub stalls_on_car: u64,
}

/// The main simulation world
pub struct SimWorld {
    pub grid: GridWorld,

    /// Legal moves, compiled once from the static tiles
    pub network: RouteNetwork,

    pub lights: TrafficLightController,

    /// Active cars; ids grow with spawn order so iteration is registration order
    pub cars: BTreeMap<CarId, SimCar>,

    destinations: Vec<SimDestination>,
    destination_index: HashMap<DestinationId, usize>,

    next_car_id: usize,

    step_count: u64,

    pub stats: SimStats,

    config: SimConfig,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    /// Build a world from a parsed map
    pub fn from_map(map: &CityMap, config: SimConfig) -> SimResult<Self> {
        let mut grid = GridWorld::new(map.width, map.height);
        let mut lights = TrafficLightController::new();
        let mut destinations = Vec::new();

        for (row, col, tile) in map.tiles() {
            let pos = Position::new(col as i32, (map.height - row - 1) as i32);
            let cell_number = row * map.width + col;
            match tile {
                MapTile::Road(direction) => grid.place(Occupant::Road { direction }, pos)?,
                MapTile::TrafficLight(direction, class) => {
                    let id = LightId(SimId(cell_number));
                    let light = match class {
                        LightClass::Slow => SimTrafficLight::slow(id, pos, direction),
                        LightClass::Fast => SimTrafficLight::fast(id, pos, direction),
                    };
                    lights.add(light);
                    grid.place(Occupant::TrafficLight { id, direction }, pos)?;
                }
                MapTile::Building => grid.place(Occupant::Building, pos)?,
                MapTile::Destination => {
                    let id = DestinationId(SimId(cell_number));
                    destinations.push(SimDestination { id, position: pos });
                    grid.place(Occupant::Destination(id), pos)?;
                }
                MapTile::Empty => {}
            }
        }

        let network = RouteNetwork::build(&grid);
        let destination_index = destinations
            .iter()
            .enumerate()
            .map(|(slot, destination)| (destination.id, slot))
            .collect();

        let world = Self {
            grid,
            network,
            lights,
            cars: BTreeMap::new(),
            destinations,
            destination_index,
            next_car_id: 0,
            step_count: 0,
            stats: SimStats::default(),
            config,
            rng: config.seed.map(StdRng::seed_from_u64),
        };
        world.validate()?;

        info!(
            "Built {}x{} city: {} lights, {} destinations, {} route cells, {} legal moves",
            world.grid.width(),
            world.grid.height(),
            world.lights.len(),
            world.destinations.len(),
            world.network.cell_count(),
            world.network.edge_count()
        );
        Ok(world)
    }

    /// Corner spawning needs somewhere to go and a road to start on
    fn validate(&self) -> SimResult<()> {
        if self.config.spawn_interval == 0 {
            return Ok(());
        }
        if self.destinations.is_empty() {
            return Err(SimError::Config("map has no destinations to send cars to".to_string()));
        }
        for corner in self.grid.corners() {
            if features::static_direction(&self.grid, corner).is_none() {
                return Err(SimError::Config(format!(
                    "spawn corner {} is not a road or traffic light",
                    corner
                )));
            }
        }
        Ok(())
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.grid.width(),
            height: self.grid.height(),
        }
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn arrived_count(&self) -> u64 {
        self.stats.arrived_count
    }

    pub fn destinations(&self) -> &[SimDestination] {
        &self.destinations
    }

    pub fn destination(&self, id: DestinationId) -> Option<&SimDestination> {
        self.destination_index.get(&id).map(|&slot| &self.destinations[slot])
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    fn next_car_id(&mut self) -> CarId {
        let id = CarId(SimId(self.next_car_id));
        self.next_car_id += 1;
        id
    }

    /// Place a new car at `position` heading for `destination`.
    /// The route is planned here, once, and never recomputed.
    pub fn spawn_car(&mut self, position: Position, destination: DestinationId) -> SimResult<CarId> {
        if !self.grid.in_bounds(position) {
            return Err(SimError::OutOfBounds(position));
        }
        let direction = features::static_direction(&self.grid, position).ok_or(SimError::NoDirection(position))?;
        let goal = self
            .destination(destination)
            .ok_or(SimError::UnknownDestination(destination))?
            .position;

        let RoutePlan { path, complete } = self.network.plan(position, goal);
        let id = self.next_car_id();
        if !complete {
            self.stats.incomplete_routes += 1;
            warn!(
                "{} cannot reach {} at {} from {}; driving {} cells towards it",
                id,
                destination,
                goal,
                position,
                path.len()
            );
        }

        self.grid.place(Occupant::Car(id), position)?;
        let car = SimCar::new(id, position, destination, goal, path, complete, direction);
        debug!("Spawned {} at {} for {} ({} cells)", id, position, destination, car.route.len());
        self.cars.insert(id, car);
        self.stats.cars_spawned += 1;
        Ok(id)
    }

    /// One car per corner, each with a random destination
    fn spawn_corner_cars(&mut self) -> SimResult<()> {
        let destinations = self.destinations.clone();
        for corner in self.grid.corners() {
            let Some(destination) = self.choose_random(&destinations).copied() else {
                warn!("No destinations, skipping spawn at {}", corner);
                continue;
            };
            self.spawn_car(corner, destination.id)?;
        }
        info!(
            "Step {}: spawned cars at the corners, {} active",
            self.step_count,
            self.cars.len()
        );
        Ok(())
    }

    /// Update all cars in registration order.
    /// Moves apply immediately, so later cars see earlier cars' new cells.
    fn update_cars(&mut self) -> SimResult<()> {
        let car_ids: Vec<CarId> = self.cars.keys().copied().collect();

        for car_id in car_ids {
            let car = self
                .cars
                .get_mut(&car_id)
                .ok_or_else(|| SimError::Invariant(format!("{} vanished during the step", car_id)))?;

            match car.update(&mut self.grid, &self.lights)? {
                CarUpdateResult::Moved(_) => {}
                CarUpdateResult::Stalled(StallReason::RedLight) => self.stats.stalls_on_light += 1,
                CarUpdateResult::Stalled(StallReason::CarAhead) => self.stats.stalls_on_car += 1,
                CarUpdateResult::Arrived => self.retire_car(car_id)?,
            }
        }

        Ok(())
    }

    /// Take an arrived car off the grid and count it
    fn retire_car(&mut self, car_id: CarId) -> SimResult<()> {
        let car = self
            .cars
            .remove(&car_id)
            .ok_or_else(|| SimError::Invariant(format!("{} retired twice", car_id)))?;
        self.grid.remove(Occupant::Car(car_id), car.position)?;
        self.stats.arrived_count += 1;
        info!(
            "{} arrived at {} after {} cells",
            car_id, car.position, car.cells_travelled
        );
        Ok(())
    }

    /// Main simulation tick
    pub fn tick(&mut self) -> SimResult<StepReport> {
        let toggled = self.lights.step_all(self.step_count);
        if toggled > 0 {
            debug!("Step {}: {} lights toggled", self.step_count, toggled);
        }

        if self.config.spawn_interval > 0 && self.step_count % self.config.spawn_interval == 0 {
            self.spawn_corner_cars()?;
        }

        self.update_cars()?;

        self.step_count += 1;
        Ok(StepReport {
            step_count: self.step_count,
            arrived_count: self.stats.arrived_count,
        })
    }

    /// One-paragraph summary of the world state
    pub fn summary(&self) -> String {
        let open_lights = self.lights.iter().filter(|light| light.open).count();
        format!(
            "Step: {} | Active cars: {} | Spawned: {} | Arrived: {} | Incomplete routes: {} | \
             Lights open: {}/{} | Stalls (light/car): {}/{}",
            self.step_count,
            self.cars.len(),
            self.stats.cars_spawned,
            self.stats.arrived_count,
            self.stats.incomplete_routes,
            open_lights,
            self.lights.len(),
            self.stats.stalls_on_light,
            self.stats.stalls_on_car
        )
    }

    /// Draw the city, top row first
    /// Legend: C=Car, G/X=open/closed light, arrows=road, #=building, D=destination
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.grid.width() + 1) * self.grid.height());
        for z in (0..self.grid.height() as i32).rev() {
            for x in 0..self.grid.width() as i32 {
                let pos = Position::new(x, z);
                let glyph = if self.grid.has_car(pos) {
                    'C'
                } else {
                    match features::static_tile(&self.grid, pos) {
                        StaticTile::Road(direction) => direction.arrow(),
                        StaticTile::TrafficLight(id, _) => match self.lights.get(id) {
                            Some(light) if light.open => 'G',
                            _ => 'X',
                        },
                        StaticTile::Building => '#',
                        StaticTile::Destination(_) => 'D',
                        StaticTile::Empty => '.',
                    }
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
