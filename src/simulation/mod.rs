//! Grid-based city traffic simulation
//!
//! This module contains all the core simulation logic: the grid world, the
//! road direction rules, traffic lights, route planning, car movement and the
//! step scheduler. It runs headless and can be driven from tests or a thin
//! service layer without any rendering.

mod car;
mod error;
mod features;
mod grid;
mod map;
mod route_network;
mod service;
mod traffic_light;
mod types;
mod world;

pub use car::{CarState, CarUpdateResult, SimCar, StallReason};
pub use error::{SimError, SimResult};
pub use features::{can_transit, light_at, static_direction, static_tile, transit_targets, StaticTile};
pub use grid::{GridWorld, Occupant};
pub use map::{CityMap, LightClass, MapTile, DEMO_CITY};
pub use route_network::{RouteNetwork, RoutePlan, TransitEdge};
pub use service::{CarInfo, CityService, DynamicObjects, LightInfo, ObjectInfo, StaticObjects};
pub use traffic_light::{SimTrafficLight, TrafficLightController};
pub use types::{
    CarId, DestinationId, Dimensions, Direction, LightId, Position, SimId, StepReport,
    DEFAULT_SPAWN_INTERVAL, FAST_LIGHT_PERIOD, SLOW_LIGHT_PERIOD,
};
pub use world::{SimConfig, SimDestination, SimStats, SimWorld};
