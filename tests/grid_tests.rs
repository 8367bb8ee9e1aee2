//! Grid, map and direction rule tests

use city_traffic::simulation::{
    can_transit, static_tile, transit_targets, CarId, CityMap, Direction, GridWorld, LightClass,
    MapTile, Occupant, Position, SimConfig, SimError, SimId, SimWorld, StaticTile, DEMO_CITY,
};

fn manual_world(text: &str) -> SimWorld {
    let map = CityMap::parse(text).expect("map should parse");
    SimWorld::from_map(
        &map,
        SimConfig {
            spawn_interval: 0,
            seed: Some(1),
        },
    )
    .expect("world should build")
}

#[test]
fn test_neighbors_are_clipped_at_edges() {
    let grid = GridWorld::new(3, 3);

    assert_eq!(grid.neighbors(Position::new(0, 0)).len(), 3);
    assert_eq!(grid.neighbors(Position::new(1, 0)).len(), 5);
    assert_eq!(grid.neighbors(Position::new(1, 1)).len(), 8);
    assert_eq!(grid.neighbors(Position::new(2, 2)).len(), 3);
    assert!(!grid.neighbors(Position::new(1, 1)).contains(&Position::new(1, 1)));
}

#[test]
fn test_place_move_remove() {
    let mut grid = GridWorld::new(3, 3);
    let car = Occupant::Car(CarId(SimId(0)));
    let start = Position::new(0, 0);
    let next = start.offset(Direction::Right);

    grid.place(Occupant::Road { direction: Direction::Right }, start).unwrap();
    grid.place(car, start).unwrap();
    assert_eq!(grid.occupants_at(start).len(), 2);
    assert!(grid.has_car(start));

    grid.move_occupant(car, start, next).unwrap();
    assert!(!grid.has_car(start));
    assert!(grid.has_car(next));
    assert_eq!(grid.occupants_at(start).len(), 1);

    grid.remove(car, next).unwrap();
    assert!(grid.occupants_at(next).is_empty());
}

#[test]
fn test_out_of_bounds_move_leaves_grid_untouched() {
    let mut grid = GridWorld::new(2, 2);
    let car = Occupant::Car(CarId(SimId(3)));
    grid.place(car, Position::new(1, 1)).unwrap();

    let result = grid.move_occupant(car, Position::new(1, 1), Position::new(2, 1));
    assert!(matches!(result, Err(SimError::OutOfBounds(_))));
    assert!(grid.has_car(Position::new(1, 1)));
}

#[test]
fn test_removing_missing_occupant_is_invariant_error() {
    let mut grid = GridWorld::new(2, 2);
    let result = grid.remove(Occupant::Car(CarId(SimId(0))), Position::new(0, 0));
    assert!(matches!(result, Err(SimError::Invariant(_))));
}

#[test]
fn test_map_symbols_and_orientation() {
    let map = CityMap::parse("<R#\nDa.\n").unwrap();
    assert_eq!(map.width, 3);
    assert_eq!(map.height, 2);

    let tiles: Vec<_> = map.tiles().collect();
    assert_eq!(tiles[0], (0, 0, MapTile::Road(Direction::Left)));
    assert_eq!(tiles[1], (0, 1, MapTile::TrafficLight(Direction::Right, LightClass::Slow)));
    assert_eq!(tiles[2], (0, 2, MapTile::Building));
    assert_eq!(tiles[3], (1, 0, MapTile::Destination));
    assert_eq!(tiles[4], (1, 1, MapTile::TrafficLight(Direction::Down, LightClass::Fast)));
    assert_eq!(tiles[5], (1, 2, MapTile::Empty));

    // Top text row is the highest z
    let world = manual_world("<R#\nDa.\n");
    assert_eq!(static_tile(&world.grid, Position::new(0, 1)), StaticTile::Road(Direction::Left));
    assert_eq!(static_tile(&world.grid, Position::new(2, 1)), StaticTile::Building);
    assert!(matches!(
        static_tile(&world.grid, Position::new(0, 0)),
        StaticTile::Destination(_)
    ));
    assert_eq!(static_tile(&world.grid, Position::new(2, 0)), StaticTile::Empty);
}

#[test]
fn test_map_ids_follow_cell_numbers() {
    let world = manual_world("<R#\nDa.\n");
    let destination = world.destinations()[0];
    assert_eq!(destination.id.to_string(), "d_3");

    let mut light_ids: Vec<String> = world.lights.iter().map(|light| light.id.to_string()).collect();
    light_ids.sort();
    assert_eq!(light_ids, vec!["tl_1", "tl_4"]);
}

#[test]
fn test_ragged_map_is_rejected() {
    let result = CityMap::parse(">>>\n>>\n");
    match result {
        Err(SimError::Map { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a map error, got {:?}", other),
    }
}

#[test]
fn test_empty_map_is_rejected() {
    assert!(matches!(CityMap::parse("\n\n"), Err(SimError::Map { .. })));
}

#[test]
fn test_demo_city_parses() {
    let map = CityMap::parse(DEMO_CITY).unwrap();
    assert_eq!(map.width, 10);
    assert_eq!(map.height, 10);
}

#[test]
fn test_no_u_turns() {
    let here = Position::new(1, 1);
    assert!(!can_transit(Direction::Up, here, Position::new(1, 2), Direction::Down));
    assert!(!can_transit(Direction::Down, here, Position::new(1, 0), Direction::Up));
    assert!(!can_transit(Direction::Right, here, Position::new(2, 1), Direction::Left));
    assert!(!can_transit(Direction::Left, here, Position::new(0, 1), Direction::Right));
}

#[test]
fn test_straight_and_turns() {
    let here = Position::new(1, 1);

    assert!(can_transit(Direction::Up, here, Position::new(1, 2), Direction::Up));
    assert!(can_transit(Direction::Up, here, Position::new(0, 2), Direction::Left));
    assert!(can_transit(Direction::Up, here, Position::new(2, 2), Direction::Right));
    assert!(!can_transit(Direction::Up, here, Position::new(1, 0), Direction::Up));

    assert!(can_transit(Direction::Right, here, Position::new(2, 1), Direction::Right));
    assert!(can_transit(Direction::Right, here, Position::new(2, 2), Direction::Up));
    assert!(can_transit(Direction::Right, here, Position::new(2, 0), Direction::Down));
    assert!(!can_transit(Direction::Right, here, Position::new(0, 2), Direction::Up));

    assert!(can_transit(Direction::Left, here, Position::new(0, 1), Direction::Left));
    assert!(!can_transit(Direction::Left, here, Position::new(1, 2), Direction::Up));
}

#[test]
fn test_down_requires_moving_down() {
    let here = Position::new(1, 1);
    assert!(can_transit(Direction::Down, here, Position::new(1, 0), Direction::Down));
    assert!(can_transit(Direction::Down, here, Position::new(2, 0), Direction::Right));
    // Same row is never legal when heading down
    assert!(!can_transit(Direction::Down, here, Position::new(2, 1), Direction::Right));
    assert!(!can_transit(Direction::Down, here, Position::new(0, 1), Direction::Left));
}

#[test]
fn test_own_destination_overrides_direction_rules() {
    let world = manual_world("##D\n>^#\n");
    let from = Position::new(1, 0);
    let goal = Position::new(2, 1);

    assert!(transit_targets(&world.grid, from, Some(goal)).contains(&goal));
    assert!(!transit_targets(&world.grid, from, None).contains(&goal));
}

#[test]
fn test_buildings_and_empty_cells_are_never_targets() {
    let world = manual_world("#^.\n>>>\n");
    let targets = transit_targets(&world.grid, Position::new(0, 0), None);

    assert!(!targets.contains(&Position::new(0, 1)));
    assert!(targets.contains(&Position::new(1, 1)));
    assert!(targets.contains(&Position::new(1, 0)));

    let targets = transit_targets(&world.grid, Position::new(1, 0), None);
    assert!(!targets.contains(&Position::new(2, 1)));
}

#[test]
fn test_cell_without_direction_has_no_targets() {
    let world = manual_world(">D\n");
    assert!(transit_targets(&world.grid, Position::new(1, 0), Some(Position::new(0, 0))).is_empty());
}
