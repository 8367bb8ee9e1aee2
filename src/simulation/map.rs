//! City map loading
//!
//! Maps are plain text, one character per cell, top row first:
//!
//! | Symbol              | Tile                                   |
//! |---------------------|----------------------------------------|
//! | `>` `<` `^` `v`     | road facing Right / Left / Up / Down   |
//! | `R` `L` `U` `A`     | slow traffic light, same directions    |
//! | `r` `l` `u` `a`     | fast traffic light, same directions    |
//! | `#`                 | building                               |
//! | `D`                 | destination                            |
//! | anything else       | empty                                  |

use std::path::Path;

use super::error::{SimError, SimResult};
use super::types::Direction;

/// Built-in city used when no map file is given
pub const DEMO_CITY: &str = include_str!("../../maps/demo_city.txt");

/// Traffic light timing class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightClass {
    Slow,
    Fast,
}

/// One parsed map symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    Road(Direction),
    TrafficLight(Direction, LightClass),
    Building,
    Destination,
    Empty,
}

impl MapTile {
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            '>' => MapTile::Road(Direction::Right),
            '<' => MapTile::Road(Direction::Left),
            '^' => MapTile::Road(Direction::Up),
            'v' => MapTile::Road(Direction::Down),
            'R' => MapTile::TrafficLight(Direction::Right, LightClass::Slow),
            'L' => MapTile::TrafficLight(Direction::Left, LightClass::Slow),
            'U' => MapTile::TrafficLight(Direction::Up, LightClass::Slow),
            'A' => MapTile::TrafficLight(Direction::Down, LightClass::Slow),
            'r' => MapTile::TrafficLight(Direction::Right, LightClass::Fast),
            'l' => MapTile::TrafficLight(Direction::Left, LightClass::Fast),
            'u' => MapTile::TrafficLight(Direction::Up, LightClass::Fast),
            'a' => MapTile::TrafficLight(Direction::Down, LightClass::Fast),
            '#' => MapTile::Building,
            'D' => MapTile::Destination,
            _ => MapTile::Empty,
        }
    }
}

/// A parsed city map, rows stored top row first as in the file
#[derive(Debug, Clone, PartialEq)]
pub struct CityMap {
    pub width: usize,
    pub height: usize,
    rows: Vec<Vec<MapTile>>,
}

impl CityMap {
    pub fn parse(text: &str) -> SimResult<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();

        let width = match lines.first() {
            Some(first) => first.chars().count(),
            None => {
                return Err(SimError::Map {
                    line: 1,
                    reason: "map is empty".to_string(),
                })
            }
        };

        let mut rows = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let tiles: Vec<MapTile> = line.chars().map(MapTile::from_symbol).collect();
            if tiles.len() != width {
                return Err(SimError::Map {
                    line: row + 1,
                    reason: format!("expected {} columns, found {}", width, tiles.len()),
                });
            }
            rows.push(tiles);
        }

        Ok(Self {
            width,
            height: rows.len(),
            rows,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn demo() -> SimResult<Self> {
        Self::parse(DEMO_CITY)
    }

    /// Tiles as `(row, column, tile)`, top row first
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, MapTile)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, tiles)| tiles.iter().enumerate().map(move |(col, tile)| (row, col, *tile)))
    }
}
