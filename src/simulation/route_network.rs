//! Route network graph for pathfinding
//!
//! The direction rules only depend on static tiles, so the legal moves of the
//! whole city are compiled once into a petgraph directed graph. Edges into
//! destination cells are kept apart: a car may only take the one leading to
//! its own destination.

use ordered_float::OrderedFloat;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::features::{self, StaticTile};
use super::grid::GridWorld;
use super::types::Position;

/// Edge data for the route network graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitEdge {
    /// Legal under the direction rules
    Road,
    /// Into a destination cell, only usable when it is the goal
    Destination,
}

/// Result of a route search
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Cells to drive through, excluding the start
    pub path: Vec<Position>,
    /// False when the goal could not be reached and `path` ends short of it
    pub complete: bool,
}

/// Directed graph of every legal single-cell move in the city
#[derive(Debug, Default)]
pub struct RouteNetwork {
    graph: DiGraph<Position, TransitEdge>,

    /// Maps cell positions to their node indices in the graph
    cell_to_node: HashMap<Position, NodeIndex>,
}

impl RouteNetwork {
    /// Compile the legal moves of `grid`
    pub fn build(grid: &GridWorld) -> Self {
        let mut network = Self::default();

        for pos in grid.positions() {
            match features::static_tile(grid, pos) {
                StaticTile::Road(_) | StaticTile::TrafficLight(..) | StaticTile::Destination(_) => {
                    network.add_cell(pos);
                }
                StaticTile::Building | StaticTile::Empty => {}
            }
        }

        for pos in grid.positions() {
            if features::static_direction(grid, pos).is_none() {
                continue;
            }
            let from = network.cell_to_node[&pos];

            for neighbor in features::transit_targets(grid, pos, None) {
                let to = network.cell_to_node[&neighbor];
                network.graph.add_edge(from, to, TransitEdge::Road);
            }

            for neighbor in grid.neighbors(pos) {
                if let StaticTile::Destination(_) = features::static_tile(grid, neighbor) {
                    let to = network.cell_to_node[&neighbor];
                    network.graph.add_edge(from, to, TransitEdge::Destination);
                }
            }
        }

        network
    }

    fn add_cell(&mut self, pos: Position) {
        let node = self.graph.add_node(pos);
        self.cell_to_node.insert(pos, node);
    }

    pub fn cell_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Cells reachable in one move from `pos` by a car heading to `goal`
    pub fn successors(&self, pos: Position, goal: Position) -> Vec<Position> {
        let Some(&node) = self.cell_to_node.get(&pos) else {
            return Vec::new();
        };

        self.graph
            .edges(node)
            .filter_map(|edge| {
                let target = self.graph[edge.target()];
                match edge.weight() {
                    TransitEdge::Road => Some(target),
                    TransitEdge::Destination if target == goal => Some(target),
                    TransitEdge::Destination => None,
                }
            })
            .collect()
    }

    /// A* search from `start` to `goal` with unit step cost and a Euclidean heuristic.
    ///
    /// When the frontier runs dry the plan leads to the explored cell closest
    /// to the goal and is flagged incomplete.
    pub fn plan(&self, start: Position, goal: Position) -> RoutePlan {
        let mut frontier = BinaryHeap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut cost_so_far: HashMap<Position, u32> = HashMap::new();

        frontier.push(Reverse((OrderedFloat(0.0), start)));
        cost_so_far.insert(start, 0);

        while let Some(Reverse((_, current))) = frontier.pop() {
            if current == goal {
                return RoutePlan {
                    path: reconstruct_path(&came_from, start, goal),
                    complete: true,
                };
            }

            let current_cost = cost_so_far[&current];
            for next in self.successors(current, goal) {
                let new_cost = current_cost + 1;
                let improved = match cost_so_far.get(&next) {
                    Some(&cost) => new_cost < cost,
                    None => true,
                };
                if improved {
                    cost_so_far.insert(next, new_cost);
                    let priority = f64::from(new_cost) + next.distance(&goal);
                    frontier.push(Reverse((OrderedFloat(priority), next)));
                    came_from.insert(next, current);
                }
            }
        }

        // Goal never reached: settle for the closest cell we got to
        let closest = cost_so_far
            .iter()
            .min_by_key(|&(pos, cost)| (OrderedFloat(pos.distance(&goal)), *cost, *pos))
            .map(|(pos, _)| *pos)
            .unwrap_or(start);

        RoutePlan {
            path: reconstruct_path(&came_from, start, closest),
            complete: false,
        }
    }
}

/// Walk the predecessor map back from `end` and reverse it
fn reconstruct_path(came_from: &HashMap<Position, Position>, start: Position, end: Position) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = end;
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(previous) => current = *previous,
            None => break,
        }
    }
    path.reverse();
    path
}
