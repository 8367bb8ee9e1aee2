//! City Traffic Simulation Library
//!
//! Cars spawn at the corners of a grid city, follow one-way roads and traffic
//! lights towards random destinations, and retire on arrival.

pub mod simulation;
