//! Pangaea — a deterministic planet and civilization simulator.
//!
//! World generation (`worldgen`) produces a planet's elevation, climate,
//! rivers, and coarse tile index from a single seed. The civilization
//! layer (`aggregate`) then drives tribes, countries, and wars across that
//! world, year by year, using the same deterministic PRNG stream.

pub mod aggregate;
pub mod core;
pub mod noise;
pub mod prng;
pub mod worldgen;

pub use core::error::{Result, SimError};
