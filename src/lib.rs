//! Deterministic Doom-style tic simulation.
//!
//! * [`math`]  – 16.16 fixed point, binary angles, trig tables
//! * [`world`] – level geometry, BSP point location, blockmap
//! * [`sim`]   – player movement, collision, platform thinkers, tic loop

pub mod math;
pub mod sim;
pub mod world;
