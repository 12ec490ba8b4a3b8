//! Repository modules for each entity.
//!
//! Each module adds methods to `LoadDevService` via `impl LoadDevService` blocks.

mod component;
mod group;
mod load;
mod rifle;
mod shot;
