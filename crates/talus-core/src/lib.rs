//! Numeric engine for synthetic terrain: deterministic layered value noise,
//! corner-aligned bilinear upscaling, and particle-based hydraulic erosion
//! over a shared height-field primitive.
//!
//! Raster export and any interactive front-end live outside this crate;
//! callers consume the finished [`HeightField`].

pub mod erosion;
pub mod generator;
pub mod heightfield;
pub mod noise;
pub mod upscale;

pub use erosion::{simulate, simulate_seeded, ErosionParams};
pub use generator::{TerrainGenerator, TerrainParams};
pub use heightfield::{FieldError, HeightField};
pub use noise::{generate, lattice_noise, NoiseParams};
pub use upscale::scale;
