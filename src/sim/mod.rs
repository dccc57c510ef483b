//! Particle simulation
//!
//! Pure state: pools, per-entity kinematics and spawning. No drawing or
//! platform dependencies. Randomness always comes from a caller-supplied RNG.

pub mod burst;
pub mod pool;
pub mod smoke;
pub mod spark;

pub use burst::{sample_disk, spawn_smoke, spawn_sparks};
pub use pool::{Pool, PoolEntity};
pub use smoke::{Smoke, SmokePool};
pub use spark::{Spark, SparkPool};
