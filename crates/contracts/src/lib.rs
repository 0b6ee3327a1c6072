//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Value Model
//! - Samples and emitted results range over a closed set of kinds: int, double, bool, text
//! - Emission timestamps are wall-clock UTC (`chrono::DateTime<Utc>`)

mod blueprint;
mod error;
mod record;
mod sensor_id;
mod sink;
mod value;

pub use blueprint::*;
pub use error::*;
pub use record::*;
pub use sensor_id::SensorId;
pub use sink::*;
pub use value::*;
