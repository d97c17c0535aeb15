#![deny(missing_docs)]
#![doc = "Core traits and data types shared by the EWBG engines: field points, the potential-model seam, structured errors and the deterministic RNG policy."]

pub mod errors;
pub mod potential;
pub mod rng;
mod types;

pub use errors::{ErrorInfo, EwbgError};
pub use potential::PotentialModel;
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{FieldPoint, SmConstants};
