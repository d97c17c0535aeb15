#![deny(missing_docs)]
#![doc = "Concrete potential models consumed by the EWBG engines: a single-field thermal quartic with an analytic critical temperature, and the Higgs-plus-dark-singlet portal model, plus the parameter-line registry."]

mod portal;
mod quartic;
mod registry;

pub use portal::{DarkPortalModel, PortalParams};
pub use quartic::QuarticModel;
pub use registry::{build_model, ModelId};
