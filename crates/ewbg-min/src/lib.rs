#![deny(missing_docs)]
#![doc = "Multi-backend minimizer for effective potentials: a gradient-based local refiner, a derivative-free simplex and an evolutionary global search, cross-validated by a multi-start driver."]

mod backend;
mod evolve;
mod gradient;
mod minimize;
mod result;
mod simplex;

pub use backend::{LocalBackend, MinimizeOpts};
pub use evolve::EvolutionBackend;
pub use gradient::GradientDescentBackend;
pub use minimize::{find_minimum, perturbed_start};
pub use result::{smallest_eigenvalue, MinimizationResult, MinimizeStatus};
pub use simplex::SimplexBackend;
