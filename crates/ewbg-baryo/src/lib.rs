#![deny(missing_docs)]
#![doc = "Electroweak-baryogenesis transport engine: builds the bubble-wall profile from a transition point, integrates the CP-violating chemical-potential diffusion system per fermion species and phase region, and aggregates the baryon-to-entropy ratio."]

mod eta;
mod integrate;
mod opts;
mod profile;
mod species;
mod transport;

pub use eta::{calc_eta, EtaResult, EtaStatus};
pub use integrate::{integrate_adaptive, OdeOpts, OdeSolution};
pub use opts::{CpPhases, TransportMethod, TransportOpts};
pub use profile::WallProfile;
pub use species::{coefficients, PhaseRegion, Species, TransportCoefficients};
pub use transport::{solve_species, RegionSolution, SpeciesSolution};
