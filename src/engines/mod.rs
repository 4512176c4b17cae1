pub mod decoding;
pub mod encoding;
pub mod metrics;
pub mod proxy;
pub mod reconcile;
pub mod returns;
pub mod solver;

pub use decoding::SolutionDecoder;
pub use encoding::{QuboEncoder, QuboProblem, VarId};
pub use metrics::MetricsEngine;
pub use proxy::ProxyWeightGenerator;
pub use reconcile::{OptimizeRequest, ReconciliationEngine};
pub use returns::ReturnsModel;
pub use solver::{ExactSolver, QuboSolver, SamplingSolver, SolveFailure, SolverSolution};
