//! Zoning optimization engine: partitions a rectangular grid of
//! continuous measurements into a fixed number of zones so that each
//! zone is internally as homogeneous as possible.
//!
//! The objective is the sum of within-zone population variances, with a
//! large penalty per zone whose variance exceeds a homogeneity
//! threshold. Optimization is first-improvement hill climbing over
//! single-cell reassignments, repeated from independent random starting
//! points (multi-start) keeping the best local optimum. A heuristic:
//! neither global optimality nor spatial contiguity of zones is
//! guaranteed.

pub mod common;
pub mod cost;
pub mod multistart;
pub mod search;

pub use common::{random_solution, Instance, Solution, ZoningError};
pub use cost::{evaluate, PENALTY_WEIGHT};
pub use multistart::{solve, SolveReport, SolverConfig};
pub use search::local_search;
