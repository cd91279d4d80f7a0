//! A* search over pluggable state spaces.
//!
//! One engine ([`astar`]) serves every problem: a problem supplies a neighbor
//! generator and a heuristic, either as closures or by implementing
//! [`SearchProblem`]. Two problems ship with the crate: the 8-puzzle
//! ([`puzzle`]) and road maps between cities ([`route`]).

mod config;
mod error;
pub mod puzzle;
pub mod route;
pub mod search;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use puzzle::{Board, Direction, EightPuzzle};
pub use route::RouteMap;
pub use search::{
    astar, astar_with_config, solve, Cost, SearchOutcome, SearchProblem, SearchStatistics,
    Solution,
};
