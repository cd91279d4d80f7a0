//! Best-first A* search over an abstract state space.
//!
//! The engine knows nothing about the problem it is solving: callers hand it
//! a start and goal state, a neighbor generator and a heuristic. Nodes are
//! kept in an arena owned by a single search call, and each node refers to
//! its parent by index so the winning path can be walked back from the goal.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashSet},
    hash::Hash,
    time::Instant,
};

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::SearchConfig;

/// Edge and heuristic costs. Unsigned, so a negative cost cannot be built.
pub type Cost = u32;

/// Buffer for the transitions out of one state.
pub type Neighbors<S> = SmallVec<[(S, Cost); 4]>;

/// A problem the engine can search: how to move between states, and how
/// far a state probably is from the goal.
pub trait SearchProblem {
    type State: Clone + Eq + Hash;

    /// Every state reachable in one step from `state`, with the step cost.
    /// Must not depend on anything but `state`.
    fn neighbors(&self, state: &Self::State) -> Neighbors<Self::State>;

    /// Estimated remaining cost from `state` to `goal`.
    fn heuristic(&self, state: &Self::State, goal: &Self::State) -> Cost;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<S> {
    /// States from start to goal, both included.
    pub path: Vec<S>,
    /// Sum of the edge costs along `path`.
    pub cost: Cost,
}

impl<S> Solution<S> {
    /// Number of transitions taken.
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<S> {
    Found(Solution<S>),
    /// The frontier ran dry: the goal is unreachable from the start.
    NoPath,
    /// A step or time bound from [`SearchConfig`] stopped the search.
    BudgetExhausted,
}

impl<S> SearchOutcome<S> {
    pub fn solution(self) -> Option<Solution<S>> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

#[derive(Debug)]
pub struct SearchStatistics {
    /// Nodes popped and expanded
    pub expanded: usize,
    /// Child nodes pushed onto the frontier
    pub generated: usize,
    /// Frontier entries discarded because their state was already expanded
    pub stale: usize,
    /// Largest frontier size seen
    pub peak_frontier: usize,
    start_time: Instant,
    last_log_time: Instant,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self {
            expanded: 0,
            generated: 0,
            stale: 0,
            peak_frontier: 0,
            start_time: Instant::now(),
            last_log_time: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn record_frontier(&mut self, len: usize) {
        self.peak_frontier = self.peak_frontier.max(len);
    }

    fn log_if_needed(&mut self) {
        if self.last_log_time.elapsed().as_secs() > 10 {
            self.last_log_time = Instant::now();
            self.log();
        }
    }

    fn log(&self) {
        info!(
            expanded = self.expanded,
            generated = self.generated,
            stale = self.stale,
            peak_frontier = self.peak_frontier,
        );
    }

    fn finalise(&self) {
        self.log();
        info!(search_duration = self.elapsed_secs());
    }
}

struct Node<S> {
    state: S,
    g: Cost,
    h: Cost,
    parent: Option<usize>,
}

impl<S> Node<S> {
    fn f(&self) -> Cost {
        self.g.saturating_add(self.h)
    }
}

// Frontier entry: ordered by f ascending, then by insertion sequence so
// equal-f nodes come out first-in first-out.
#[derive(PartialEq, Eq)]
struct Entry {
    f: Cost,
    seq: usize,
    node: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walk the parent links from `goal` back to the root and return the states
/// in start-to-goal order.
fn reconstruct<S: Clone>(nodes: &[Node<S>], goal: usize) -> Vec<S> {
    let mut path: Vec<S> = std::iter::successors(Some(goal), |&ix| nodes[ix].parent)
        .map(|ix| nodes[ix].state.clone())
        .collect();
    path.reverse();
    path
}

/// Find a path from `start` to `goal`.
///
/// `neighbors` yields `(state, edge_cost)` pairs and `heuristic` estimates
/// the remaining cost to `goal`. With an admissible, consistent heuristic
/// the returned path is a cheapest one.
pub fn astar<S, FN, IN, FH>(start: &S, goal: &S, neighbors: FN, heuristic: FH) -> SearchOutcome<S>
where
    S: Clone + Eq + Hash,
    FN: FnMut(&S) -> IN,
    IN: IntoIterator<Item = (S, Cost)>,
    FH: FnMut(&S, &S) -> Cost,
{
    astar_with_config(start, goal, neighbors, heuristic, &SearchConfig::default()).0
}

/// [`astar`] with an optional step/time budget, also returning statistics.
pub fn astar_with_config<S, FN, IN, FH>(
    start: &S,
    goal: &S,
    mut neighbors: FN,
    mut heuristic: FH,
    config: &SearchConfig,
) -> (SearchOutcome<S>, SearchStatistics)
where
    S: Clone + Eq + Hash,
    FN: FnMut(&S) -> IN,
    IN: IntoIterator<Item = (S, Cost)>,
    FH: FnMut(&S, &S) -> Cost,
{
    info!(
        max_expansions = config.max_expansions,
        time_limit_secs = config.time_limit().map(|d| d.as_secs_f64()),
        "starting search"
    );
    let mut statistics = SearchStatistics::new();
    let time_limit = config.time_limit();

    let mut nodes = vec![Node {
        state: start.clone(),
        g: 0,
        h: heuristic(start, goal),
        parent: None,
    }];
    let mut frontier = BinaryHeap::new();
    frontier.push(Entry {
        f: nodes[0].f(),
        seq: 0,
        node: 0,
    });
    let mut explored: HashSet<S> = HashSet::new();

    let outcome = loop {
        let Some(current) = frontier.pop() else {
            break SearchOutcome::NoPath;
        };

        if explored.contains(&nodes[current.node].state) {
            statistics.stale += 1;
            continue;
        }

        let current_ix = current.node;
        if nodes[current_ix].state == *goal {
            statistics.expanded += 1;
            let cost = nodes[current_ix].g;
            break SearchOutcome::Found(Solution {
                path: reconstruct(&nodes, current_ix),
                cost,
            });
        }

        // the budget limits expansions; reaching the goal is always reported
        if config
            .max_expansions
            .map_or(false, |max| statistics.expanded >= max)
            || time_limit.map_or(false, |limit| statistics.start_time.elapsed() >= limit)
        {
            warn!(expanded = statistics.expanded, "search budget exhausted");
            break SearchOutcome::BudgetExhausted;
        }

        explored.insert(nodes[current_ix].state.clone());
        statistics.expanded += 1;

        let current_g = nodes[current_ix].g;
        for (next, edge_cost) in neighbors(&nodes[current_ix].state) {
            if explored.contains(&next) {
                continue;
            }

            let h = heuristic(&next, goal);
            let child = Node {
                state: next,
                g: current_g.saturating_add(edge_cost),
                h,
                parent: Some(current_ix),
            };
            let entry = Entry {
                f: child.f(),
                seq: nodes.len(),
                node: nodes.len(),
            };
            nodes.push(child);
            frontier.push(entry);
            statistics.generated += 1;
        }

        statistics.record_frontier(frontier.len());
        statistics.log_if_needed();
    };

    match &outcome {
        SearchOutcome::Found(solution) => {
            debug!(moves = solution.moves(), cost = solution.cost, "goal reached")
        }
        SearchOutcome::NoPath => debug!("frontier exhausted without reaching goal"),
        SearchOutcome::BudgetExhausted => {}
    }
    statistics.finalise();

    (outcome, statistics)
}

/// Search `problem` from `start` to `goal` with the problem's own neighbor
/// generator and heuristic.
pub fn solve<P: SearchProblem>(
    problem: &P,
    start: &P::State,
    goal: &P::State,
    config: &SearchConfig,
) -> (SearchOutcome<P::State>, SearchStatistics) {
    astar_with_config(
        start,
        goal,
        |state| problem.neighbors(state),
        |state, goal| problem.heuristic(state, goal),
        config,
    )
}
