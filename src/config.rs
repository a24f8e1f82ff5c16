//! MCTS configuration parameters.

use std::time::Duration;

/// Initial capacity of the node arena.
pub const DEFAULT_NODE_CAPACITY: usize = 10_000;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock budget of a timed search. Checked between iterations only, so a search
    /// may overrun it by the cost of one iteration.
    pub time_limit: Duration,

    /// Exploration constant `C` of the UCT formula `w/n + C * sqrt(ln(N) / n)`.
    pub exploration_constant: f64,

    /// Random playouts run from each simulated node.
    pub rollouts_per_simulation: u32,

    /// Nodes preallocated in the tree arena.
    pub node_capacity: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_millis(1000),
            exploration_constant: std::f64::consts::SQRT_2,
            rollouts_per_simulation: 1,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }
}

impl MctsConfig {
    /// A short budget with a small arena, for tests.
    pub fn for_testing() -> Self {
        Self {
            time_limit: Duration::from_millis(50),
            node_capacity: 1024,
            ..Self::default()
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_time_limit_millis(self, millis: u64) -> Self {
        self.with_time_limit(Duration::from_millis(millis))
    }

    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// At least one playout is always run.
    pub fn with_rollouts_per_simulation(mut self, runs: u32) -> Self {
        self.rollouts_per_simulation = runs.max(1);
        self
    }

    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }
}
