use crate::config::MctsConfig;
use crate::game::{Game, GameError};
use crate::mcts_node::{MctsNode, uct_value};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::rollout::{RolloutResult, roll_out};
use ego_tree::{NodeId, NodeRef, Tree};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// Summary of a timed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStats {
    /// Iterations run by this call.
    pub iterations: u64,
    pub elapsed: Duration,
    pub root_visits: u32,
    pub root_wins: f64,
    /// Whether the search stopped because nothing was left to explore.
    pub exhausted: bool,
}

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It holds the search tree, the random number generator, and the configuration for the search.
/// Nodes live in an arena owned by the tree and are addressed by [`NodeId`]; children are stored
/// in the order of the parent's `get_available_moves()`.
pub struct MonteCarloTreeSearch<T: Game, K: RandomGenerator> {
    tree: Tree<MctsNode<T>>,
    random: K,
    config: MctsConfig,
    iterations: u64,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
///
/// This provides a convenient way to configure the MCTS search with different parameters.
pub struct MonteCarloTreeSearchBuilder<T: Game, K: RandomGenerator> {
    game: T,
    random_generator: K,
    config: MctsConfig,
}

impl<T: Game, K: RandomGenerator> MonteCarloTreeSearchBuilder<T, K> {
    /// Creates a new builder with the given initial game state.
    pub fn new(game: T) -> Self {
        Self {
            game,
            random_generator: K::default(),
            config: MctsConfig::default(),
        }
    }

    /// Sets the random number generator used by playouts.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.config = self.config.with_time_limit(time_limit);
        self
    }

    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.config = self.config.with_exploration_constant(c);
        self
    }

    pub fn with_rollouts_per_simulation(mut self, runs: u32) -> Self {
        self.config = self.config.with_rollouts_per_simulation(runs);
        self
    }

    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_node_capacity(capacity);
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<T, K> {
        MonteCarloTreeSearch::new(self.game, self.random_generator, self.config)
    }
}

impl<T: Game, K: RandomGenerator> MonteCarloTreeSearch<T, K> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(game: T) -> MonteCarloTreeSearchBuilder<T, K> {
        MonteCarloTreeSearchBuilder::new(game)
    }

    /// Creates a new `MonteCarloTreeSearch` instance rooted at `game`.
    ///
    /// It is recommended to use the builder pattern via `MonteCarloTreeSearch::builder()` instead.
    /// A configuration asking for zero playouts still runs one per simulation.
    pub fn new(game: T, rg: K, config: MctsConfig) -> Self {
        let runs = config.rollouts_per_simulation;
        let config = config.with_rollouts_per_simulation(runs);
        let tree = Tree::with_capacity(MctsNode::new_root(game), config.node_capacity);
        Self {
            tree,
            random: rg,
            config,
            iterations: 0,
        }
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns a reference to the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.tree.root()
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Total number of iterations run on this tree.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Runs a timed search with the configured time limit and returns the best move found.
    pub fn search(&mut self) -> Result<T::Move, SearchError> {
        if self.tree.root().value().is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }
        self.evaluate_with_time_limit(self.config.time_limit)?;
        self.best_move()
    }

    /// Runs iterations until `time_limit` has elapsed or the tree is exhausted.
    ///
    /// The clock is only checked between iterations, and at least one iteration always runs.
    pub fn evaluate_with_time_limit(
        &mut self,
        time_limit: Duration,
    ) -> Result<SearchStats, SearchError> {
        let start = Instant::now();
        let first_iteration = self.iterations;
        let exhausted = loop {
            let exhausted = self.iterate_once()?;
            if exhausted || start.elapsed() >= time_limit {
                break exhausted;
            }
        };

        let root = self.tree.root().value();
        let stats = SearchStats {
            iterations: self.iterations - first_iteration,
            elapsed: start.elapsed(),
            root_visits: root.visits,
            root_wins: root.wins,
            exhausted,
        };
        debug!(
            elapsed_ms = stats.elapsed.as_millis() as u64,
            iterations = stats.iterations,
            root_wins = stats.root_wins,
            root_visits = stats.root_visits,
            exhausted,
            "Stopped search"
        );
        Ok(stats)
    }

    /// Runs the MCTS search for at most `n` iterations, stopping early once the tree is exhausted.
    pub fn iterate_n_times(&mut self, n: u32) -> Result<bool, SearchError> {
        for _ in 0..n {
            if self.iterate_once()? {
                return Ok(true);
            }
        }
        Ok(self.tree.root().value().is_fully_calculated)
    }

    /// Performs one full iteration of the MCTS algorithm (Selection, Expansion, Simulation, Backpropagation).
    ///
    /// Returns `true` once every line of play from the root has been explored to its end.
    pub fn iterate_once(&mut self) -> Result<bool, SearchError> {
        if self.tree.root().value().is_fully_calculated {
            return Ok(true);
        }

        let mut path = self.select();
        let leaf_id = path.last().copied().unwrap_or_else(|| self.tree.root().id());
        let simulated_id = match self.expand(leaf_id)? {
            Some(child_id) => {
                path.push(child_id);
                child_id
            }
            None => leaf_id,
        };

        let result = self.simulate(simulated_id)?;
        self.backpropagate(&path, &result);
        self.iterations += 1;

        trace!(
            iteration = self.iterations,
            path_len = path.len(),
            simulations = result.simulations(),
            "MCTS iteration complete"
        );

        Ok(self.tree.root().value().is_fully_calculated)
    }

    /// Returns the child of the root node with the best win rate for the player to move at the root.
    ///
    /// Unvisited children are only picked when no child has been visited; ties go to the
    /// earliest child.
    pub fn get_most_perspective_move(&self) -> Option<NodeRef<'_, MctsNode<T>>> {
        let root = self.tree.root();
        let first = root.first_child()?;
        if first.next_sibling().is_none() {
            return Some(first);
        }

        let mut best_node = None;
        let mut max_win_rate = f64::NEG_INFINITY;
        for child in root.children() {
            let node = child.value();
            if node.visits == 0 {
                continue;
            }
            let win_rate = node.wins_rate();
            if best_node.is_none() || win_rate > max_win_rate {
                max_win_rate = win_rate;
                best_node = Some(child);
            }
        }

        best_node.or(Some(first))
    }

    /// The move leading to [`get_most_perspective_move`](Self::get_most_perspective_move).
    pub fn best_move(&self) -> Result<T::Move, SearchError> {
        let best = self
            .get_most_perspective_move()
            .and_then(|node| node.value().prev_move.clone())
            .ok_or(SearchError::NoLegalMoves)?;
        debug!(
            best_move = %self.tree.root().value().game.describe_move(&best),
            "Selected best move"
        );
        Ok(best)
    }

    /// One line per root child: `move : score (wins/visits)`.
    pub fn stats(&self) -> String {
        let root = self.tree.root();
        let game = &root.value().game;
        let mut text = format!("MCTS with {} evals\n", self.iterations);
        for child in root.children() {
            let node = child.value();
            let name = node
                .prev_move
                .as_ref()
                .map(|m| game.describe_move(m))
                .unwrap_or_default();
            text.push_str(&format!(
                "{} : {:.4} ({}/{})\n",
                name,
                node.wins_rate(),
                node.wins,
                node.visits
            ));
        }
        text
    }

    /// Walks down from the root through expanded nodes, following the best UCT child.
    /// Returns the visited path, root first.
    fn select(&self) -> Vec<NodeId> {
        let mut node = self.tree.root();
        let mut path = vec![node.id()];
        while node.has_children() {
            match self.select_child(node) {
                Some(child) => {
                    path.push(child.id());
                    node = child;
                }
                None => break,
            }
        }
        path
    }

    /// Child with the highest UCT score, skipping children whose subtree is fully explored.
    fn select_child<'a>(
        &self,
        node: NodeRef<'a, MctsNode<T>>,
    ) -> Option<NodeRef<'a, MctsNode<T>>> {
        let mut best_child = None;
        let mut max_uct = f64::NEG_INFINITY;
        for child in node.children() {
            let data = child.value();
            if data.is_fully_calculated {
                continue;
            }

            let uct = uct_value(
                self.iterations,
                data.wins,
                data.visits,
                self.config.exploration_constant,
            );
            if best_child.is_none() || uct > max_uct {
                max_uct = uct;
                best_child = Some(child);
            }
        }
        best_child
    }

    /// Creates one child per legal move of the leaf and returns the first one.
    ///
    /// Terminal leaves are never expanded, and a leaf that has not been simulated yet (other
    /// than the root) is simulated as is first.
    fn expand(&mut self, leaf_id: NodeId) -> Result<Option<NodeId>, SearchError> {
        let Some(leaf) = self.tree.get(leaf_id) else {
            return Ok(None);
        };
        let node = leaf.value();
        if node.is_terminal() || leaf.has_children() {
            return Ok(None);
        }
        if node.visits == 0 && leaf_id != self.tree.root().id() {
            return Ok(None);
        }

        let chooser = node.current_player;
        let height = node.height + 1;
        let mut children = Vec::new();
        for possible_move in node.game.get_available_moves() {
            let mut game = node.game.clone();
            game.perform_move(&possible_move)?;
            children.push(MctsNode::new_child(game, possible_move, chooser, height));
        }

        let Some(mut leaf) = self.tree.get_mut(leaf_id) else {
            return Ok(None);
        };
        let mut first_child = None;
        for child in children {
            let child_id = leaf.append(child).id();
            first_child.get_or_insert(child_id);
        }
        Ok(first_child)
    }

    /// Runs the configured number of random playouts from a node.
    fn simulate(&mut self, node_id: NodeId) -> Result<RolloutResult, SearchError> {
        let Some(node) = self.tree.get(node_id) else {
            return Ok(RolloutResult::new());
        };
        let result = roll_out(
            &node.value().game,
            self.config.rollouts_per_simulation,
            &mut self.random,
        )?;
        Ok(result)
    }

    /// Folds a rollout result into every node of the path, leaf first.
    ///
    /// Each node is credited with the wins of the player who chose the move into it.
    fn backpropagate(&mut self, path: &[NodeId], result: &RolloutResult) {
        for &node_id in path.iter().rev() {
            let is_fully_calculated = self.is_fully_calculated(node_id);
            if let Some(mut node) = self.tree.get_mut(node_id) {
                let mcts_node = node.value();
                mcts_node.visits += result.simulations();
                mcts_node.wins += result.wins(mcts_node.credited_player);
                if is_fully_calculated {
                    mcts_node.is_fully_calculated = true;
                }
            }
        }
    }

    /// A node is fully calculated when it is terminal, or expanded with every child fully calculated.
    fn is_fully_calculated(&self, node_id: NodeId) -> bool {
        let Some(node) = self.tree.get(node_id) else {
            return false;
        };
        let data = node.value();
        if data.is_fully_calculated || data.is_terminal() {
            return true;
        }

        node.has_children()
            && node
                .children()
                .all(|child| child.value().is_fully_calculated)
    }
}

impl<T: Game> MonteCarloTreeSearch<T, StandardRandomGenerator> {
    /// A search over `game` with the default configuration and the thread-local generator.
    pub fn from_game(game: T) -> Self {
        MonteCarloTreeSearchBuilder::new(game).build()
    }
}

/// Searches `game` for `time_limit` and returns the best move found.
///
/// A zero time limit still completes one iteration.
pub fn search<T: Game>(game: &T, time_limit: Duration) -> Result<T::Move, SearchError> {
    MonteCarloTreeSearch::<T, StandardRandomGenerator>::builder(game.clone())
        .with_time_limit(time_limit)
        .build()
        .search()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameOutcome, Player};
    use crate::games::draughts::EnglishDraughts;
    use crate::games::draughts::checker_board::{CheckerBoard, Piece};
    use crate::random::SeededRandomGenerator;

    /// Take one or two stones; whoever takes the last stone wins.
    #[derive(Debug, Clone)]
    struct Nim {
        stones: u32,
        player: Player,
    }

    impl Game for Nim {
        type Move = u32;

        fn get_current_player(&self) -> Player {
            self.player
        }

        fn get_outcome(&self) -> GameOutcome {
            if self.stones == 0 {
                GameOutcome::Win(self.player.opponent())
            } else {
                GameOutcome::InProgress
            }
        }

        fn get_available_moves(&self) -> Vec<u32> {
            (1..=self.stones.min(2)).collect()
        }

        fn perform_move(&mut self, game_move: &u32) -> Result<(), GameError> {
            if !self.get_available_moves().contains(game_move) {
                return Err(GameError::IllegalMove(game_move.to_string()));
            }
            self.stones -= game_move;
            self.player = self.player.opponent();
            Ok(())
        }
    }

    fn seeded_search<T: Game>(game: T) -> MonteCarloTreeSearch<T, SeededRandomGenerator> {
        MonteCarloTreeSearch::builder(game)
            .with_random_generator(SeededRandomGenerator::new(42))
            .with_config(MctsConfig::for_testing())
            .build()
    }

    #[test]
    fn nim_tree_is_exhausted_and_credits_the_choosing_player() {
        // arrange
        let mut mcts = seeded_search(Nim {
            stones: 2,
            player: Player::One,
        });

        // act
        let exhausted = mcts.iterate_n_times(100).unwrap();

        // assert
        assert!(exhausted);
        assert_eq!(mcts.iterations(), 3);
        assert_eq!(mcts.best_move().unwrap(), 2);

        let root = mcts.get_root();
        assert_eq!(root.value().visits, 3);
        assert!((root.value().wins - 2.0).abs() < 1e-9);
        let children: Vec<_> = root.children().map(|c| c.value().clone()).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].prev_move, Some(1));
        assert!((children[0].wins_rate() - 0.0).abs() < 1e-9);
        assert_eq!(children[1].prev_move, Some(2));
        assert!((children[1].wins_rate() - 1.0).abs() < 1e-9);

        // nothing left to explore
        assert!(mcts.iterate_once().unwrap());
        assert_eq!(mcts.iterations(), 3);
    }

    #[test]
    fn unvisited_children_are_tried_before_any_revisit() {
        let mut mcts = seeded_search(EnglishDraughts::default());

        mcts.iterate_n_times(7).unwrap();

        let root = mcts.get_root();
        assert_eq!(root.value().visits, 7);
        let visits: Vec<u32> = root.children().map(|c| c.value().visits).collect();
        assert_eq!(visits, vec![1; 7]);
    }

    #[test]
    fn children_follow_the_legal_move_order() {
        let game = EnglishDraughts::default();
        let mut mcts = seeded_search(game.clone());

        mcts.iterate_once().unwrap();

        let moves: Vec<_> = mcts
            .get_root()
            .children()
            .filter_map(|c| c.value().prev_move.clone())
            .collect();
        assert_eq!(moves, game.get_available_moves());
    }

    #[test]
    fn statistics_add_up_after_every_iteration() {
        let mut mcts = seeded_search(EnglishDraughts::default());
        let root_id = mcts.get_root().id();

        for _ in 0..40 {
            mcts.iterate_once().unwrap();

            for node in mcts.get_tree().nodes() {
                let data = node.value();
                assert!(data.wins <= data.visits as f64 + 1e-9);
                if !node.has_children() {
                    continue;
                }
                let children_visits: u32 = node.children().map(|c| c.value().visits).sum();
                let direct = if node.id() == root_id { 0 } else { 1 };
                assert_eq!(data.visits, children_visits + direct);
            }
        }
    }

    #[test]
    fn same_seed_same_search() {
        let mut first = seeded_search(EnglishDraughts::default());
        let mut second = seeded_search(EnglishDraughts::default());

        first.iterate_n_times(30).unwrap();
        second.iterate_n_times(30).unwrap();

        assert_eq!(first.best_move().unwrap(), second.best_move().unwrap());
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn zero_budget_search_still_returns_a_legal_move() {
        let game = EnglishDraughts::default();

        let best = search(&game, Duration::ZERO).unwrap();

        assert!(game.get_available_moves().contains(&best));
    }

    #[test]
    fn timed_search_runs_at_least_one_iteration() {
        let mut mcts = seeded_search(EnglishDraughts::default());

        let stats = mcts.evaluate_with_time_limit(Duration::ZERO).unwrap();

        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.root_visits, 1);
        assert!(!stats.exhausted);
    }

    #[test]
    fn terminal_root_has_no_move() {
        let mut board = CheckerBoard::empty(8).unwrap();
        board.set(10, Some(Piece::man(Player::Two)));
        let game = EnglishDraughts::from_board(board, Player::One);

        let result = search(&game, Duration::from_millis(10));

        assert!(matches!(result, Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn single_legal_move_is_returned() {
        let mut board = CheckerBoard::empty(8).unwrap();
        board.set(22, Some(Piece::man(Player::One)));
        board.set(17, Some(Piece::man(Player::Two)));
        board.set(3, Some(Piece::man(Player::Two)));
        let game = EnglishDraughts::from_board(board, Player::One);
        let mut mcts = seeded_search(game);

        let best = mcts.search().unwrap();

        assert_eq!(best.squares(), &[22, 13]);
    }

    fn set_stats<K: RandomGenerator>(
        mcts: &mut MonteCarloTreeSearch<EnglishDraughts, K>,
        id: NodeId,
        visits: u32,
        wins: f64,
    ) {
        let mut node = mcts.tree.get_mut(id).unwrap();
        let data = node.value();
        data.visits = visits;
        data.wins = wins;
    }

    fn root_child_ids<K: RandomGenerator>(
        mcts: &MonteCarloTreeSearch<EnglishDraughts, K>,
    ) -> Vec<NodeId> {
        mcts.get_root().children().map(|c| c.id()).collect()
    }

    #[test]
    fn best_move_is_the_best_visited_child() {
        // arrange
        let mut mcts = MonteCarloTreeSearch::builder(EnglishDraughts::default())
            .with_random_generator(SeededRandomGenerator::new(5))
            .with_config(MctsConfig::for_testing())
            .build();

        // act
        mcts.iterate_n_times(3).unwrap();

        // assert
        let root = mcts.get_root();
        let visited: Vec<_> = root.children().filter(|c| c.value().visits > 0).collect();
        assert_eq!(visited.len(), 3);
        let best_rate = visited
            .iter()
            .map(|c| c.value().wins_rate())
            .fold(f64::NEG_INFINITY, f64::max);
        let expected = visited
            .iter()
            .find(|c| c.value().wins_rate() == best_rate)
            .unwrap()
            .id();

        let best = mcts.get_most_perspective_move().unwrap();
        assert!(best.value().visits > 0);
        assert_eq!(best.id(), expected);
    }

    #[test]
    fn unvisited_children_never_beat_visited_ones() {
        let mut mcts = seeded_search(EnglishDraughts::default());
        mcts.iterate_once().unwrap();
        let ids = root_child_ids(&mcts);
        for &id in &ids {
            set_stats(&mut mcts, id, 0, 0.0);
        }
        set_stats(&mut mcts, ids[3], 4, 0.0);
        set_stats(&mut mcts, ids[5], 2, 0.0);

        let best = mcts.get_most_perspective_move().unwrap();

        assert_eq!(best.id(), ids[3]);
    }

    #[test]
    fn ties_go_to_the_earliest_child() {
        let mut mcts = seeded_search(EnglishDraughts::default());
        mcts.iterate_once().unwrap();
        let ids = root_child_ids(&mcts);
        set_stats(&mut mcts, ids[0], 2, 1.0);
        set_stats(&mut mcts, ids[2], 4, 3.0);
        set_stats(&mut mcts, ids[4], 8, 6.0);

        let best = mcts.get_most_perspective_move().unwrap();

        assert_eq!(best.id(), ids[2]);
        assert_eq!(
            mcts.best_move().unwrap(),
            best.value().prev_move.clone().unwrap()
        );
    }

    #[test]
    fn zero_rollouts_in_config_still_simulate() {
        // arrange
        let config = MctsConfig {
            rollouts_per_simulation: 0,
            ..MctsConfig::for_testing()
        };
        let mut mcts = MonteCarloTreeSearch::builder(EnglishDraughts::default())
            .with_random_generator(SeededRandomGenerator::new(42))
            .with_config(config)
            .build();

        // act
        mcts.iterate_n_times(20).unwrap();

        // assert
        assert_eq!(mcts.config().rollouts_per_simulation, 1);
        assert_eq!(mcts.get_root().value().visits, 20);
        assert!(mcts.get_tree().nodes().count() > 8);
    }

    #[test]
    fn from_game_uses_the_default_config() {
        let mut mcts = MonteCarloTreeSearch::from_game(EnglishDraughts::default());

        assert_eq!(mcts.config(), &MctsConfig::default());
        assert!(!mcts.iterate_once().unwrap());
        assert_eq!(mcts.get_root().value().visits, 1);
    }

    #[test]
    fn stats_list_every_root_child() {
        let mut mcts = seeded_search(EnglishDraughts::default());
        mcts.iterate_n_times(10).unwrap();

        let stats = mcts.stats();
        let lines: Vec<&str> = stats.lines().collect();

        assert_eq!(lines[0], "MCTS with 10 evals");
        assert_eq!(lines.len(), 8);
        assert!(lines[1..].iter().all(|line| line.contains(" : ")));
        assert!(lines[1].contains('-'));
    }
}
