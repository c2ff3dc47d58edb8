//! Monte Carlo Tree Search with UCT selection and random playouts.
//!
//! Each iteration walks down the tree with [`select`], grows it by one node
//! with [`expand`], scores that node with a random playout and pushes the
//! result back to the root with [`backpropagate`].
//!
//! The tree lives in an arena ([`SearchTree`]): a node owns the ids of its
//! children and refers to its parent by id. The whole tree is built fresh for
//! each move and dropped in one piece afterwards.
//!
//! Credit is always given to the searching player, whatever side moved at a
//! given depth, and the final move is picked by UCT score rather than by visit
//! count.

use std::ops::{Index, IndexMut};
use std::time::Instant;

use fastrand::Rng;
use log::{debug, info};

use crate::board::{Board, Point, Stone};
use crate::constants::{EXPLORATION_WEIGHT, REPORT_PERIOD};
use crate::playout::{random_move, simulate};

/// Index of a node inside a [`SearchTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the MCTS search tree.
pub struct TreeNode {
    /// The game position at this node
    pub state: Board,
    /// Number of visits
    pub visits: u32,
    /// Number of playouts won by the searching player (winrate = wins/visits)
    pub wins: u32,
    /// Parent node (None for the root)
    pub parent: Option<NodeId>,
    /// Child nodes, one per expanded move, in expansion order
    pub children: Vec<NodeId>,
}

impl TreeNode {
    fn new(state: Board, parent: Option<NodeId>) -> Self {
        Self {
            state,
            visits: 0,
            wins: 0,
            parent,
            children: Vec::new(),
        }
    }

    /// The move that led to this node.
    pub fn last_move(&self) -> Option<Point> {
        self.state.last_move()
    }

    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }
}

/// Arena holding every node of one search.
pub struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    /// Create a tree containing only a root for `state`.
    pub fn new(state: Board) -> Self {
        Self {
            nodes: vec![TreeNode::new(state, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Attach a new child holding `state` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, state: Board) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(state, Some(parent)));
        self[parent].children.push(id);
        id
    }

    /// Child nodes of `id` in expansion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> + '_ {
        self[id].children.iter().map(move |&c| &self[c])
    }
}

impl Index<NodeId> for SearchTree {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for SearchTree {
    fn index_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }
}

/// UCT score of `child` seen from a parent with `parent_visits` visits.
#[inline]
pub fn uct_score(child: &TreeNode, parent_visits: u32, exploration: f64) -> f64 {
    let v = child.visits as f64;
    child.wins as f64 / v + exploration * ((parent_visits as f64).ln() / v).sqrt()
}

/// Select the child of `id` with the highest UCT score.
///
/// Ties go to the earliest child.
///
/// # Panics
///
/// Panics if `id` has no children or any child has never been visited.
pub fn best_child(tree: &SearchTree, id: NodeId, exploration: f64) -> NodeId {
    let node = &tree[id];
    assert!(!node.children.is_empty(), "best_child called on a node without children");

    let mut best = node.children[0];
    let mut best_score = f64::NEG_INFINITY;
    for &child_id in &node.children {
        let child = &tree[child_id];
        assert!(child.visits > 0, "best_child called with an unvisited child");
        let score = uct_score(child, node.visits, exploration);
        if score > best_score {
            best_score = score;
            best = child_id;
        }
    }
    best
}

/// Descend from `id` until a node can be expanded or a terminal state is
/// reached. Expansion happens here when needed; the returned node is the one
/// to simulate from.
pub fn select(
    tree: &mut SearchTree,
    mut id: NodeId,
    player: Stone,
    exploration: f64,
    rng: &mut Rng,
) -> NodeId {
    while !tree[id].state.is_terminal() {
        if tree[id].children.len() < tree[id].state.legal_moves().len() {
            return expand(tree, id, player, exploration, rng);
        }
        id = best_child(tree, id, exploration);
    }
    id
}

/// Add one child for a random untried move of `id`, played by `player`.
///
/// Falls back to [`best_child`] when every legal move already has a child.
pub fn expand(
    tree: &mut SearchTree,
    id: NodeId,
    player: Stone,
    exploration: f64,
    rng: &mut Rng,
) -> NodeId {
    let tried: Vec<Point> = tree.children(id).filter_map(TreeNode::last_move).collect();
    let untried: Vec<Point> = tree[id]
        .state
        .legal_moves()
        .into_iter()
        .filter(|mv| !tried.contains(mv))
        .collect();

    let Some((row, col)) = random_move(&untried, rng) else {
        return best_child(tree, id, exploration);
    };

    let mut state = tree[id].state.copy();
    state.perform_move(row, col, player);
    tree.add_child(id, state)
}

/// Record one playout result on `id` and every ancestor up to the root.
pub fn backpropagate(tree: &mut SearchTree, id: NodeId, result: Stone, player: Stone) {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = &mut tree[node_id];
        node.visits += 1;
        if result == player {
            node.wins += 1;
        }
        current = node.parent;
    }
}

/// Search engine choosing moves for one side.
pub struct Mcts {
    player: Stone,
    exploration: f64,
    rng: Rng,
}

impl Mcts {
    /// Create an engine for `player` with an entropy-seeded generator.
    pub fn new(player: Stone) -> Self {
        Self::with_rng(player, Rng::new())
    }

    /// Create an engine for `player` whose playouts are reproducible.
    pub fn with_seed(player: Stone, seed: u64) -> Self {
        Self::with_rng(player, Rng::with_seed(seed))
    }

    pub fn with_rng(player: Stone, rng: Rng) -> Self {
        assert!(player.is_player(), "engine must play Black or White");
        Self {
            player,
            exploration: EXPLORATION_WEIGHT,
            rng,
        }
    }

    /// Override the UCT exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn player(&self) -> Stone {
        self.player
    }

    /// Build a fresh tree rooted at `board` and run `iterations` search cycles.
    ///
    /// An empty board has no candidate moves, so the tree is returned with
    /// only its unvisited root.
    pub fn search(&mut self, board: &Board, iterations: usize) -> SearchTree {
        let mut tree = SearchTree::new(board.copy());
        let root = tree.root();
        if board.is_empty() {
            debug!("empty board, nothing to search");
            return tree;
        }

        for i in 0..iterations {
            let leaf = select(&mut tree, root, self.player, self.exploration, &mut self.rng);
            let result = simulate(&tree[leaf].state, self.player, &mut self.rng);
            backpropagate(&mut tree, leaf, result, self.player);

            if (i + 1) % REPORT_PERIOD == 0 {
                debug!(
                    "iteration {}: {} nodes, root winrate {:.3}",
                    i + 1,
                    tree.node_count(),
                    tree[root].winrate()
                );
            }
        }

        tree
    }

    /// Choose a move for the engine's side on `board`.
    ///
    /// Returns `None` when the game is already over. On an empty board the
    /// centre is played without searching.
    pub fn choose_move(&mut self, board: &Board, iterations: usize) -> Option<Point> {
        if board.is_terminal() {
            return None;
        }
        if board.is_empty() {
            return Some(board.center());
        }

        let start = Instant::now();
        let tree = self.search(board, iterations);
        let root = tree.root();
        if tree[root].children.is_empty() {
            // Zero iterations leave nothing to choose from.
            return random_move(&board.legal_moves(), &mut self.rng);
        }

        let best = best_child(&tree, root, self.exploration);
        dump_children(&tree);
        info!(
            "{} chose {:?} after {} iterations ({} nodes, {:.2?}): v={} wr={:.3}",
            self.player,
            tree[best].last_move(),
            iterations,
            tree.node_count(),
            start.elapsed(),
            tree[best].visits,
            tree[best].winrate()
        );
        tree[best].last_move()
    }
}

/// Log statistics of the root's children.
pub fn dump_children(tree: &SearchTree) {
    for child in tree.children(tree.root()) {
        debug!(
            "move {:?} v={} w={} wr={:.3}",
            child.last_move(),
            child.visits,
            child.wins,
            child.winrate()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening() -> Board {
        let mut board = Board::new(10);
        board.perform_move(4, 4, Stone::Black);
        board.perform_move(4, 5, Stone::White);
        board
    }

    /// Root with two visited children having the given (visits, wins).
    fn tree_with_children(stats: &[(u32, u32)]) -> SearchTree {
        let board = opening();
        let moves = board.legal_moves();
        let mut tree = SearchTree::new(board.clone());
        let root = tree.root();
        for (i, &(visits, wins)) in stats.iter().enumerate() {
            let mut state = board.clone();
            state.perform_move(moves[i].0, moves[i].1, Stone::White);
            let child = tree.add_child(root, state);
            tree[child].visits = visits;
            tree[child].wins = wins;
            tree[root].visits += visits;
            tree[root].wins += wins;
        }
        tree
    }

    #[test]
    fn test_tree_node_creation() {
        let tree = SearchTree::new(opening());
        let root = &tree[tree.root()];
        assert_eq!(root.visits, 0);
        assert_eq!(root.wins, 0);
        assert!(root.parent.is_none());
        assert!(root.children.is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut tree = SearchTree::new(opening());
        let root = tree.root();
        let child = tree.add_child(root, opening());
        let grandchild = tree.add_child(child, opening());
        assert_eq!(tree[child].parent, Some(root));
        assert_eq!(tree[root].children, vec![child]);
        assert_eq!(tree[grandchild].parent, Some(child));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_best_child_prefers_higher_winrate() {
        let tree = tree_with_children(&[(10, 2), (10, 8), (10, 5)]);
        let best = best_child(&tree, tree.root(), EXPLORATION_WEIGHT);
        assert_eq!(best, tree[tree.root()].children[1]);
    }

    #[test]
    fn test_best_child_prefers_less_visited_on_equal_winrate() {
        let tree = tree_with_children(&[(20, 10), (4, 2)]);
        let best = best_child(&tree, tree.root(), EXPLORATION_WEIGHT);
        assert_eq!(best, tree[tree.root()].children[1]);
    }

    #[test]
    fn test_best_child_tie_goes_to_first() {
        let tree = tree_with_children(&[(5, 3), (5, 3), (5, 3)]);
        let best = best_child(&tree, tree.root(), EXPLORATION_WEIGHT);
        assert_eq!(best, tree[tree.root()].children[0]);
    }

    #[test]
    #[should_panic(expected = "without children")]
    fn test_best_child_without_children_panics() {
        let tree = SearchTree::new(opening());
        best_child(&tree, tree.root(), EXPLORATION_WEIGHT);
    }

    #[test]
    #[should_panic(expected = "unvisited")]
    fn test_best_child_with_unvisited_child_panics() {
        let tree = tree_with_children(&[(3, 1), (0, 0)]);
        best_child(&tree, tree.root(), EXPLORATION_WEIGHT);
    }

    #[test]
    fn test_expand_adds_distinct_legal_children() {
        let board = opening();
        let legal = board.legal_moves();
        let mut tree = SearchTree::new(board);
        let root = tree.root();
        let mut rng = Rng::with_seed(9);

        for _ in 0..legal.len() {
            let child = expand(&mut tree, root, Stone::White, EXPLORATION_WEIGHT, &mut rng);
            assert_eq!(tree[child].parent, Some(root));
            tree[child].visits = 1;
            tree[root].visits += 1;
        }

        let mut moves: Vec<Point> = tree.children(root).filter_map(TreeNode::last_move).collect();
        assert_eq!(moves.len(), legal.len());
        moves.sort();
        moves.dedup();
        assert_eq!(moves.len(), legal.len());
        assert!(moves.iter().all(|mv| legal.contains(mv)));
        for child in tree.children(root) {
            let (row, col) = child.last_move().unwrap();
            assert_eq!(child.state.get(row, col), Some(Stone::White));
        }
    }

    #[test]
    fn test_expand_fully_expanded_falls_back_to_best_child() {
        let board = opening();
        let n = board.legal_moves().len();
        let mut tree = SearchTree::new(board);
        let root = tree.root();
        let mut rng = Rng::with_seed(2);
        for _ in 0..n {
            let child = expand(&mut tree, root, Stone::White, EXPLORATION_WEIGHT, &mut rng);
            tree[child].visits = 1;
            tree[root].visits += 1;
        }
        let before = tree.node_count();
        let chosen = expand(&mut tree, root, Stone::White, EXPLORATION_WEIGHT, &mut rng);
        assert_eq!(tree.node_count(), before);
        assert_eq!(chosen, best_child(&tree, root, EXPLORATION_WEIGHT));
    }

    #[test]
    fn test_select_expands_unexpanded_root() {
        let mut tree = SearchTree::new(opening());
        let root = tree.root();
        let mut rng = Rng::with_seed(4);
        let leaf = select(&mut tree, root, Stone::White, EXPLORATION_WEIGHT, &mut rng);
        assert_ne!(leaf, root);
        assert_eq!(tree[leaf].parent, Some(root));
    }

    #[test]
    fn test_select_stops_at_terminal_root() {
        let mut board = Board::new(10);
        for col in 0..5 {
            board.perform_move(2, col, Stone::Black);
        }
        let mut tree = SearchTree::new(board);
        let root = tree.root();
        let mut rng = Rng::with_seed(4);
        assert_eq!(
            select(&mut tree, root, Stone::White, EXPLORATION_WEIGHT, &mut rng),
            root
        );
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_backpropagate_updates_whole_path() {
        let mut tree = SearchTree::new(opening());
        let root = tree.root();
        let a = tree.add_child(root, opening());
        let b = tree.add_child(a, opening());
        let sibling = tree.add_child(root, opening());

        backpropagate(&mut tree, b, Stone::White, Stone::White);
        backpropagate(&mut tree, b, Stone::Black, Stone::White);
        backpropagate(&mut tree, b, Stone::Empty, Stone::White);

        for id in [root, a, b] {
            assert_eq!(tree[id].visits, 3);
            assert_eq!(tree[id].wins, 1);
        }
        assert_eq!(tree[sibling].visits, 0);
    }

    #[test]
    fn test_search_visit_counts() {
        let mut engine = Mcts::with_seed(Stone::White, 17);
        let tree = engine.search(&opening(), 200);
        let root = &tree[tree.root()];
        assert_eq!(root.visits, 200);
        let child_visits: u32 = tree.children(tree.root()).map(|c| c.visits).sum();
        assert_eq!(child_visits, 200);
        assert!(root.wins <= root.visits);
    }

    #[test]
    fn test_choose_move_is_legal() {
        let board = opening();
        let mut engine = Mcts::with_seed(Stone::White, 1);
        let mv = engine.choose_move(&board, 300).unwrap();
        assert!(board.legal_moves().contains(&mv));
    }

    #[test]
    fn test_choose_move_is_reproducible() {
        let board = opening();
        let a = Mcts::with_seed(Stone::White, 99).choose_move(&board, 200);
        let b = Mcts::with_seed(Stone::White, 99).choose_move(&board, 200);
        assert_eq!(a, b);
    }

    #[test]
    fn test_choose_move_empty_board_plays_center() {
        let mut engine = Mcts::with_seed(Stone::Black, 1);
        assert_eq!(engine.choose_move(&Board::new(10), 100), Some((5, 5)));
    }

    #[test]
    fn test_search_empty_board_returns_bare_root() {
        let mut engine = Mcts::with_seed(Stone::White, 1);
        let tree = engine.search(&Board::new(10), 10);
        let root = &tree[tree.root()];
        assert_eq!(tree.node_count(), 1);
        assert_eq!(root.visits, 0);
        assert!(root.children.is_empty());

        // A single-cell board has no candidates either.
        let tree = engine.search(&Board::new(1), 10);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_choose_move_on_finished_game() {
        let mut board = Board::new(10);
        for row in 0..5 {
            board.perform_move(row, 0, Stone::Black);
        }
        let mut engine = Mcts::with_seed(Stone::White, 1);
        assert_eq!(engine.choose_move(&board, 100), None);
    }

    #[test]
    fn test_choose_move_zero_iterations() {
        let board = opening();
        let mut engine = Mcts::with_seed(Stone::White, 1);
        let mv = engine.choose_move(&board, 0).unwrap();
        assert!(board.legal_moves().contains(&mv));
    }
}
