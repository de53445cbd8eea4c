//! Search tree nodes and the expandable node frontier.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use phaseforge_config::NodeExplorationType;
use phaseforge_core::{InitScore, Score};

/// One node of the search tree.
///
/// Nodes live in a [`NodeArena`]; `parent` is an index into it. The root has
/// no parent and no move. Every other node holds the move that produced it
/// from its parent and the inverse of that move.
#[derive(Debug, Clone)]
pub struct ExhaustiveSearchNode<M, Sc: Score> {
    parent: Option<usize>,
    depth: usize,
    breadth: u64,
    step_move: Option<M>,
    undo_move: Option<M>,
    score: Option<InitScore<Sc>>,
    optimistic_bound: Option<InitScore<Sc>>,
}

impl<M, Sc: Score> ExhaustiveSearchNode<M, Sc> {
    pub fn root() -> Self {
        Self {
            parent: None,
            depth: 0,
            breadth: 0,
            step_move: None,
            undo_move: None,
            score: None,
            optimistic_bound: None,
        }
    }

    pub fn child(parent: usize, depth: usize, breadth: u64, step_move: M, undo_move: M) -> Self {
        Self {
            parent: Some(parent),
            depth,
            breadth,
            step_move: Some(step_move),
            undo_move: Some(undo_move),
            score: None,
            optimistic_bound: None,
        }
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Layer index; the root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Creation order within the node's layer.
    pub fn breadth(&self) -> u64 {
        self.breadth
    }

    pub fn step_move(&self) -> Option<&M> {
        self.step_move.as_ref()
    }

    pub fn undo_move(&self) -> Option<&M> {
        self.undo_move.as_ref()
    }

    pub fn score(&self) -> Option<InitScore<Sc>> {
        self.score
    }

    pub fn set_score(&mut self, score: InitScore<Sc>) {
        self.score = Some(score);
    }

    pub fn optimistic_bound(&self) -> Option<InitScore<Sc>> {
        self.optimistic_bound
    }

    pub fn set_optimistic_bound(&mut self, bound: InitScore<Sc>) {
        self.optimistic_bound = Some(bound);
    }
}

/// Owns every node created during one phase.
#[derive(Debug)]
pub struct NodeArena<M, Sc: Score> {
    nodes: Vec<ExhaustiveSearchNode<M, Sc>>,
    next_breadth: Vec<u64>,
}

impl<M, Sc: Score> NodeArena<M, Sc> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_breadth: Vec::new(),
        }
    }

    pub fn push(&mut self, node: ExhaustiveSearchNode<M, Sc>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&ExhaustiveSearchNode<M, Sc>> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ExhaustiveSearchNode<M, Sc>> {
        self.nodes.get_mut(index)
    }

    /// Hands out the next breadth for a node at `depth`.
    pub fn next_breadth(&mut self, depth: usize) -> u64 {
        if self.next_breadth.len() <= depth {
            self.next_breadth.resize(depth + 1, 0);
        }
        let breadth = self.next_breadth[depth];
        self.next_breadth[depth] += 1;
        breadth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes to undo (old side, deepest first) and to redo (new side,
    /// shallowest first) to move the working solution from `from` to `to`.
    ///
    /// Returns `None` if the two nodes share no ancestor.
    pub fn restore_path(&self, from: usize, to: usize) -> Option<(Vec<usize>, Vec<usize>)> {
        let mut old_side = Vec::new();
        let mut new_side = Vec::new();
        let (mut old, mut new) = (from, to);
        while old != new {
            let old_depth = self.nodes.get(old)?.depth;
            let new_depth = self.nodes.get(new)?.depth;
            if old_depth < new_depth {
                new_side.push(new);
                new = self.nodes[new].parent?;
            } else {
                old_side.push(old);
                old = self.nodes[old].parent?;
            }
        }
        new_side.reverse();
        Some((old_side, new_side))
    }
}

impl<M, Sc: Score> Default for NodeArena<M, Sc> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortLevel<Sc: Score> {
    Deeper(usize),
    Shallower(Reverse<usize>),
    Score(Option<InitScore<Sc>>),
    Bound(Option<InitScore<Sc>>),
}

/// Sort key of a queued node. The greatest key is expanded next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierKey<Sc: Score> {
    levels: [SortLevel<Sc>; 3],
    breadth: Reverse<u64>,
    node: Reverse<usize>,
}

fn frontier_key<M, Sc: Score>(
    exploration: NodeExplorationType,
    index: usize,
    node: &ExhaustiveSearchNode<M, Sc>,
) -> FrontierKey<Sc> {
    let deeper = SortLevel::Deeper(node.depth);
    let score = SortLevel::Score(node.score);
    let bound = SortLevel::Bound(node.optimistic_bound);
    let levels = match exploration {
        NodeExplorationType::DepthFirst => [deeper, score, bound],
        NodeExplorationType::BreadthFirst => {
            [SortLevel::Shallower(Reverse(node.depth)), score, bound]
        }
        NodeExplorationType::ScoreFirst => [score, bound, deeper],
        NodeExplorationType::OptimisticBoundFirst => [bound, score, deeper],
        NodeExplorationType::OriginalOrder => [deeper, SortLevel::Deeper(0), SortLevel::Deeper(0)],
    };
    FrontierKey {
        levels,
        breadth: Reverse(node.breadth),
        node: Reverse(index),
    }
}

/// Expandable nodes ordered by a [`NodeExplorationType`].
///
/// Every ordering ends with "lower breadth first", so among otherwise equal
/// nodes the one created first is expanded first.
#[derive(Debug)]
pub struct NodeFrontier<Sc: Score> {
    exploration: NodeExplorationType,
    queue: BTreeSet<FrontierKey<Sc>>,
}

impl<Sc: Score> NodeFrontier<Sc> {
    pub fn new(exploration: NodeExplorationType) -> Self {
        Self {
            exploration,
            queue: BTreeSet::new(),
        }
    }

    pub fn exploration(&self) -> NodeExplorationType {
        self.exploration
    }

    pub fn push<M>(&mut self, index: usize, node: &ExhaustiveSearchNode<M, Sc>) {
        self.queue
            .insert(frontier_key(self.exploration, index, node));
    }

    /// Removes and returns the node to expand next.
    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_last().map(|key| key.node.0)
    }

    /// Drops every queued node whose optimistic bound is not better than
    /// `bound`. Returns how many were dropped.
    pub fn prune<M>(&mut self, arena: &NodeArena<M, Sc>, bound: InitScore<Sc>) -> usize {
        let before = self.queue.len();
        self.queue.retain(|key| {
            arena
                .get(key.node.0)
                .and_then(ExhaustiveSearchNode::optimistic_bound)
                .map_or(true, |optimistic| optimistic > bound)
        });
        before - self.queue.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
