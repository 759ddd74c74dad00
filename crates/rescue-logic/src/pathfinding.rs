//! Pure graph search over weighted cell graphs.
//!
//! Callers describe the board through [`CostGraph`]; this module provides a
//! min-priority queue, Dijkstra cost-to-goal and A* routing with a
//! Manhattan heuristic. Every edge must cost at least 1 for the heuristic
//! to stay admissible. "No route" is an ordinary `None`.

use crate::geometry::Cell;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// A directed, weighted view of the board.
pub trait CostGraph {
    /// Outgoing edges of `from` as `(neighbor, cost)`, appended to `out`.
    fn edges(&self, from: Cell, out: &mut Vec<(Cell, u32)>);
}

/// Min-priority queue. Ties pop in ascending value order.
#[derive(Debug, Clone)]
pub struct MinQueue<T: Ord> {
    heap: BinaryHeap<Reverse<(u32, T)>>,
}

impl<T: Ord> MinQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, priority: u32, value: T) {
        self.heap.push(Reverse((priority, value)));
    }

    /// Remove and return the lowest-priority entry.
    pub fn pop(&mut self) -> Option<(u32, T)> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    pub fn peek(&self) -> Option<&(u32, T)> {
        self.heap.peek().map(|Reverse(entry)| entry)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T: Ord> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum cumulative edge cost from `start` to `goal` (Dijkstra).
pub fn shortest_cost<G: CostGraph>(graph: &G, start: Cell, goal: Cell) -> Option<u32> {
    if start == goal {
        return Some(0);
    }

    let mut queue = MinQueue::new();
    let mut dist: HashMap<Cell, u32> = HashMap::new();
    let mut edges = Vec::with_capacity(4);
    queue.push(0, start);
    dist.insert(start, 0);

    while let Some((cost, current)) = queue.pop() {
        if dist.get(&current).is_some_and(|&best| cost > best) {
            continue; // stale entry
        }
        if current == goal {
            return Some(cost);
        }

        edges.clear();
        graph.edges(current, &mut edges);
        for &(next, step) in &edges {
            let candidate = cost + step;
            if dist.get(&next).map_or(true, |&best| candidate < best) {
                dist.insert(next, candidate);
                queue.push(candidate, next);
            }
        }
    }

    None
}

/// Cheapest route from `start` to `goal` (A*, Manhattan heuristic).
///
/// The route excludes `start` and ends with `goal`. Same cell gives an empty route.
pub fn find_path<G: CostGraph>(graph: &G, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if start == goal {
        return Some(Vec::new());
    }

    let mut queue = MinQueue::new();
    let mut dist: HashMap<Cell, u32> = HashMap::new();
    let mut prev: HashMap<Cell, Cell> = HashMap::new();
    let mut edges = Vec::with_capacity(4);
    queue.push(start.manhattan(goal), start);
    dist.insert(start, 0);

    while let Some((_, current)) = queue.pop() {
        if current == goal {
            break;
        }
        let base = dist.get(&current).copied().unwrap_or(u32::MAX);

        edges.clear();
        graph.edges(current, &mut edges);
        for &(next, step) in &edges {
            let candidate = base.saturating_add(step);
            if dist.get(&next).map_or(true, |&best| candidate < best) {
                dist.insert(next, candidate);
                prev.insert(next, current);
                queue.push(candidate + next.manhattan(goal), next);
            }
        }
    }

    if !prev.contains_key(&goal) {
        return None;
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(&before) = prev.get(&cursor) {
        if before == start {
            break;
        }
        path.push(before);
        cursor = before;
    }
    path.reverse();
    Some(path)
}
