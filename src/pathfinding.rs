// Shortest paths between tiles of a single completed path.
//
// Costs are shaped so that a route may end on a special tile but never relay
// through one: stepping onto a special tile costs more than the relay
// barrier, so a special tile is never expanded (unless it is the start).
// A detour-free link between two special tiles therefore costs
// SPECIAL_EDGE_COST + (plain hops), always under VALID_ROUTE_CEILING.

use log::trace;
use priority_queue::PriorityQueue;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;

use crate::tile::{Path, PathError, Tile, TileId};

pub type Cost = u32;

/// Cost of stepping onto an ordinary tile.
pub const PLAIN_EDGE_COST: Cost = 1;
/// Cost of stepping onto a special tile, of any role.
pub const SPECIAL_EDGE_COST: Cost = 1001;
/// Only tiles cheaper than this are expanded.
pub const RELAY_BARRIER: Cost = 1000;
/// Target scores at or above this went through another special tile (or
/// never got there).
pub const VALID_ROUTE_CEILING: Cost = 2000;
/// Part of a valid target score that comes from the special edge, not from
/// distance.
pub const SPECIAL_EDGE_SURCHARGE: Cost = SPECIAL_EDGE_COST - PLAIN_EDGE_COST;
pub const INFINITE_COST: Cost = Cost::MAX;

/// Costs and parents of every tile on a path, from a fixed start tile.
#[derive(Debug, Clone)]
pub struct CostTree<'a> {
    pub path: &'a Path,
    pub start: TileId,
    // Tiles never reached stay at INFINITE_COST.
    pub costs: FxHashMap<TileId, Cost>,
    pub parents: FxHashMap<TileId, TileId>,
}

impl<'a> CostTree<'a> {
    pub fn cost(&self, id: TileId) -> Cost {
        self.costs.get(&id).copied().unwrap_or(INFINITE_COST)
    }
}

/// Tiles from the tree's start to a target, and the target's cost.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalPath<'a> {
    // Empty when the target can't be reached.
    pub steps: Vec<&'a Tile>,
    pub target_score: Cost,
}

impl<'a> OptimalPath<'a> {
    /// Whether the route links its two ends without going through a third
    /// special tile.
    #[inline]
    pub fn is_valid_link(&self) -> bool {
        self.target_score < VALID_ROUTE_CEILING
    }

    pub fn tile_ids(&self) -> Vec<TileId> {
        self.steps.iter().map(|tile| tile.id).collect()
    }
}

#[inline]
pub fn edge_cost(to: &Tile) -> Cost {
    if to.is_special() { SPECIAL_EDGE_COST } else { PLAIN_EDGE_COST }
}

/// Dijkstra over the tiles of `path`, rooted at `start`.
///
/// Among tiles of equal cost, the one that comes first on the path is
/// expanded first (the start always goes first).
pub fn compute_tree(path: &Path, start: TileId) -> Result<CostTree<'_>, PathError> {
    let start_position = path.position(start)
        .ok_or(PathError::UnknownTile(start))?;

    let mut costs: FxHashMap<TileId, Cost> = path.tiles().iter()
        .map(|tile| (tile.id, INFINITE_COST))
        .collect();
    costs.insert(start, 0);
    let mut parents: FxHashMap<TileId, TileId> = FxHashMap::default();
    let mut processed: FxHashSet<TileId> = FxHashSet::default();

    // Only tiles under the barrier ever enter the frontier.
    let mut frontier: PriorityQueue<TileId, Reverse<(Cost, usize)>> = PriorityQueue::new();
    frontier.push(start, Reverse((0, start_position)));

    while let Some((current, Reverse((cost, _)))) = frontier.pop() {
        processed.insert(current);
        for &neighbor in &path[current].neighbors {
            if processed.contains(&neighbor) {
                continue;
            }
            let new_cost = cost + edge_cost(&path[neighbor]);
            if new_cost < costs[&neighbor] {
                costs.insert(neighbor, new_cost);
                parents.insert(neighbor, current);
                if new_cost < RELAY_BARRIER {
                    let position = path.position(neighbor)
                        .ok_or(PathError::UnknownTile(neighbor))?;
                    frontier.push(neighbor, Reverse((new_cost, position)));
                }
            }
        }
    }
    trace!("Cost tree from {start}: {} of {} tiles reached",
           costs.values().filter(|&&c| c != INFINITE_COST).count(), path.len());

    Ok(CostTree { path, start, costs, parents })
}

/// Walks the parents of `tree` back from `finish` to the tree's start.
pub fn extract_optimal_path<'a>(tree: &CostTree<'a>, finish: TileId) -> OptimalPath<'a> {
    let target_score = tree.cost(finish);
    if target_score == INFINITE_COST {
        return OptimalPath { steps: Vec::new(), target_score };
    }
    let mut steps = Vec::new();
    let mut current = finish;
    while let Some(tile) = tree.path.get(current) {
        steps.push(tile);
        match tree.parents.get(&current) {
            Some(&parent) if current != tree.start => current = parent,
            _ => break,
        }
    }
    steps.reverse();
    OptimalPath { steps, target_score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::line_path as line;
    use crate::tile::TileRole;

    const M: Option<TileRole> = Some(TileRole::Mine);
    const F: Option<TileRole> = Some(TileRole::Factory);
    const H: Option<TileRole> = Some(TileRole::House);

    #[test]
    fn test_plain_line_costs() {
        let path = line(&[None, None, None, None]);
        let tree = compute_tree(&path, 0).unwrap();
        for id in 0..4 {
            assert_eq!(tree.cost(id), id);
        }
        assert_eq!(tree.parents.get(&0), None);
        assert_eq!(tree.parents[&3], 2);
    }

    #[test]
    fn test_direct_link_between_special_tiles() {
        // mine, plain, plain, factory
        let path = line(&[M, None, None, F]);
        let tree = compute_tree(&path, 0).unwrap();
        let optimal = extract_optimal_path(&tree, 3);
        assert_eq!(optimal.target_score, SPECIAL_EDGE_COST + 2);
        assert_eq!(optimal.tile_ids(), vec![0, 1, 2, 3]);
        assert!(optimal.is_valid_link());
    }

    #[test]
    fn test_special_tiles_are_not_relays() {
        // mine, factory, house: the house is behind the factory.
        let path = line(&[M, F, H]);
        let tree = compute_tree(&path, 0).unwrap();
        assert_eq!(tree.cost(1), SPECIAL_EDGE_COST);
        let optimal = extract_optimal_path(&tree, 2);
        assert!(optimal.target_score >= 2 * SPECIAL_EDGE_COST);
        assert!(!optimal.is_valid_link());
        assert!(optimal.steps.is_empty());
    }

    #[test]
    fn test_prefers_route_around_special_tile() {
        //   0(mine) - 1(house) - 2 - 3(factory)
        //      \                     /
        //       4 ------- 5 ------ 6
        let tiles = vec![
            Tile::new(0, vec![1, 4]).with_role(TileRole::Mine),
            Tile::new(1, vec![0, 2]).with_role(TileRole::House),
            Tile::new(2, vec![1, 3]),
            Tile::new(3, vec![2, 6]).with_role(TileRole::Factory),
            Tile::new(4, vec![0, 5]),
            Tile::new(5, vec![4, 6]),
            Tile::new(6, vec![5, 3]),
        ];
        let path = Path::new(tiles).unwrap();
        let tree = compute_tree(&path, 0).unwrap();
        let optimal = extract_optimal_path(&tree, 3);
        assert_eq!(optimal.tile_ids(), vec![0, 4, 5, 6, 3]);
        assert_eq!(optimal.target_score, SPECIAL_EDGE_COST + 3);
    }

    #[test]
    fn test_unreachable_tile_stays_infinite() {
        let tiles = vec![
            Tile::new(0, vec![1]).with_role(TileRole::Mine),
            Tile::new(1, vec![0]),
            Tile::new(2, vec![]).with_role(TileRole::Factory),
        ];
        let path = Path::new(tiles).unwrap();
        let tree = compute_tree(&path, 0).unwrap();
        assert_eq!(tree.cost(2), INFINITE_COST);
        let optimal = extract_optimal_path(&tree, 2);
        assert!(optimal.steps.is_empty());
        assert!(!optimal.is_valid_link());
    }

    #[test]
    fn test_start_must_be_on_path() {
        let path = line(&[None, None]);
        assert_eq!(compute_tree(&path, 9).unwrap_err(), PathError::UnknownTile(9));
    }

    #[test]
    fn test_path_to_start_is_just_start() {
        let path = line(&[M, None]);
        let tree = compute_tree(&path, 0).unwrap();
        let optimal = extract_optimal_path(&tree, 0);
        assert_eq!(optimal.tile_ids(), vec![0]);
        assert_eq!(optimal.target_score, 0);
    }

    #[test]
    fn test_tree_is_deterministic() {
        // A 3x3 grid has many equal-length shortest paths.
        let mut tiles = Vec::new();
        for y in 0..3u32 {
            for x in 0..3u32 {
                let mut neighbors = Vec::new();
                if x > 0 { neighbors.push(y * 3 + x - 1); }
                if x < 2 { neighbors.push(y * 3 + x + 1); }
                if y > 0 { neighbors.push((y - 1) * 3 + x); }
                if y < 2 { neighbors.push((y + 1) * 3 + x); }
                tiles.push(Tile::new(y * 3 + x, neighbors));
            }
        }
        let path = Path::new(tiles).unwrap();
        let first = compute_tree(&path, 0).unwrap();
        let second = compute_tree(&path, 0).unwrap();
        assert_eq!(first.costs, second.costs);
        assert_eq!(first.parents, second.parents);
        assert_eq!(first.cost(8), 4);
    }
}
