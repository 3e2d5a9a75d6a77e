// Implementation of pathfinding.rs, without optimizations.
// Scans every tile for the lowest unprocessed cost on each step.
use std::collections::{HashMap, HashSet};

use crate::pathfinding::{edge_cost, Cost, CostTree, INFINITE_COST, RELAY_BARRIER};
use crate::tile::{Path, PathError, TileId};

// Start first, then every other tile in path order.
fn initial_costs(path: &Path, start: TileId) -> Vec<(TileId, Cost)> {
    let mut costs = vec![(start, 0)];
    costs.extend(path.tiles().iter()
        .filter(|tile| tile.id != start)
        .map(|tile| (tile.id, INFINITE_COST)));
    costs
}

fn lowest_node(costs: &[(TileId, Cost)], processed: &HashSet<TileId>) -> Option<TileId> {
    let mut lowest: Option<(TileId, Cost)> = None;
    for &(id, cost) in costs {
        if processed.contains(&id) || cost >= RELAY_BARRIER {
            continue;
        }
        // Strictly lower, so the first of equal costs wins.
        let is_lower = match lowest {
            Some((_, best)) => cost < best,
            None => true,
        };
        if is_lower {
            lowest = Some((id, cost));
        }
    }
    lowest.map(|(id, _)| id)
}

pub fn simple_compute_tree(path: &Path, start: TileId) -> Result<CostTree<'_>, PathError> {
    if !path.contains(start) {
        return Err(PathError::UnknownTile(start));
    }
    let mut costs = initial_costs(path, start);
    let index: HashMap<TileId, usize> = costs.iter().enumerate()
        .map(|(i, &(id, _))| (id, i))
        .collect();
    let mut parents = HashMap::new();
    let mut processed = HashSet::new();

    while let Some(current) = lowest_node(&costs, &processed) {
        let cost = costs[index[&current]].1;
        for &neighbor in &path[current].neighbors {
            let new_cost = cost.saturating_add(edge_cost(&path[neighbor]));
            let entry = &mut costs[index[&neighbor]];
            if entry.1 > new_cost {
                entry.1 = new_cost;
                parents.insert(neighbor, current);
            }
        }
        processed.insert(current);
    }

    Ok(CostTree {
        path,
        start,
        costs: costs.into_iter().collect(),
        parents: parents.into_iter().collect(),
    })
}
