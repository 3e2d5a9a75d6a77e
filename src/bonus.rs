// Bonuses for special tiles that are linked to each other by the path.
//
// A rule (start role -> end role) gives each start tile a bonus for every end
// tile it reaches without going through a third special tile. Rules can be
// gated: a start tile must then have been reached ('loaded') by an earlier
// rule before it can supply anything itself.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pathfinding::{compute_tree, extract_optimal_path, Cost, SPECIAL_EDGE_SURCHARGE};
use crate::tile::{Path, PathError, Points, TileId, TileRole, BASE_TILE_VALUE};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BonusError {
    #[error("Invalid path ({0})")]
    PathError(#[from] PathError),
    #[error("Bonus for tile {0} does not fit in a tile value")]
    Overflow(TileId),
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BonusRule {
    pub start: TileRole,
    pub end: TileRole,
    /// Points per tile of distance between the two special tiles.
    pub bonus: Points,
    /// Only start tiles loaded by an earlier rule may supply.
    #[serde(default)]
    pub must_be_loaded: bool,
}

impl BonusRule {
    pub fn new(start: TileRole, end: TileRole, bonus: Points, must_be_loaded: bool) -> Self {
        BonusRule { start, end, bonus, must_be_loaded }
    }

    /// Mines supply factories, and supplied factories supply houses.
    pub fn reference_rules() -> Vec<BonusRule> {
        vec![
            BonusRule::new(TileRole::Mine, TileRole::Factory, 1, false),
            BonusRule::new(TileRole::Factory, TileRole::House, 2, true),
        ]
    }
}

/// Bonus state of one special tile during a scoring pass.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SpecialTile {
    pub id: TileId,
    pub value: Points,
    // Reached by a valid link from a start tile.
    pub loaded: bool,
    // Start of at least one valid link.
    pub supplying: bool,
}

impl SpecialTile {
    pub fn new(id: TileId) -> Self {
        SpecialTile { id, value: BASE_TILE_VALUE, loaded: false, supplying: false }
    }
}

/// Special tiles of a path grouped by role, each group in path order.
#[derive(Debug, Clone, Default)]
pub struct SpecialTileGroups {
    groups: FxHashMap<TileRole, Vec<SpecialTile>>,
}

impl SpecialTileGroups {
    pub fn from_path(path: &Path) -> Self {
        let mut groups: FxHashMap<TileRole, Vec<SpecialTile>> = FxHashMap::default();
        for tile in path.tiles() {
            if let Some(role) = tile.role {
                groups.entry(role).or_default().push(SpecialTile::new(tile.id));
            }
        }
        SpecialTileGroups { groups }
    }

    pub fn get(&self, role: TileRole) -> &[SpecialTile] {
        self.groups.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, id: TileId) -> Option<&SpecialTile> {
        self.groups.values().flatten().find(|tile| tile.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All special tiles, grouped by role in `TileRole` order.
    pub fn iter(&self) -> impl Iterator<Item=(TileRole, &SpecialTile)> + '_ {
        TileRole::ALL.into_iter()
            .flat_map(move |role| self.get(role).iter().map(move |tile| (role, tile)))
    }

    fn instance_mut(&mut self, role: TileRole, index: usize) -> Option<&mut SpecialTile> {
        self.groups.get_mut(&role).and_then(|group| group.get_mut(index))
    }
}

/// One (start, end) pair looked at by a rule.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub start: TileId,
    pub end: TileId,
    pub target_score: Cost,
    pub valid: bool,
    pub steps: Vec<TileId>,
}

/// Applies `rule` to every (start, end) pair of `groups`, updating the start
/// tiles' values and the loaded/supplying flags in place.
///
/// Every valid pair adds to its start tile. An end tile can be reached from
/// several start tiles, each of which gets its own bonus. Fails if a start
/// tile's value would not fit in `Points`; that pair is left unapplied.
pub fn apply_bonus(
    path: &Path, groups: &mut SpecialTileGroups, rule: &BonusRule
    ) -> Result<Vec<Link>, BonusError> {
    let mut links = Vec::new();
    if groups.get(rule.start).is_empty() || groups.get(rule.end).is_empty() {
        debug!("At least one type of endpoint is missing for {} -> {}.",
               rule.start, rule.end);
        return Ok(links);
    }

    let end_ids: Vec<TileId> = groups.get(rule.end).iter().map(|tile| tile.id).collect();
    for start_index in 0..groups.get(rule.start).len() {
        let start = groups.get(rule.start)[start_index].clone();
        if rule.must_be_loaded && !start.loaded {
            debug!("{}:{} has no suppliers.", rule.start, start.id);
            continue;
        }
        let tree = compute_tree(path, start.id)?;

        for (end_index, &end_id) in end_ids.iter().enumerate() {
            if end_id == start.id {
                continue;
            }
            debug!("{}:{} to {}:{}", rule.start, start.id, rule.end, end_id);
            let optimal = extract_optimal_path(&tree, end_id);
            let valid = optimal.is_valid_link();
            if valid {
                debug!("valid {}", optimal.target_score);
                let distance = optimal.target_score - SPECIAL_EDGE_SURCHARGE;
                let current = groups.get(rule.start)[start_index].value;
                let value = distance.checked_mul(rule.bonus)
                    .and_then(|bonus| current.checked_add(bonus))
                    .ok_or(BonusError::Overflow(start.id))?;
                if let Some(end) = groups.instance_mut(rule.end, end_index) {
                    end.loaded = true;
                }
                if let Some(start) = groups.instance_mut(rule.start, start_index) {
                    start.supplying = true;
                    start.value = value;
                }
            } else {
                debug!("invalid - Path passes through another special tile. {}",
                       optimal.target_score);
            }
            links.push(Link {
                start: start.id,
                end: end_id,
                target_score: optimal.target_score,
                valid,
                steps: optimal.tile_ids(),
            });
        }
    }
    Ok(links)
}
