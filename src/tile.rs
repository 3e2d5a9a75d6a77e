// Tiles of a completed path, as handed over by the board layer.
//
// A Path only ever exposes the subgraph induced by its own tiles: every
// neighbor id must point to another tile of the same path, which is checked
// once when the path is built.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use thiserror::Error;

pub type TileId = u32;
/// 1-based player number, player `n` is `players[n - 1]`.
pub type PlayerId = u8;
pub type Points = u32;

/// Every tile is worth this much before any bonus.
pub const BASE_TILE_VALUE: Points = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("Tile {0} appears more than once on the path")]
    DuplicateTile(TileId),
    #[error("Tile {tile} lists neighbor {neighbor}, which is not on the path")]
    UnknownNeighbor { tile: TileId, neighbor: TileId },
    #[error("Tile {0} is not on the path")]
    UnknownTile(TileId),
}

/// Special tile roles. A tile without a role is an ordinary tile.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum TileRole {
    Mine,
    Factory,
    House,
}

impl TileRole {
    pub const ALL: [TileRole; 3] = [TileRole::Mine, TileRole::Factory, TileRole::House];
}

impl std::fmt::Display for TileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TileRole::Mine => "mine",
            TileRole::Factory => "factory",
            TileRole::House => "house",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: TileId,
    pub neighbors: Vec<TileId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TileRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_by: Option<PlayerId>,

    // Written by scoring.
    #[serde(default)]
    pub value: Points,
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub supplying: bool,
}

impl Tile {
    pub fn new(id: TileId, neighbors: Vec<TileId>) -> Self {
        Tile {
            id,
            neighbors,
            role: None,
            played_by: None,
            value: 0,
            loaded: false,
            supplying: false,
        }
    }

    pub fn with_role(mut self, role: TileRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn played_by(mut self, player: PlayerId) -> Self {
        self.played_by = Some(player);
        self
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.role.is_some()
    }
}

/// Ordered, connected route of tiles. Tile order is the order in which
/// tiles are scored and players credited.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Path {
    tiles: Vec<Tile>,
    // id -> position in `tiles`
    positions: FxHashMap<TileId, usize>,
}

impl Path {
    pub fn new(tiles: Vec<Tile>) -> Result<Self, PathError> {
        let mut positions = FxHashMap::default();
        for (i, tile) in tiles.iter().enumerate() {
            if positions.insert(tile.id, i).is_some() {
                return Err(PathError::DuplicateTile(tile.id));
            }
        }
        for tile in &tiles {
            if let Some(&neighbor) = tile.neighbors.iter()
                .find(|&&n| !positions.contains_key(&n)) {
                return Err(PathError::UnknownNeighbor { tile: tile.id, neighbor });
            }
        }
        Ok(Path { tiles, positions })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Overwrites the scoring fields of tile `id`. Ids and neighbors can't be
    /// changed once the path is built.
    pub fn set_score(
        &mut self, id: TileId, value: Points, loaded: bool, supplying: bool
        ) -> Result<(), PathError> {
        let i = self.position(id).ok_or(PathError::UnknownTile(id))?;
        let tile = &mut self.tiles[i];
        tile.value = value;
        tile.loaded = loaded;
        tile.supplying = supplying;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn position(&self, id: TileId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[inline]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.position(id).map(|i| &self.tiles[i])
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.positions.contains_key(&id)
    }
}

impl Index<TileId> for Path {
    type Output = Tile;

    // Only used with ids coming from the path itself (neighbors are validated
    // on construction).
    fn index(&self, id: TileId) -> &Tile {
        &self.tiles[self.positions[&id]]
    }
}

impl TryFrom<Vec<Tile>> for Path {
    type Error = PathError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self, Self::Error> {
        Path::new(tiles)
    }
}

impl From<Path> for Vec<Tile> {
    fn from(path: Path) -> Self {
        path.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_ids() {
        let tiles = vec![Tile::new(1, vec![2]), Tile::new(2, vec![1]),
                         Tile::new(1, vec![])];
        assert_eq!(Path::new(tiles), Err(PathError::DuplicateTile(1)));
    }

    #[test]
    fn test_rejects_neighbor_off_the_path() {
        let tiles = vec![Tile::new(1, vec![2]), Tile::new(2, vec![1, 7])];
        assert_eq!(Path::new(tiles),
                   Err(PathError::UnknownNeighbor { tile: 2, neighbor: 7 }));
    }

    #[test]
    fn test_lookup_by_id() {
        let path = Path::new(vec![
            Tile::new(10, vec![20]),
            Tile::new(20, vec![10]).with_role(TileRole::House).played_by(2),
        ]).unwrap();
        assert_eq!(path.position(20), Some(1));
        assert_eq!(path[20].role, Some(TileRole::House));
        assert_eq!(path[20].played_by, Some(2));
        assert!(path.get(30).is_none());
        assert!(!path[10].is_special());
    }

    #[test]
    fn test_set_score_keeps_topology() {
        let mut path = Path::new(vec![
            Tile::new(1, vec![2]).with_role(TileRole::Mine),
            Tile::new(2, vec![1]),
        ]).unwrap();
        path.set_score(1, 7, true, true).unwrap();
        assert_eq!(path[1].value, 7);
        assert!(path[1].loaded);
        assert!(path[1].supplying);
        assert_eq!(path[1].neighbors, vec![2]);
        assert_eq!(path.position(1), Some(0));
        assert_eq!(path[2].value, 0);

        assert_eq!(path.set_score(99, 1, false, false),
                   Err(PathError::UnknownTile(99)));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_json_uses_board_field_names() {
        let json = r#"[
            {"id": 1, "neighbors": [2], "type": "mine", "playedBy": 1},
            {"id": 2, "neighbors": [1]}
        ]"#;
        let path: Path = serde_json::from_str(json).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].role, Some(TileRole::Mine));
        assert_eq!(path[1].played_by, Some(1));
        assert_eq!(path[2].role, None);

        let bad = r#"[{"id": 1, "neighbors": [3]}]"#;
        assert!(serde_json::from_str::<Path>(bad).is_err());
    }
}
