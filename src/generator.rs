// Builds boards to score without a board layer: straight lines for tests, and
// seeded random grids for benchmarks and the CLI.

use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::{Path, PlayerId, Tile, TileId, TileRole};

/// Largest number of tiles a generated grid may have.
pub const MAX_GRID_TILES: u32 = 1 << 20;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("A {width}x{height} grid has more than {max} tiles", max = MAX_GRID_TILES)]
    TooLarge { width: u32, height: u32 },
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GridParams {
    pub width: u32,
    pub height: u32,
    /// Chance for each tile to get a special role.
    pub special_probability: f64,
    /// Owners are drawn from 1..=players. With 0 players no tile is owned.
    pub players: u8,
    /// Chance for each tile to be owned by a player.
    pub owned_probability: f64,
    pub seed: u64,
}

impl Default for GridParams {
    fn default() -> Self {
        GridParams {
            width: 8,
            height: 8,
            special_probability: 0.15,
            players: 2,
            owned_probability: 0.6,
            seed: 42,
        }
    }
}

/// Tiles `0..roles.len()` in a row, each one linked to the next.
pub fn line_path(roles: &[Option<TileRole>]) -> Path {
    let tiles = roles.iter().enumerate().map(|(i, role)| {
        let id = i as TileId;
        let mut neighbors = Vec::new();
        if i > 0 {
            neighbors.push(id - 1);
        }
        if i + 1 < roles.len() {
            neighbors.push(id + 1);
        }
        Tile { role: *role, ..Tile::new(id, neighbors) }
    }).collect();
    Path::new(tiles).expect("line neighbors are always on the path")
}

/// Fills a whole `width` x `height` grid, tiles linked to their 4 neighbors.
/// Tile ids are `y * width + x`, so grids over MAX_GRID_TILES are rejected.
pub fn random_grid_path(params: &GridParams) -> Result<Path, GridError> {
    let (width, height) = (params.width, params.height);
    let tile_count = width.checked_mul(height)
        .filter(|&count| count <= MAX_GRID_TILES)
        .ok_or(GridError::TooLarge { width, height })?;
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let special_probability = params.special_probability.clamp(0.0, 1.0);
    let owned_probability = params.owned_probability.clamp(0.0, 1.0);
    let mut tiles = Vec::with_capacity(tile_count as usize);
    for y in 0..height {
        for x in 0..width {
            const DELTAS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
            let neighbors = DELTAS.iter().filter_map(|&(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    None
                } else {
                    Some((ny as TileId) * width + nx as TileId)
                }
            }).collect();
            let mut tile = Tile::new(y * width + x, neighbors);
            if rng.gen_bool(special_probability) {
                tile.role = Some(TileRole::ALL[rng.gen_range(0..TileRole::ALL.len())]);
            }
            if params.players > 0 && rng.gen_bool(owned_probability) {
                let player: PlayerId = rng.gen_range(1..=params.players);
                tile.played_by = Some(player);
            }
            tiles.push(tile);
        }
    }
    Ok(Path::new(tiles).expect("grid neighbors are always on the path"))
}
