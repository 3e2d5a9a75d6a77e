// Scores a completed path: every tile is worth BASE_TILE_VALUE, special tiles
// add the bonuses of the configured rules, and each tile's value goes to the
// player who played it.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bonus::{apply_bonus, BonusError, BonusRule, Link, SpecialTileGroups};
use crate::tile::{Path, PathError, PlayerId, Points, TileId, BASE_TILE_VALUE};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Tile {tile} is played by player {player}, but there are {players} players")]
    UnknownPlayer { tile: TileId, player: PlayerId, players: usize },
    #[error("Invalid path ({0})")]
    PathError(#[from] PathError),
    #[error("Bonus rule failed ({0})")]
    BonusError(#[from] BonusError),
    #[error("Points credited up to tile {0} do not fit in a score")]
    Overflow(TileId),
}

/// Anything that can be credited points for tiles it played.
pub trait Player {
    fn add_points(&mut self, amount: Points);
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerScore {
    pub points: Points,
}

impl Player for PlayerScore {
    fn add_points(&mut self, amount: Points) {
        self.points = self.points.saturating_add(amount);
    }
}

/// Debug struct to log as JSON for visualization of a scoring pass.
#[derive(Serialize, Debug, Clone, Default)]
pub struct ScoreVisualization {
    // links[rule_index]
    pub links: Vec<Vec<Link>>,
    pub tiles: Vec<TileScore>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileScore {
    pub id: TileId,
    pub value: Points,
    pub loaded: bool,
    pub supplying: bool,
}

/// Final state of a scored path, as printed by the CLI.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    // players[n - 1] for player n
    pub players: Vec<PlayerScore>,
    pub tiles: Vec<TileScore>,
}

impl ScoreReport {
    pub fn new(path: &Path, players: &[PlayerScore]) -> Self {
        ScoreReport {
            players: players.to_vec(),
            tiles: tile_scores(path),
        }
    }
}

fn tile_scores(path: &Path) -> Vec<TileScore> {
    path.tiles().iter().map(|tile| TileScore {
        id: tile.id,
        value: tile.value,
        loaded: tile.loaded,
        supplying: tile.supplying,
    }).collect()
}

/// Bonus rules are applied in order: a gated rule only sees the tiles loaded
/// by the rules before it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PathScorer {
    pub rules: Vec<BonusRule>,
}

impl Default for PathScorer {
    fn default() -> Self {
        PathScorer::new(BonusRule::reference_rules())
    }
}

impl PathScorer {
    pub fn new(rules: Vec<BonusRule>) -> Self {
        PathScorer { rules }
    }

    /// Scores `path` and credits the owner of each tile, in path order.
    ///
    /// Tile values and flags are overwritten, so a path can be scored again
    /// from scratch. Fails without touching the path or the players if a
    /// tile's owner is not in `players` or a value overflows.
    pub fn score_path<P: Player>(
        &self, path: &mut Path, players: &mut [P]
        ) -> Result<(), ScoreError> {
        debug!("Calculating path score ({} tiles)", path.len());
        for tile in path.tiles() {
            if let Some(player) = tile.played_by {
                if player == 0 || player as usize > players.len() {
                    return Err(ScoreError::UnknownPlayer {
                        tile: tile.id, player, players: players.len() });
                }
            }
        }

        let mut groups = SpecialTileGroups::from_path(path);
        let mut visualization: Option<ScoreVisualization> = if cfg!(feature = "visualization_dump") {
            Some(ScoreVisualization::default())
        } else {
            None
        };
        for rule in &self.rules {
            let links = apply_bonus(path, &mut groups, rule)?;
            debug!("{} -> {}: {} of {} links valid", rule.start, rule.end,
                   links.iter().filter(|link| link.valid).count(), links.len());
            if let Some(viz) = &mut visualization {
                viz.links.push(links);
            }
        }

        let value_of = |id: TileId| {
            groups.find(id).map_or(BASE_TILE_VALUE, |special| special.value)
        };
        let mut total: Points = 0;
        for tile in path.tiles() {
            if tile.played_by.is_some() {
                total = total.checked_add(value_of(tile.id))
                    .ok_or(ScoreError::Overflow(tile.id))?;
            }
        }

        let ids: Vec<TileId> = path.tiles().iter().map(|tile| tile.id).collect();
        for id in ids {
            match groups.find(id) {
                Some(special) => path.set_score(id, special.value, special.loaded,
                                                special.supplying)?,
                None => path.set_score(id, BASE_TILE_VALUE, false, false)?,
            }
        }

        for tile in path.tiles() {
            if let Some(player) = tile.played_by {
                players[player as usize - 1].add_points(tile.value);
            }
        }
        info!("Path of {} tiles scored, {} points credited to players",
              path.len(), total);

        if let Some(viz) = &mut visualization {
            viz.tiles = tile_scores(path);
            debug!("[VIZ_DATA] {}", serde_json::json!(viz));
        }
        Ok(())
    }
}
