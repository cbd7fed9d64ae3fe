use std::collections::BTreeMap;
use std::io::Read;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Side;

/// Minute at which the gold differential snapshot is taken as a tempo proxy.
const GOLD_SNAPSHOT_MINUTE: u32 = 14;

/// Per-game features derived from a series event archive.
///
/// Cached as the series feature blob; a finished series never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Game number within the series (1-based)
    pub game_number: u32,

    /// Winning side, when the archive recorded a finish
    pub winner: Side,

    /// Game duration in seconds
    pub duration_secs: u64,

    /// Blue side features
    pub blue: GameTeamRecord,

    /// Red side features
    pub red: GameTeamRecord,
}

impl GameRecord {
    pub fn team(&self, side: Side) -> &GameTeamRecord {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    /// Which side a team id played, when the archive identified the teams.
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if self.blue.team_id.as_deref() == Some(team_id) {
            Some(Side::Blue)
        } else if self.red.team_id.as_deref() == Some(team_id) {
            Some(Side::Red)
        } else {
            None
        }
    }
}

/// One side's draft and objective features for a single game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTeamRecord {
    /// Provider team id, when the archive identified it
    pub team_id: Option<String>,

    /// Picks in draft order
    pub picks: Vec<String>,

    /// Bans in draft order
    pub bans: Vec<String>,

    /// Dragons taken
    pub dragons: u32,

    /// Barons taken
    pub barons: u32,

    /// Towers taken
    pub towers: u32,

    /// Rift heralds taken
    pub heralds: u32,

    /// Whether this side drew first blood
    pub first_blood: bool,

    /// Whether this side took the first tower
    pub first_tower: bool,

    /// Whether this side took the first dragon
    pub first_dragon: bool,

    /// Total gold at the snapshot minute
    pub gold_at_14: i64,
}

/// Event-archive line formats. Unrecognized types are skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ArchiveEvent {
    GameStarted {
        game: u32,
        #[serde(default)]
        blue_team_id: Option<String>,
        #[serde(default)]
        red_team_id: Option<String>,
    },
    DraftAction {
        game: u32,
        side: EventSide,
        action: EventAction,
        champion: String,
    },
    FirstBlood {
        game: u32,
        side: EventSide,
    },
    ObjectiveTaken {
        game: u32,
        side: EventSide,
        objective: String,
    },
    GoldSnapshot {
        game: u32,
        minute: u32,
        blue_gold: i64,
        red_gold: i64,
    },
    GameEnded {
        game: u32,
        winner: EventSide,
        duration_secs: u64,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EventSide {
    Blue,
    Red,
}

impl From<EventSide> for Side {
    fn from(side: EventSide) -> Self {
        match side {
            EventSide::Blue => Side::Blue,
            EventSide::Red => Side::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EventAction {
    Pick,
    Ban,
}

#[derive(Default)]
struct GameBuilder {
    blue: GameTeamRecord,
    red: GameTeamRecord,
    winner: Option<Side>,
    duration_secs: u64,
}

impl GameBuilder {
    fn side_mut(&mut self, side: EventSide) -> &mut GameTeamRecord {
        match side {
            EventSide::Blue => &mut self.blue,
            EventSide::Red => &mut self.red,
        }
    }
}

/// Derive per-game feature records from a raw compressed event archive.
///
/// The archive is gzip-compressed JSON lines and is decompressed entirely in
/// memory; nothing is written to disk. Malformed or unexpectedly-shaped
/// archives yield an empty Vec so one bad series never aborts a multi-series
/// aggregation.
pub fn extract_games(raw: &[u8]) -> Vec<GameRecord> {
    let mut text = String::new();
    if let Err(e) = GzDecoder::new(raw).read_to_string(&mut text) {
        warn!("Event archive failed to decompress: {}", e);
        return Vec::new();
    }

    // BTreeMap keeps games ordered by number
    let mut games: BTreeMap<u32, GameBuilder> = BTreeMap::new();
    let mut bad_lines = 0usize;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let event: ArchiveEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(_) => {
                bad_lines += 1;
                continue;
            }
        };

        match event {
            ArchiveEvent::GameStarted {
                game,
                blue_team_id,
                red_team_id,
            } => {
                let builder = games.entry(game).or_default();
                builder.blue.team_id = blue_team_id;
                builder.red.team_id = red_team_id;
            }
            ArchiveEvent::DraftAction {
                game,
                side,
                action,
                champion,
            } => {
                let team = games.entry(game).or_default().side_mut(side);
                match action {
                    EventAction::Pick => team.picks.push(champion),
                    EventAction::Ban => team.bans.push(champion),
                }
            }
            ArchiveEvent::FirstBlood { game, side } => {
                games.entry(game).or_default().side_mut(side).first_blood = true;
            }
            ArchiveEvent::ObjectiveTaken {
                game,
                side,
                objective,
            } => {
                let builder = games.entry(game).or_default();
                let first = match objective.as_str() {
                    "dragon" => builder.blue.dragons + builder.red.dragons == 0,
                    "tower" => builder.blue.towers + builder.red.towers == 0,
                    _ => false,
                };
                let team = builder.side_mut(side);
                match objective.as_str() {
                    "dragon" => {
                        team.dragons += 1;
                        team.first_dragon |= first;
                    }
                    "baron" => team.barons += 1,
                    "tower" => {
                        team.towers += 1;
                        team.first_tower |= first;
                    }
                    "herald" => team.heralds += 1,
                    other => debug!("Unknown objective type: {}", other),
                }
            }
            ArchiveEvent::GoldSnapshot {
                game,
                minute,
                blue_gold,
                red_gold,
            } => {
                if minute == GOLD_SNAPSHOT_MINUTE {
                    let builder = games.entry(game).or_default();
                    builder.blue.gold_at_14 = blue_gold;
                    builder.red.gold_at_14 = red_gold;
                }
            }
            ArchiveEvent::GameEnded {
                game,
                winner,
                duration_secs,
            } => {
                let builder = games.entry(game).or_default();
                builder.winner = Some(winner.into());
                builder.duration_secs = duration_secs;
            }
            ArchiveEvent::Unknown => {}
        }
    }

    if bad_lines > 0 {
        warn!("Skipped {} unparseable archive lines", bad_lines);
    }

    // Only completed games carry enough signal to aggregate
    games
        .into_iter()
        .filter_map(|(number, builder)| {
            let winner = builder.winner?;
            Some(GameRecord {
                game_number: number,
                winner,
                duration_secs: builder.duration_secs,
                blue: builder.blue,
                red: builder.red,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip_lines(lines: &[serde_json::Value]) -> Vec<u8> {
        let text = lines
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn sample_archive() -> Vec<u8> {
        gzip_lines(&[
            serde_json::json!({"type": "game_started", "game": 1, "blue_team_id": "t1", "red_team_id": "t2"}),
            serde_json::json!({"type": "draft_action", "game": 1, "side": "blue", "action": "ban", "champion": "yasuo"}),
            serde_json::json!({"type": "draft_action", "game": 1, "side": "red", "action": "ban", "champion": "akali"}),
            serde_json::json!({"type": "draft_action", "game": 1, "side": "blue", "action": "pick", "champion": "ahri"}),
            serde_json::json!({"type": "draft_action", "game": 1, "side": "red", "action": "pick", "champion": "jinx"}),
            serde_json::json!({"type": "first_blood", "game": 1, "side": "blue"}),
            serde_json::json!({"type": "objective_taken", "game": 1, "side": "red", "objective": "dragon"}),
            serde_json::json!({"type": "objective_taken", "game": 1, "side": "blue", "objective": "dragon"}),
            serde_json::json!({"type": "objective_taken", "game": 1, "side": "blue", "objective": "tower"}),
            serde_json::json!({"type": "gold_snapshot", "game": 1, "minute": 14, "blue_gold": 24500, "red_gold": 23100}),
            serde_json::json!({"type": "game_ended", "game": 1, "winner": "blue", "duration_secs": 1912}),
        ])
    }

    #[test]
    fn test_extract_single_game() {
        let games = extract_games(&sample_archive());
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.game_number, 1);
        assert_eq!(game.winner, Side::Blue);
        assert_eq!(game.duration_secs, 1912);
        assert_eq!(game.blue.picks, vec!["ahri"]);
        assert_eq!(game.blue.bans, vec!["yasuo"]);
        assert_eq!(game.red.picks, vec!["jinx"]);
        assert!(game.blue.first_blood);
        assert!(!game.red.first_blood);
        // Red took the first dragon, blue the second
        assert!(game.red.first_dragon);
        assert!(!game.blue.first_dragon);
        assert!(game.blue.first_tower);
        assert_eq!(game.blue.gold_at_14, 24500);
        assert_eq!(game.side_of("t2"), Some(Side::Red));
    }

    #[test]
    fn test_unfinished_game_is_dropped() {
        let archive = gzip_lines(&[
            serde_json::json!({"type": "game_started", "game": 1}),
            serde_json::json!({"type": "draft_action", "game": 1, "side": "blue", "action": "pick", "champion": "ahri"}),
        ]);
        assert!(extract_games(&archive).is_empty());
    }

    #[test]
    fn test_not_gzip_yields_empty() {
        assert!(extract_games(b"definitely not gzip").is_empty());
    }

    #[test]
    fn test_bad_lines_are_skipped_not_fatal() {
        let mut lines = vec![serde_json::json!({"type": "game_started", "game": 1})];
        lines.push(serde_json::json!({"type": "something_new", "payload": 42}));
        lines.push(serde_json::json!({"type": "game_ended", "game": 1, "winner": "red", "duration_secs": 100}));
        let games = extract_games(&gzip_lines(&lines));
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].winner, Side::Red);
    }

    #[test]
    fn test_games_ordered_by_number() {
        let archive = gzip_lines(&[
            serde_json::json!({"type": "game_ended", "game": 2, "winner": "red", "duration_secs": 1800}),
            serde_json::json!({"type": "game_ended", "game": 1, "winner": "blue", "duration_secs": 1700}),
        ]);
        let games = extract_games(&archive);
        assert_eq!(games[0].game_number, 1);
        assert_eq!(games[1].game_number, 2);
    }
}
