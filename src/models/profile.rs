use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated statistical profile for one team, built from its recent series
/// and cached under a team-derived key.
///
/// A profile is either wholly absent from the cache or fully populated; the
/// aggregator only writes it after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    /// Provider team identifier
    pub team_id: String,

    /// Display name
    pub team_name: String,

    /// Logo URL, when the provider supplies one
    pub logo_url: Option<String>,

    /// Series won across the aggregated window
    pub series_wins: u32,

    /// Series lost across the aggregated window
    pub series_losses: u32,

    /// Per-champion pick statistics, keyed by champion id
    pub champion_picks: HashMap<String, ChampionPickStats>,

    /// Times each champion was banned against this team, keyed by champion id
    pub bans_against: HashMap<String, u32>,

    /// Per-player statistics, keyed by player id
    pub players: HashMap<String, PlayerStats>,

    /// Lightweight summaries of recent matches, most recent first
    pub recent_matches: Vec<MatchSummary>,

    /// Objective averages and first-objective rates across aggregated games
    pub objectives: ObjectiveStats,

    /// Series skipped because neither end-state nor archive could be fetched
    pub skipped_series: u32,

    /// When this profile was aggregated
    pub last_updated: DateTime<Utc>,
}

impl TeamProfile {
    /// Series win rate in [0, 1], derived from raw counts on read.
    pub fn win_rate(&self) -> f64 {
        let total = self.series_wins + self.series_losses;
        if total == 0 {
            0.0
        } else {
            self.series_wins as f64 / total as f64
        }
    }

    /// Total games played across aggregated series (sum of champion picks / 5).
    pub fn games_played(&self) -> u32 {
        self.champion_picks.values().map(|s| s.picks).sum::<u32>() / 5
    }

    /// Pick frequency for a champion in [0, 1] relative to games played.
    pub fn pick_frequency(&self, champion_id: &str) -> f64 {
        let games = self.games_played();
        if games == 0 {
            return 0.0;
        }
        self.champion_picks
            .get(champion_id)
            .map(|s| s.picks as f64 / games as f64)
            .unwrap_or(0.0)
    }
}

/// Raw pick counters for one champion; win rate is derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionPickStats {
    /// Times this champion was picked by the team
    pub picks: u32,

    /// Games won with this champion on the team
    pub wins: u32,
}

impl ChampionPickStats {
    /// Win rate with this champion in [0, 1].
    pub fn win_rate(&self) -> f64 {
        if self.picks == 0 {
            0.0
        } else {
            self.wins as f64 / self.picks as f64
        }
    }
}

/// Per-player champion pool and rolling per-game averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Display name
    pub name: String,

    /// Series in which the player fielded each champion, keyed by champion id
    pub champion_pool: HashMap<String, u32>,

    /// Games this player appeared in
    pub games: u32,

    /// Total kills across appearances (averages derived on read)
    pub kills: u32,

    /// Total deaths across appearances
    pub deaths: u32,

    /// Total assists across appearances
    pub assists: u32,
}

impl PlayerStats {
    /// Average kills per game.
    pub fn avg_kills(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.kills as f64 / self.games as f64
        }
    }

    /// Average deaths per game.
    pub fn avg_deaths(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.deaths as f64 / self.games as f64
        }
    }

    /// Average assists per game.
    pub fn avg_assists(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.assists as f64 / self.games as f64
        }
    }
}

/// Lightweight summary of one recent series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    /// Provider series identifier
    pub series_id: String,

    /// Opponent team id, when the provider identified one
    pub opponent_id: Option<String>,

    /// Opponent display name
    pub opponent_name: Option<String>,

    /// Whether this team won the series
    pub won: bool,

    /// Game score, e.g. 2-1
    pub score: (u32, u32),

    /// When the series finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Tournament name
    pub tournament: Option<String>,

    /// Per-game pick/ban lists for both sides
    pub games: Vec<GameDraftSummary>,
}

/// Picks and bans for one game within a series, both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDraftSummary {
    /// Game number within the series (1-based)
    pub game_number: u32,

    /// This team's picks, in draft order
    pub team_picks: Vec<String>,

    /// This team's bans
    pub team_bans: Vec<String>,

    /// Opponent picks
    pub opponent_picks: Vec<String>,

    /// Opponent bans
    pub opponent_bans: Vec<String>,

    /// Whether this team won the game
    pub won: bool,
}

/// Objective counters accumulated across games; rates derived on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveStats {
    /// Games contributing to these counters
    pub games: u32,

    /// Total dragons taken
    pub dragons: u32,

    /// Total barons taken
    pub barons: u32,

    /// Total towers taken
    pub towers: u32,

    /// Total rift heralds taken
    pub heralds: u32,

    /// Games where this team drew first blood
    pub first_bloods: u32,

    /// Games where this team took the first tower
    pub first_towers: u32,

    /// Games where this team took the first dragon
    pub first_dragons: u32,

    /// Total game duration in seconds (for average duration)
    pub total_duration_secs: u64,

    /// Sum of gold differential at 14 minutes (proxy for tempo)
    pub total_gold_diff_at_14: i64,
}

impl ObjectiveStats {
    /// Average of a raw counter per game.
    fn per_game(&self, total: u32) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            total as f64 / self.games as f64
        }
    }

    pub fn avg_dragons(&self) -> f64 {
        self.per_game(self.dragons)
    }

    pub fn avg_barons(&self) -> f64 {
        self.per_game(self.barons)
    }

    pub fn avg_towers(&self) -> f64 {
        self.per_game(self.towers)
    }

    pub fn avg_heralds(&self) -> f64 {
        self.per_game(self.heralds)
    }

    /// Share of games with first blood, in [0, 1].
    pub fn first_blood_rate(&self) -> f64 {
        self.per_game(self.first_bloods)
    }

    /// Share of games with the first tower, in [0, 1].
    pub fn first_tower_rate(&self) -> f64 {
        self.per_game(self.first_towers)
    }

    /// Share of games with the first dragon, in [0, 1].
    pub fn first_dragon_rate(&self) -> f64 {
        self.per_game(self.first_dragons)
    }

    /// Average game duration in seconds.
    pub fn avg_duration_secs(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_duration_secs as f64 / self.games as f64
        }
    }

    /// Average gold differential at 14 minutes.
    pub fn avg_gold_diff_at_14(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_gold_diff_at_14 as f64 / self.games as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_derived_from_counts() {
        let mut profile = empty_profile();
        profile.series_wins = 3;
        profile.series_losses = 1;
        assert_eq!(profile.win_rate(), 0.75);
    }

    #[test]
    fn test_win_rate_zero_series() {
        let profile = empty_profile();
        assert_eq!(profile.win_rate(), 0.0);
    }

    #[test]
    fn test_champion_win_rate() {
        let stats = ChampionPickStats { picks: 2, wins: 2 };
        assert_eq!(stats.win_rate(), 1.0);

        let stats = ChampionPickStats { picks: 4, wins: 1 };
        assert_eq!(stats.win_rate(), 0.25);
    }

    #[test]
    fn test_objective_rates() {
        let stats = ObjectiveStats {
            games: 4,
            dragons: 10,
            first_bloods: 3,
            total_duration_secs: 4 * 1800,
            ..Default::default()
        };
        assert_eq!(stats.avg_dragons(), 2.5);
        assert_eq!(stats.first_blood_rate(), 0.75);
        assert_eq!(stats.avg_duration_secs(), 1800.0);
    }

    fn empty_profile() -> TeamProfile {
        TeamProfile {
            team_id: "t1".into(),
            team_name: "Test".into(),
            logo_url: None,
            series_wins: 0,
            series_losses: 0,
            champion_picks: HashMap::new(),
            bans_against: HashMap::new(),
            players: HashMap::new(),
            recent_matches: Vec::new(),
            objectives: ObjectiveStats::default(),
            skipped_series: 0,
            last_updated: Utc::now(),
        }
    }
}
