use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoritative end-of-series payload from the provider.
///
/// Serialize is derived so the raw payload can be cached as-is; a finished
/// series never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEndState {
    /// Provider series id
    pub id: String,

    /// Tournament name
    pub tournament: Option<String>,

    /// When the series finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Both teams; order is provider-defined
    pub teams: Vec<EndStateTeam>,
}

impl SeriesEndState {
    /// The entry for a given team id, if present.
    pub fn team(&self, team_id: &str) -> Option<&EndStateTeam> {
        self.teams
            .iter()
            .find(|t| t.id.as_deref() == Some(team_id))
    }

    /// The other team. `None` when the provider did not identify it; the
    /// series still counts for the acting team's own stats.
    pub fn opponent(&self, team_id: &str) -> Option<&EndStateTeam> {
        self.teams
            .iter()
            .find(|t| t.id.is_some() && t.id.as_deref() != Some(team_id))
    }
}

/// One team's series-level result and roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndStateTeam {
    /// Provider team id; may be missing for unidentified opponents
    pub id: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Logo URL
    pub logo_url: Option<String>,

    /// Games won in the series
    pub score: u32,

    /// Whether this team won the series
    pub won: bool,

    /// Series roster with per-series stat totals
    #[serde(default)]
    pub players: Vec<EndStatePlayer>,
}

/// Per-player series totals from the end-state roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndStatePlayer {
    /// Provider player id
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Games this player appeared in
    #[serde(default)]
    pub games: u32,

    /// Kill total across the series
    #[serde(default)]
    pub kills: u32,

    /// Death total
    #[serde(default)]
    pub deaths: u32,

    /// Assist total
    #[serde(default)]
    pub assists: u32,

    /// Champions this player played during the series
    #[serde(default)]
    pub champions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_state() -> SeriesEndState {
        serde_json::from_value(serde_json::json!({
            "id": "s1",
            "tournament": "LEC",
            "finishedAt": "2026-07-01T18:00:00Z",
            "teams": [
                { "id": "t1", "name": "Alpha", "score": 2, "won": true },
                { "id": "t2", "name": "Beta", "score": 1, "won": false }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_team_and_opponent_lookup() {
        let state = end_state();
        assert_eq!(state.team("t1").unwrap().name.as_deref(), Some("Alpha"));
        assert_eq!(state.opponent("t1").unwrap().id.as_deref(), Some("t2"));
    }

    #[test]
    fn test_opponent_missing_id_is_none() {
        let state: SeriesEndState = serde_json::from_value(serde_json::json!({
            "id": "s2",
            "teams": [
                { "id": "t1", "name": "Alpha", "score": 0, "won": false },
                { "id": null, "name": "Unknown", "score": 2, "won": true }
            ]
        }))
        .unwrap();
        assert!(state.opponent("t1").is_none());
        assert!(state.team("t1").is_some());
    }
}
