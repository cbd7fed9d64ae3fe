use serde::{Deserialize, Serialize};

/// Which side of the draft a team occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Blue => "BLUE",
            Side::Red => "RED",
        }
    }
}

/// Whether a draft turn is a pick or a ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Pick,
    Ban,
}

/// Live draft state as reported by the caller.
///
/// Champions are referenced by catalogue id. The turn index counts completed
/// actions and is bounded by the fixed 20-action draft sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    /// Blue side bans, in the order they happened
    #[serde(default)]
    pub blue_bans: Vec<String>,

    /// Blue side picks, in the order they happened
    #[serde(default)]
    pub blue_picks: Vec<String>,

    /// Red side bans
    #[serde(default)]
    pub red_bans: Vec<String>,

    /// Red side picks
    #[serde(default)]
    pub red_picks: Vec<String>,

    /// Number of completed actions (index of the next turn)
    #[serde(default)]
    pub turn: usize,

    /// Terminal flag set by the caller once the draft ends
    #[serde(default)]
    pub is_finished: bool,
}

impl DraftState {
    /// All champion ids already picked or banned by either side.
    pub fn used_champions(&self) -> Vec<&str> {
        self.blue_bans
            .iter()
            .chain(self.blue_picks.iter())
            .chain(self.red_bans.iter())
            .chain(self.red_picks.iter())
            .map(String::as_str)
            .collect()
    }

    /// Picks for one side.
    pub fn picks(&self, side: Side) -> &[String] {
        match side {
            Side::Blue => &self.blue_picks,
            Side::Red => &self.red_picks,
        }
    }

    /// Bans for one side.
    pub fn bans(&self, side: Side) -> &[String] {
        match side {
            Side::Blue => &self.blue_bans,
            Side::Red => &self.red_bans,
        }
    }
}
