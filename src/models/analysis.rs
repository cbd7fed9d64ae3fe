use serde::{Deserialize, Serialize};

use crate::models::draft::{ActionType, Side};

/// Full engine output for one draft state.
///
/// Ephemeral: recomputed on every call and never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAnalysis {
    /// Current draft phase
    pub phase: DraftPhase,

    /// Side acting on the current turn, absent once the draft is complete
    pub acting_side: Option<Side>,

    /// Action type for the current turn
    pub action: Option<ActionType>,

    /// Ranked suggestions for the assisted side's next action
    pub recommendations: Vec<Recommendation>,

    /// Ranked predictions of the enemy's next action
    pub enemy_predictions: Vec<EnemyPrediction>,

    /// Composition analysis for the blue side
    pub blue_composition: Option<CompositionAnalysis>,

    /// Composition analysis for the red side
    pub red_composition: Option<CompositionAnalysis>,

    /// Win probability estimate for both sides
    pub win_probability: WinProbability,

    /// Strategy insights, present when both team profiles were available
    pub insights: Option<StrategyInsights>,

    /// Warnings about data quality or draft state
    pub warnings: Vec<AnalysisWarning>,
}

/// Phase of the fixed 20-action draft sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftPhase {
    /// Turns 0-5
    BanPhase1,
    /// Turns 6-11
    PickPhase1,
    /// Turns 12-15
    BanPhase2,
    /// Turns 16-19
    PickPhase2,
    /// Turn 20 and beyond
    Complete,
}

/// One scored pick/ban candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Champion catalogue id
    pub champion_id: String,

    /// Champion display name
    pub champion_name: String,

    /// Composite score (higher is better)
    pub score: f64,

    /// Categorical tags for the bonuses that fired
    pub tags: Vec<RecommendationTag>,

    /// Human-readable reasons, ordered by contribution size
    pub reasons: Vec<String>,
}

/// Why a candidate scored well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationTag {
    /// Disproportionately frequent in the assisted team's pick history
    Signature,
    /// High historical win rate for this team specifically
    HighWinrate,
    /// Counters a revealed enemy pick
    Counter,
    /// Complements already-picked teammates
    Synergy,
    /// Denies a champion the enemy team favors
    Deny,
    /// Playable in multiple roles
    Flex,
}

/// One predicted enemy action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyPrediction {
    /// Champion catalogue id
    pub champion_id: String,

    /// Champion display name
    pub champion_name: String,

    /// Probability-like percentage in [0, 100]
    pub probability: f64,

    /// Single reason string
    pub reason: String,
}

/// Damage profile and rule-derived strengths/weaknesses for one side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionAnalysis {
    /// Physical-damage-leaning picks
    pub physical_damage: u32,

    /// Magic-damage-leaning picks
    pub magic_damage: u32,

    /// Up to two strength strings
    pub strengths: Vec<String>,

    /// Up to two weakness strings
    pub weaknesses: Vec<String>,
}

/// Win probability for both sides; the two values always sum to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbability {
    /// Blue side probability in [0, 100]
    pub blue: f64,

    /// Red side probability in [0, 100]
    pub red: f64,
}

/// Profile-derived strategy guidance; only meaningful with both profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInsights {
    /// Early-game edge from historical early-objective rates
    pub early_game: InsightSection,

    /// Which objectives each team prioritizes
    pub objective_focus: InsightSection,

    /// Game-length and gold-tempo comparison
    pub tempo: InsightSection,
}

/// One insight with a signed score, qualitative label and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSection {
    /// Signed score; positive favors the assisted team
    pub score: f64,

    /// Qualitative label
    pub label: String,

    /// Up to two short recommendation strings
    pub recommendations: Vec<String>,
}

/// Warning surfaced alongside the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisWarning {
    /// Severity classification
    pub severity: WarningSeverity,

    /// What happened
    pub message: String,

    /// Optional suggestion for the caller
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Critical,
}
