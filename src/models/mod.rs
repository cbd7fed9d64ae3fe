pub mod analysis;
pub mod draft;
pub mod job;
pub mod profile;

pub use analysis::{
    AnalysisWarning, CompositionAnalysis, DraftAnalysis, DraftPhase, EnemyPrediction,
    InsightSection, Recommendation, RecommendationTag, StrategyInsights, WarningSeverity,
    WinProbability,
};
pub use draft::{ActionType, DraftState, Side};
pub use job::{JobStatus, PrepareJob};
pub use profile::{
    ChampionPickStats, GameDraftSummary, MatchSummary, ObjectiveStats, PlayerStats, TeamProfile,
};
