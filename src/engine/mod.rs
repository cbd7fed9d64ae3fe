pub mod composition;
pub mod insights;
pub mod phase;
pub mod scoring;
pub mod winprob;

use std::collections::HashSet;

use thiserror::Error;

use crate::champions::{Champion, ChampionCatalog};
use crate::models::{
    AnalysisWarning, DraftAnalysis, DraftPhase, DraftState, Side, TeamProfile, WarningSeverity,
};

pub use phase::{action_at, phase_at, DRAFT_SEQUENCE};

/// The engine only raises for structurally invalid draft states; missing
/// team data degrades the analysis, it never fails it.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid draft state: {0}")]
    InvalidDraftState(String),
}

/// Analyze a live draft.
///
/// Pure and deterministic given its inputs: no I/O, no hidden state, no
/// suspension points. Profiles are optional; every sub-computation degrades
/// to global champion rates when they are absent.
pub fn analyze(
    draft: &DraftState,
    our_profile: Option<&TeamProfile>,
    enemy_profile: Option<&TeamProfile>,
    our_side: Side,
    catalog: &ChampionCatalog,
) -> Result<DraftAnalysis, EngineError> {
    validate(draft)?;

    let phase = if draft.is_finished {
        DraftPhase::Complete
    } else {
        phase_at(draft.turn)
    };
    let acting = if draft.is_finished {
        None
    } else {
        action_at(draft.turn)
    };

    let used = draft.used_champions();
    let our_picks = resolve(catalog, draft.picks(our_side));
    let enemy_picks = resolve(catalog, draft.picks(our_side.opposite()));

    let mut recommendations = Vec::new();
    let mut enemy_predictions = Vec::new();
    match acting {
        Some((side, action)) if side == our_side => {
            recommendations = scoring::recommend(
                catalog,
                &used,
                action,
                our_profile,
                enemy_profile,
                &our_picks,
                &enemy_picks,
            );
        }
        Some(_) => {
            enemy_predictions =
                scoring::predict_enemy(catalog, &used, enemy_profile, &enemy_picks);
        }
        None => {}
    }

    let blue_picks = resolve(catalog, &draft.blue_picks);
    let red_picks = resolve(catalog, &draft.red_picks);
    let (blue_profile, red_profile) = match our_side {
        Side::Blue => (our_profile, enemy_profile),
        Side::Red => (enemy_profile, our_profile),
    };

    let insights = match (our_profile, enemy_profile) {
        (Some(ours), Some(theirs)) => Some(insights::derive(ours, theirs)),
        _ => None,
    };

    Ok(DraftAnalysis {
        phase,
        acting_side: acting.map(|(side, _)| side),
        action: acting.map(|(_, action)| action),
        recommendations,
        enemy_predictions,
        blue_composition: composition::analyze(&blue_picks),
        red_composition: composition::analyze(&red_picks),
        win_probability: winprob::estimate(&blue_picks, &red_picks, blue_profile, red_profile),
        insights,
        warnings: warnings(phase, our_profile, enemy_profile),
    })
}

/// Structural validation: turn bounds, per-side action counts against the
/// fixed order table, and champion uniqueness.
fn validate(draft: &DraftState) -> Result<(), EngineError> {
    if draft.turn > DRAFT_SEQUENCE.len() {
        return Err(EngineError::InvalidDraftState(format!(
            "turn index {} exceeds the {}-action draft sequence",
            draft.turn,
            DRAFT_SEQUENCE.len()
        )));
    }

    let expected = phase::expected_counts(draft.turn);
    let actual = phase::SideCounts {
        blue_bans: draft.blue_bans.len(),
        blue_picks: draft.blue_picks.len(),
        red_bans: draft.red_bans.len(),
        red_picks: draft.red_picks.len(),
    };
    if expected != actual {
        return Err(EngineError::InvalidDraftState(format!(
            "action counts do not match turn {}: expected {:?}, got {:?}",
            draft.turn, expected, actual
        )));
    }

    let used = draft.used_champions();
    let mut seen = HashSet::new();
    for id in &used {
        if !seen.insert(*id) {
            return Err(EngineError::InvalidDraftState(format!(
                "champion {} appears more than once",
                id
            )));
        }
    }

    Ok(())
}

/// Resolve champion ids against the catalogue; unknown ids are tolerated
/// and simply carry no stats.
fn resolve<'a>(catalog: &'a ChampionCatalog, ids: &[String]) -> Vec<&'a Champion> {
    ids.iter().filter_map(|id| catalog.get(id)).collect()
}

/// Data-quality warnings, generated independently of the recommendation
/// pass.
fn warnings(
    phase: DraftPhase,
    our_profile: Option<&TeamProfile>,
    enemy_profile: Option<&TeamProfile>,
) -> Vec<AnalysisWarning> {
    let mut warnings = Vec::new();

    match (our_profile, enemy_profile) {
        (None, None) => warnings.push(AnalysisWarning {
            severity: WarningSeverity::Warning,
            message: "No team data available for either side".to_string(),
            suggestion: Some(
                "Start a team preparation job to enable team-specific recommendations"
                    .to_string(),
            ),
        }),
        (None, Some(_)) => warnings.push(AnalysisWarning {
            severity: WarningSeverity::Info,
            message: "No data for your team; recommendations use global rates".to_string(),
            suggestion: None,
        }),
        (Some(_), None) => warnings.push(AnalysisWarning {
            severity: WarningSeverity::Info,
            message: "No data for the enemy team; predictions use global rates".to_string(),
            suggestion: None,
        }),
        (Some(_), Some(_)) => {}
    }

    if phase == DraftPhase::Complete {
        warnings.push(AnalysisWarning {
            severity: WarningSeverity::Info,
            message: "Draft is complete".to_string(),
            suggestion: None,
        });
    }

    warnings
}
