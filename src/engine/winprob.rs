use crate::champions::Champion;
use crate::models::{TeamProfile, WinProbability};

/// Weight applied to each picked champion's deviation from a 50% win rate.
const PICK_WEIGHT: f64 = 30.0;

/// Weight applied to a team's historical series win rate deviation.
const PROFILE_WEIGHT: f64 = 20.0;

/// Heuristic win-probability estimate.
///
/// Both sides start at 50, picked champions shift their side by their global
/// win-rate deviation, and team strength shifts further when a profile is
/// available. The two sides are normalized to sum to exactly 100; rounding
/// is applied last, to the blue side only, so the pair can never drift to a
/// 99.9/50.1-style artifact.
pub fn estimate(
    blue_picks: &[&Champion],
    red_picks: &[&Champion],
    blue_profile: Option<&TeamProfile>,
    red_profile: Option<&TeamProfile>,
) -> WinProbability {
    let blue = side_score(blue_picks, blue_profile);
    let red = side_score(red_picks, red_profile);

    let blue_pct = (blue / (blue + red) * 100.0).clamp(0.0, 100.0);
    // One decimal of precision on the displayed side; red is the remainder
    let blue_rounded = (blue_pct * 10.0).round() / 10.0;

    WinProbability {
        blue: blue_rounded,
        red: 100.0 - blue_rounded,
    }
}

fn side_score(picks: &[&Champion], profile: Option<&TeamProfile>) -> f64 {
    let mut score = 50.0;

    for champion in picks {
        score += (champion.win_rate - 0.5) * PICK_WEIGHT;
    }

    if let Some(profile) = profile {
        // Thin profiles should not swing the estimate as hard as deep ones
        let series = (profile.series_wins + profile.series_losses) as f64;
        let confidence = (series / 5.0).min(1.0);
        score += (profile.win_rate() - 0.5) * PROFILE_WEIGHT * confidence;
    }

    // A side can never be scored out of existence
    score.max(1.0)
}
