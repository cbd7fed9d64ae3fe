use crate::models::{InsightSection, StrategyInsights, TeamProfile};

/// Profile-derived strategy guidance, computed only when both teams'
/// profiles are available. Scores are signed: positive favors the assisted
/// team.
pub fn derive(ours: &TeamProfile, theirs: &TeamProfile) -> StrategyInsights {
    StrategyInsights {
        early_game: early_game(ours, theirs),
        objective_focus: objective_focus(ours, theirs),
        tempo: tempo(ours, theirs),
    }
}

/// Early-game edge from first-blood/first-tower/first-dragon rates.
fn early_game(ours: &TeamProfile, theirs: &TeamProfile) -> InsightSection {
    let our_rate = (ours.objectives.first_blood_rate()
        + ours.objectives.first_tower_rate()
        + ours.objectives.first_dragon_rate())
        / 3.0;
    let their_rate = (theirs.objectives.first_blood_rate()
        + theirs.objectives.first_tower_rate()
        + theirs.objectives.first_dragon_rate())
        / 3.0;
    let score = (our_rate - their_rate) * 100.0;

    let label = if score > 10.0 {
        "Strong early-game edge"
    } else if score > 3.0 {
        "Slight early-game edge"
    } else if score >= -3.0 {
        "Even early game"
    } else {
        "Enemy favored early"
    };

    let mut recommendations = Vec::new();
    if score > 3.0 {
        recommendations.push("Force early skirmishes before the enemy stabilizes".to_string());
    } else if score < -3.0 {
        recommendations.push("Trade safely and look for a mid-game power spike".to_string());
        recommendations.push("Ward deep early to blunt their aggression".to_string());
    }

    InsightSection {
        score,
        label: label.to_string(),
        recommendations,
    }
}

/// Which neutral objectives each team actually takes.
fn objective_focus(ours: &TeamProfile, theirs: &TeamProfile) -> InsightSection {
    let dragon_edge = ours.objectives.avg_dragons() - theirs.objectives.avg_dragons();
    let herald_edge = ours.objectives.avg_heralds() - theirs.objectives.avg_heralds();
    let score = (dragon_edge + herald_edge) * 10.0;

    let label = if dragon_edge > 0.3 {
        "Dragon-dominant"
    } else if herald_edge > 0.2 {
        "Herald and tempo focused"
    } else if score < -3.0 {
        "Enemy controls neutral objectives"
    } else {
        "Contested objective control"
    };

    let mut recommendations = Vec::new();
    if dragon_edge < -0.3 {
        recommendations.push("Set up vision around the dragon pit before spawns".to_string());
    }
    if theirs.objectives.avg_barons() > ours.objectives.avg_barons() + 0.2 {
        recommendations.push("Deny baron attempts, they close games through it".to_string());
    }
    recommendations.truncate(2);

    InsightSection {
        score,
        label: label.to_string(),
        recommendations,
    }
}

/// Game-length and mid-game gold comparison.
fn tempo(ours: &TeamProfile, theirs: &TeamProfile) -> InsightSection {
    // Shorter average games and a better gold curve both mean faster tempo
    let duration_edge_mins =
        (theirs.objectives.avg_duration_secs() - ours.objectives.avg_duration_secs()) / 60.0;
    let gold_edge =
        (ours.objectives.avg_gold_diff_at_14() - theirs.objectives.avg_gold_diff_at_14()) / 1000.0;
    let score = duration_edge_mins + gold_edge;

    let label = if score > 2.0 {
        "Faster tempo"
    } else if score >= -2.0 {
        "Comparable tempo"
    } else {
        "Enemy plays faster"
    };

    let mut recommendations = Vec::new();
    if score > 2.0 {
        recommendations.push("Press the pace, they prefer longer games".to_string());
    } else if score < -2.0 {
        recommendations.push("Stall early fights and scale into the late game".to_string());
    }

    InsightSection {
        score,
        label: label.to_string(),
        recommendations,
    }
}
