use std::cmp::Ordering;

use crate::champions::{Champion, ChampionCatalog, ClassTag};
use crate::models::{
    ActionType, EnemyPrediction, Recommendation, RecommendationTag, TeamProfile,
};

/// Candidates returned per call.
const TOP_N: usize = 5;

/// Most reasons carried per recommendation.
const MAX_REASONS: usize = 3;

/// A champion must appear in at least this share of the team's games to
/// count as a signature pick.
const SIGNATURE_FREQUENCY: f64 = 0.4;

/// Everything a scoring rule may look at for one candidate.
pub struct ScoreContext<'a> {
    pub champion: &'a Champion,
    pub action: ActionType,
    pub our_profile: Option<&'a TeamProfile>,
    pub enemy_profile: Option<&'a TeamProfile>,
    pub our_picks: &'a [&'a Champion],
    pub enemy_picks: &'a [&'a Champion],
}

/// Contribution of one rule to a candidate's score.
pub struct RuleHit {
    pub delta: f64,
    pub tag: Option<RecommendationTag>,
    pub reason: Option<String>,
}

/// A named, pure scoring rule. Rules are summed; each can be unit-tested on
/// its own.
pub struct ScoringRule {
    pub name: &'static str,
    pub apply: fn(&ScoreContext) -> Option<RuleHit>,
}

pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule {
        name: "signature",
        apply: signature_rule,
    },
    ScoringRule {
        name: "team_winrate",
        apply: team_winrate_rule,
    },
    ScoringRule {
        name: "synergy",
        apply: synergy_rule,
    },
    ScoringRule {
        name: "counter",
        apply: counter_rule,
    },
    ScoringRule {
        name: "denial",
        apply: denial_rule,
    },
    ScoringRule {
        name: "flex",
        apply: flex_rule,
    },
];

/// Champion appears disproportionately often in the assisted team's history.
fn signature_rule(ctx: &ScoreContext) -> Option<RuleHit> {
    let profile = ctx.our_profile?;
    let frequency = profile.pick_frequency(&ctx.champion.id);
    if frequency < SIGNATURE_FREQUENCY {
        return None;
    }
    Some(RuleHit {
        delta: frequency * 8.0,
        tag: Some(RecommendationTag::Signature),
        reason: Some(format!(
            "Signature pick ({:.0}% of recent games)",
            frequency * 100.0
        )),
    })
}

/// High historical win rate for this team specifically.
fn team_winrate_rule(ctx: &ScoreContext) -> Option<RuleHit> {
    let stats = ctx.our_profile?.champion_picks.get(&ctx.champion.id)?;
    if stats.picks < 2 || stats.win_rate() < 0.6 {
        return None;
    }
    Some(RuleHit {
        delta: (stats.win_rate() - 0.5) * 12.0,
        tag: Some(RecommendationTag::HighWinrate),
        reason: Some(format!(
            "{:.0}% win rate over {} recent games",
            stats.win_rate() * 100.0,
            stats.picks
        )),
    })
}

/// Champion's class complements already-picked teammates.
fn synergy_rule(ctx: &ScoreContext) -> Option<RuleHit> {
    if ctx.action != ActionType::Pick || ctx.our_picks.is_empty() {
        return None;
    }
    let have_tank = ctx.our_picks.iter().any(|c| c.has_tag(ClassTag::Tank));
    let have_marksman = ctx.our_picks.iter().any(|c| c.has_tag(ClassTag::Marksman));

    let (delta, reason) = if ctx.champion.has_tag(ClassTag::Marksman) && have_tank {
        (2.0, "Frontline already secured for a carry")
    } else if ctx.champion.has_tag(ClassTag::Tank) && !have_tank {
        (1.5, "Adds the missing frontline")
    } else if ctx.champion.has_tag(ClassTag::Enchanter) && have_marksman {
        (1.5, "Protects the carry already picked")
    } else {
        return None;
    };

    Some(RuleHit {
        delta,
        tag: Some(RecommendationTag::Synergy),
        reason: Some(reason.to_string()),
    })
}

/// Counter potential against already-revealed enemy picks.
fn counter_rule(ctx: &ScoreContext) -> Option<RuleHit> {
    if ctx.enemy_picks.is_empty() {
        return None;
    }
    let enemy_backline = ctx
        .enemy_picks
        .iter()
        .any(|c| c.has_tag(ClassTag::Marksman) || c.has_tag(ClassTag::Mage));
    let enemy_dive = ctx.enemy_picks.iter().any(|c| c.has_tag(ClassTag::Assassin));

    let (delta, reason) = if ctx.champion.has_tag(ClassTag::Assassin) && enemy_backline {
        (1.8, "Threatens the enemy backline")
    } else if ctx.champion.has_tag(ClassTag::Tank) && enemy_dive {
        (1.2, "Blunts the enemy dive threat")
    } else {
        return None;
    };

    Some(RuleHit {
        delta,
        tag: Some(RecommendationTag::Counter),
        reason: Some(reason.to_string()),
    })
}

/// Ban value: how much the enemy team favors this champion.
fn denial_rule(ctx: &ScoreContext) -> Option<RuleHit> {
    if ctx.action != ActionType::Ban {
        return None;
    }
    let profile = ctx.enemy_profile?;
    let frequency = profile.pick_frequency(&ctx.champion.id);
    if frequency < 0.3 {
        return None;
    }
    Some(RuleHit {
        delta: frequency * 10.0,
        tag: Some(RecommendationTag::Deny),
        reason: Some(format!(
            "Enemy picks this in {:.0}% of their games",
            frequency * 100.0
        )),
    })
}

/// Multi-role champions keep the draft flexible; only worth paying for on
/// pick turns.
fn flex_rule(ctx: &ScoreContext) -> Option<RuleHit> {
    if ctx.action != ActionType::Pick || !ctx.champion.is_flex() {
        return None;
    }
    Some(RuleHit {
        delta: 0.5,
        tag: Some(RecommendationTag::Flex),
        reason: Some("Flexible across multiple roles".to_string()),
    })
}

/// Score every unused champion for the acting side and return the top
/// candidates, deterministically ordered.
pub fn recommend(
    catalog: &ChampionCatalog,
    used: &[&str],
    action: ActionType,
    our_profile: Option<&TeamProfile>,
    enemy_profile: Option<&TeamProfile>,
    our_picks: &[&Champion],
    enemy_picks: &[&Champion],
) -> Vec<Recommendation> {
    let mut scored: Vec<(Recommendation, f64)> = catalog
        .unused(used)
        .map(|champion| {
            let ctx = ScoreContext {
                champion,
                action,
                our_profile,
                enemy_profile,
                our_picks,
                enemy_picks,
            };

            // Base score is the champion's global win rate
            let mut score = champion.win_rate * 10.0;
            let mut hits: Vec<RuleHit> = Vec::new();
            for rule in SCORING_RULES {
                if let Some(hit) = (rule.apply)(&ctx) {
                    score += hit.delta;
                    hits.push(hit);
                }
            }

            // Reasons ordered by contribution size
            hits.sort_by(|a, b| b.delta.partial_cmp(&a.delta).unwrap_or(Ordering::Equal));
            let tags = hits.iter().filter_map(|h| h.tag).collect();
            let reasons = hits
                .into_iter()
                .filter_map(|h| h.reason)
                .take(MAX_REASONS)
                .collect();

            (
                Recommendation {
                    champion_id: champion.id.clone(),
                    champion_name: champion.name.clone(),
                    score,
                    tags,
                    reasons,
                },
                champion.pick_rate,
            )
        })
        .collect();

    // Ties break on global pick rate, then champion id, for determinism
    scored.sort_by(|(a, a_pick), (b, b_pick)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(b_pick.partial_cmp(a_pick).unwrap_or(Ordering::Equal))
            .then(a.champion_id.cmp(&b.champion_id))
    });

    scored
        .into_iter()
        .take(TOP_N)
        .map(|(recommendation, _)| recommendation)
        .collect()
}

/// Predict the enemy's likely next action from their pick history, with a
/// bonus for roles they have not yet filled.
pub fn predict_enemy(
    catalog: &ChampionCatalog,
    used: &[&str],
    enemy_profile: Option<&TeamProfile>,
    enemy_picks: &[&Champion],
) -> Vec<EnemyPrediction> {
    let filled_roles: Vec<_> = enemy_picks
        .iter()
        .filter_map(|c| c.roles.first().copied())
        .collect();

    let mut scored: Vec<(&Champion, f64, String)> = catalog
        .unused(used)
        .filter_map(|champion| {
            let (mut score, reason) = match enemy_profile {
                Some(profile) => {
                    let frequency = profile.pick_frequency(&champion.id);
                    if frequency <= 0.0 {
                        return None;
                    }
                    (
                        frequency,
                        format!("Picked in {:.0}% of their recent games", frequency * 100.0),
                    )
                }
                // Degraded mode: global pick rate is the best signal left
                None => (champion.pick_rate, "High global pick rate".to_string()),
            };

            let fills_open_role = champion
                .roles
                .iter()
                .any(|role| !filled_roles.contains(role));
            if fills_open_role && !enemy_picks.is_empty() {
                score += 0.05;
            }
            Some((champion, score, reason))
        })
        .collect();

    scored.sort_by(|(a, a_score, _), (b, b_score, _)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    scored.truncate(TOP_N);

    let total: f64 = scored.iter().map(|(_, score, _)| score).sum();
    scored
        .into_iter()
        .map(|(champion, score, reason)| EnemyPrediction {
            champion_id: champion.id.clone(),
            champion_name: champion.name.clone(),
            probability: if total > 0.0 {
                (score / total * 100.0 * 10.0).round() / 10.0
            } else {
                0.0
            },
            reason,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::champions::Role;
    use crate::models::ChampionPickStats;
    use chrono::Utc;
    use std::collections::HashMap;

    fn champion(id: &str, tags: &[ClassTag], win_rate: f64, pick_rate: f64) -> Champion {
        Champion {
            id: id.to_string(),
            name: id.to_string(),
            roles: vec![Role::Mid],
            tags: tags.to_vec(),
            win_rate,
            pick_rate,
            ban_rate: 0.0,
        }
    }

    fn profile_with_picks(picks: &[(&str, u32, u32)]) -> TeamProfile {
        // games_played derives from total picks / 5; pad a filler champion
        // so frequencies come out of a round game count
        let mut champion_picks: HashMap<String, ChampionPickStats> = HashMap::new();
        for (id, times, wins) in picks {
            champion_picks.insert(
                id.to_string(),
                ChampionPickStats {
                    picks: *times,
                    wins: *wins,
                },
            );
        }
        TeamProfile {
            team_id: "t1".into(),
            team_name: "Alpha".into(),
            logo_url: None,
            series_wins: 3,
            series_losses: 2,
            champion_picks,
            bans_against: HashMap::new(),
            players: HashMap::new(),
            recent_matches: Vec::new(),
            objectives: Default::default(),
            skipped_series: 0,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_signature_rule_fires_on_frequent_pick() {
        // 10 total picks = 2 games; ahri picked twice = 100% frequency
        let profile = profile_with_picks(&[("ahri", 2, 2), ("filler", 8, 4)]);
        let champ = champion("ahri", &[ClassTag::Mage], 0.5, 0.1);
        let ctx = ScoreContext {
            champion: &champ,
            action: ActionType::Pick,
            our_profile: Some(&profile),
            enemy_profile: None,
            our_picks: &[],
            enemy_picks: &[],
        };
        let hit = signature_rule(&ctx).expect("signature fires");
        assert_eq!(hit.tag, Some(RecommendationTag::Signature));
        assert!(hit.delta > 0.0);
    }

    #[test]
    fn test_denial_rule_only_on_bans() {
        let profile = profile_with_picks(&[("ahri", 2, 2), ("filler", 8, 4)]);
        let champ = champion("ahri", &[ClassTag::Mage], 0.5, 0.1);
        let mut ctx = ScoreContext {
            champion: &champ,
            action: ActionType::Ban,
            our_profile: None,
            enemy_profile: Some(&profile),
            our_picks: &[],
            enemy_picks: &[],
        };
        assert!(denial_rule(&ctx).is_some());

        ctx.action = ActionType::Pick;
        assert!(denial_rule(&ctx).is_none());
    }

    #[test]
    fn test_synergy_marksman_wants_frontline() {
        let tank = champion("ornn", &[ClassTag::Tank], 0.5, 0.1);
        let marksman = champion("jinx", &[ClassTag::Marksman], 0.5, 0.1);
        let picks: Vec<&Champion> = vec![&tank];
        let ctx = ScoreContext {
            champion: &marksman,
            action: ActionType::Pick,
            our_profile: None,
            enemy_profile: None,
            our_picks: &picks,
            enemy_picks: &[],
        };
        let hit = synergy_rule(&ctx).expect("synergy fires");
        assert_eq!(hit.tag, Some(RecommendationTag::Synergy));
    }

    #[test]
    fn test_counter_assassin_vs_backline() {
        let enemy_carry = champion("jinx", &[ClassTag::Marksman], 0.5, 0.1);
        let assassin = champion("khazix", &[ClassTag::Assassin], 0.5, 0.1);
        let enemy_picks: Vec<&Champion> = vec![&enemy_carry];
        let ctx = ScoreContext {
            champion: &assassin,
            action: ActionType::Pick,
            our_profile: None,
            enemy_profile: None,
            our_picks: &[],
            enemy_picks: &enemy_picks,
        };
        let hit = counter_rule(&ctx).expect("counter fires");
        assert_eq!(hit.tag, Some(RecommendationTag::Counter));
    }

    #[test]
    fn test_recommend_without_profiles_orders_by_global_rates() {
        let catalog = ChampionCatalog::new(vec![
            champion("a", &[ClassTag::Mage], 0.54, 0.10),
            champion("b", &[ClassTag::Mage], 0.52, 0.30),
            champion("c", &[ClassTag::Mage], 0.52, 0.20),
            champion("d", &[ClassTag::Mage], 0.50, 0.40),
            champion("e", &[ClassTag::Mage], 0.49, 0.10),
            champion("f", &[ClassTag::Mage], 0.48, 0.10),
        ]);
        // Ban turn, no profiles: pure (win rate, pick rate, id) ordering
        let recs = recommend(&catalog, &[], ActionType::Ban, None, None, &[], &[]);
        let ids: Vec<_> = recs.iter().map(|r| r.champion_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let catalog = ChampionCatalog::new(vec![
            champion("x", &[ClassTag::Mage], 0.5, 0.1),
            champion("y", &[ClassTag::Mage], 0.5, 0.1),
            champion("z", &[ClassTag::Mage], 0.5, 0.1),
        ]);
        let first = recommend(&catalog, &[], ActionType::Ban, None, None, &[], &[]);
        let second = recommend(&catalog, &[], ActionType::Ban, None, None, &[], &[]);
        let ids = |recs: &[Recommendation]| {
            recs.iter().map(|r| r.champion_id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        // Equal scores and pick rates fall back to id order
        assert_eq!(ids(&first), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_recommend_excludes_used_champions() {
        let catalog = ChampionCatalog::new(vec![
            champion("a", &[ClassTag::Mage], 0.54, 0.1),
            champion("b", &[ClassTag::Mage], 0.52, 0.1),
        ]);
        let recs = recommend(&catalog, &["a"], ActionType::Ban, None, None, &[], &[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].champion_id, "b");
    }

    #[test]
    fn test_predict_enemy_degrades_to_global_rates() {
        let catalog = ChampionCatalog::new(vec![
            champion("a", &[ClassTag::Mage], 0.5, 0.30),
            champion("b", &[ClassTag::Mage], 0.5, 0.10),
        ]);
        let predictions = predict_enemy(&catalog, &[], None, &[]);
        assert_eq!(predictions[0].champion_id, "a");
        assert!(predictions[0].probability > predictions[1].probability);
        assert_eq!(predictions[0].reason, "High global pick rate");
    }

    #[test]
    fn test_predict_enemy_prefers_profile_frequency() {
        let catalog = ChampionCatalog::new(vec![
            champion("favorite", &[ClassTag::Mage], 0.5, 0.01),
            champion("meta", &[ClassTag::Mage], 0.5, 0.40),
        ]);
        let profile = profile_with_picks(&[("favorite", 4, 2), ("filler", 6, 3)]);
        let predictions = predict_enemy(&catalog, &[], Some(&profile), &[]);
        assert_eq!(predictions[0].champion_id, "favorite");
    }
}
