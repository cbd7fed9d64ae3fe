use crate::models::{ActionType, DraftPhase, Side};

/// The fixed 20-action competitive draft order: six bans, six picks, four
/// bans, four picks, alternating sides per the tournament rules.
pub const DRAFT_SEQUENCE: [(Side, ActionType); 20] = [
    // Ban phase 1
    (Side::Blue, ActionType::Ban),
    (Side::Red, ActionType::Ban),
    (Side::Blue, ActionType::Ban),
    (Side::Red, ActionType::Ban),
    (Side::Blue, ActionType::Ban),
    (Side::Red, ActionType::Ban),
    // Pick phase 1 (snake order)
    (Side::Blue, ActionType::Pick),
    (Side::Red, ActionType::Pick),
    (Side::Red, ActionType::Pick),
    (Side::Blue, ActionType::Pick),
    (Side::Blue, ActionType::Pick),
    (Side::Red, ActionType::Pick),
    // Ban phase 2
    (Side::Red, ActionType::Ban),
    (Side::Blue, ActionType::Ban),
    (Side::Red, ActionType::Ban),
    (Side::Blue, ActionType::Ban),
    // Pick phase 2
    (Side::Red, ActionType::Pick),
    (Side::Blue, ActionType::Pick),
    (Side::Blue, ActionType::Pick),
    (Side::Red, ActionType::Pick),
];

/// Phase for a turn index; anything at or past 20 is complete.
pub fn phase_at(turn: usize) -> DraftPhase {
    match turn {
        0..=5 => DraftPhase::BanPhase1,
        6..=11 => DraftPhase::PickPhase1,
        12..=15 => DraftPhase::BanPhase2,
        16..=19 => DraftPhase::PickPhase2,
        _ => DraftPhase::Complete,
    }
}

/// Acting side and action type for a turn, `None` once the draft is over.
pub fn action_at(turn: usize) -> Option<(Side, ActionType)> {
    DRAFT_SEQUENCE.get(turn).copied()
}

/// How many bans and picks each side has completed after `turn` actions.
/// Used to validate that a reported draft state is structurally consistent.
pub fn expected_counts(turn: usize) -> SideCounts {
    let mut counts = SideCounts::default();
    for (side, action) in DRAFT_SEQUENCE.iter().take(turn.min(20)) {
        let (bans, picks) = match side {
            Side::Blue => (&mut counts.blue_bans, &mut counts.blue_picks),
            Side::Red => (&mut counts.red_bans, &mut counts.red_picks),
        };
        match action {
            ActionType::Ban => *bans += 1,
            ActionType::Pick => *picks += 1,
        }
    }
    counts
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SideCounts {
    pub blue_bans: usize,
    pub blue_picks: usize,
    pub red_bans: usize,
    pub red_picks: usize,
}
