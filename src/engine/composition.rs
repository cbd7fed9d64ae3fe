use crate::champions::{Champion, ClassTag};
use crate::models::CompositionAnalysis;

/// Most strength/weakness strings carried per side.
const MAX_NOTES: usize = 2;

/// Classify a side's damage profile and derive strengths/weaknesses.
///
/// Needs at least two picks to say anything meaningful; returns `None`
/// before that.
pub fn analyze(picks: &[&Champion]) -> Option<CompositionAnalysis> {
    if picks.len() < 2 {
        return None;
    }

    // A champion leans the way its primary class does
    let physical = picks
        .iter()
        .filter(|c| c.tags.first().is_some_and(|t| t.is_physical()))
        .count() as u32;
    let magic = picks
        .iter()
        .filter(|c| c.tags.first().is_some_and(|t| t.is_magic()))
        .count() as u32;

    let has_tank = picks.iter().any(|c| c.has_tag(ClassTag::Tank));
    let has_marksman = picks.iter().any(|c| c.has_tag(ClassTag::Marksman));
    let has_enchanter = picks.iter().any(|c| c.has_tag(ClassTag::Enchanter));

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if has_tank && physical >= 1 && magic >= 1 {
        strengths.push("Balanced damage profile with a frontline".to_string());
    }
    if has_enchanter && has_marksman {
        strengths.push("Strong peel for the carry".to_string());
    }
    if magic >= 3 && physical >= 1 {
        strengths.push("Overwhelming magic threat with mixed follow-up".to_string());
    }

    if !has_tank {
        weaknesses.push("No tank or frontline picked".to_string());
    }
    if magic >= 3 && physical == 0 {
        weaknesses.push("All damage is magic, easy to itemize against".to_string());
    }
    if physical >= 3 && magic == 0 {
        weaknesses.push("All damage is physical, easy to itemize against".to_string());
    }

    strengths.truncate(MAX_NOTES);
    weaknesses.truncate(MAX_NOTES);

    Some(CompositionAnalysis {
        physical_damage: physical,
        magic_damage: magic,
        strengths,
        weaknesses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::champions::Role;

    fn champion(id: &str, tags: &[ClassTag]) -> Champion {
        Champion {
            id: id.to_string(),
            name: id.to_string(),
            roles: vec![Role::Mid],
            tags: tags.to_vec(),
            win_rate: 0.5,
            pick_rate: 0.1,
            ban_rate: 0.0,
        }
    }

    #[test]
    fn test_fewer_than_two_picks_is_none() {
        let solo = champion("ahri", &[ClassTag::Mage]);
        assert!(analyze(&[]).is_none());
        assert!(analyze(&[&solo]).is_none());
    }

    #[test]
    fn test_no_frontline_is_a_weakness() {
        let a = champion("ahri", &[ClassTag::Mage]);
        let b = champion("jinx", &[ClassTag::Marksman]);
        let comp = analyze(&[&a, &b]).unwrap();
        assert!(comp
            .weaknesses
            .iter()
            .any(|w| w.contains("frontline")));
    }

    #[test]
    fn test_all_magic_damage_is_a_weakness() {
        let a = champion("ahri", &[ClassTag::Mage]);
        let b = champion("syndra", &[ClassTag::Mage]);
        let c = champion("orianna", &[ClassTag::Mage]);
        let comp = analyze(&[&a, &b, &c]).unwrap();
        assert_eq!(comp.magic_damage, 3);
        assert_eq!(comp.physical_damage, 0);
        assert!(comp.weaknesses.iter().any(|w| w.contains("magic")));
    }

    #[test]
    fn test_balanced_comp_is_a_strength() {
        let tank = champion("ornn", &[ClassTag::Tank]);
        let marksman = champion("jinx", &[ClassTag::Marksman]);
        let mage = champion("ahri", &[ClassTag::Mage]);
        let comp = analyze(&[&tank, &marksman, &mage]).unwrap();
        assert!(comp.strengths.iter().any(|s| s.contains("Balanced")));
        assert!(comp.weaknesses.is_empty());
    }

    #[test]
    fn test_notes_are_capped() {
        let comp = analyze(&[
            &champion("a", &[ClassTag::Mage]),
            &champion("b", &[ClassTag::Mage]),
            &champion("c", &[ClassTag::Mage]),
            &champion("d", &[ClassTag::Mage]),
        ])
        .unwrap();
        assert!(comp.strengths.len() <= 2);
        assert!(comp.weaknesses.len() <= 2);
    }
}
