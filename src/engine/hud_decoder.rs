use crate::model::game_state::GameState;

pub const LABEL_STATUS: &str = "[상태]";
pub const LABEL_STATS: &str = "[능력치]";
pub const LABEL_TAGS: &str = "[태그]";
pub const LABEL_EQUIPMENT: &str = "[장비]";
pub const LABEL_NOTES: &str = "[메모]";

const HP_MARKERS: &[&str] = &["hp"];
const MENTAL_MARKERS: &[&str] = &["멘탈", "mental"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HudField {
    Status,
    Stats,
    Tags,
    Equipment,
    Notes,
}

/// Checked in this order; the first label contained in a line claims it.
const LABELS: [(&str, HudField); 5] = [
    (LABEL_STATUS, HudField::Status),
    (LABEL_STATS, HudField::Stats),
    (LABEL_TAGS, HudField::Tags),
    (LABEL_EQUIPMENT, HudField::Equipment),
    (LABEL_NOTES, HudField::Notes),
];

/// Decode the interior of a HUD block into a partial [`GameState`].
///
/// Only fields whose label appears are set. Merging onto the running state
/// is up to the caller (`merge_game_state`).
pub fn decode_hud(hud: &str) -> GameState {
    let mut update = GameState::default();

    for line in hud.lines() {
        let Some((field, rest)) = classify(line) else {
            continue;
        };

        match field {
            HudField::Status => decode_status(rest, &mut update),
            HudField::Stats => update.stats = Some(rest.to_string()),
            HudField::Tags => update.tags = Some(split_tags(rest)),
            HudField::Equipment => update.equipment = Some(rest.to_string()),
            HudField::Notes => update.notes = Some(rest.to_string()),
        }
    }

    update
}

fn classify(line: &str) -> Option<(HudField, &str)> {
    LABELS.iter().find_map(|(label, field)| {
        let at = line.find(label)?;
        Some((*field, line[at + label.len()..].trim()))
    })
}

fn decode_status(rest: &str, update: &mut GameState) {
    match rest.split_once('|') {
        Some((hp, mental)) => {
            update.hp = Some(strip_marker(hp, HP_MARKERS));
            update.mental = Some(strip_marker(mental, MENTAL_MARKERS));
        }
        None => {
            update.hp = Some(strip_marker(rest, HP_MARKERS));
        }
    }
}

/// `"HP: 80"` -> `"80"`. Case-insensitive; a segment without the marker is
/// returned trimmed as-is.
fn strip_marker(segment: &str, markers: &[&str]) -> String {
    let segment = segment.trim();

    for marker in markers {
        let Some(head) = segment.get(..marker.len()) else {
            continue;
        };
        if head.eq_ignore_ascii_case(marker) {
            let value = segment[marker.len()..].trim_start();
            let value = value.strip_prefix(':').unwrap_or(value);
            return value.trim().to_string();
        }
    }

    segment.to_string()
}

fn split_tags(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_tags() {
        let state = decode_hud("[상태] HP: 80 | 멘탈: 60\n[태그] A, B");

        assert_eq!(state.hp.as_deref(), Some("80"));
        assert_eq!(state.mental.as_deref(), Some("60"));
        assert_eq!(state.tags, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(state.stats, None);
        assert_eq!(state.equipment, None);
        assert_eq!(state.notes, None);
    }

    #[test]
    fn status_without_pipe_is_hp_only() {
        let state = decode_hud("[상태] Critical");

        assert_eq!(state.hp.as_deref(), Some("Critical"));
        assert_eq!(state.mental, None);
    }

    #[test]
    fn markers_are_case_insensitive() {
        let state = decode_hud("[상태] hp:35/100 | Mental: 흔들림");

        assert_eq!(state.hp.as_deref(), Some("35/100"));
        assert_eq!(state.mental.as_deref(), Some("흔들림"));
    }

    #[test]
    fn segments_without_markers_are_kept_whole() {
        let state = decode_hud("[상태] 중상 | 공포");

        assert_eq!(state.hp.as_deref(), Some("중상"));
        assert_eq!(state.mental.as_deref(), Some("공포"));
    }

    #[test]
    fn empty_tag_segments_are_dropped() {
        let state = decode_hud("[태그] A,, B ,");
        assert_eq!(state.tags, Some(vec!["A".to_string(), "B".to_string()]));

        let state = decode_hud("[태그]");
        assert_eq!(state.tags, Some(Vec::new()));
    }

    #[test]
    fn every_label() {
        let hud = "\
[상태] HP: 100 | 멘탈: 100
[능력치] 근력 12, 민첩 9
[태그] 부상, 부상
[장비] 낡은 권총 (탄 3발)
[메모] 지하철역으로 향하는 중";
        let state = decode_hud(hud);

        assert_eq!(state.stats.as_deref(), Some("근력 12, 민첩 9"));
        assert_eq!(state.tags, Some(vec!["부상".to_string(), "부상".to_string()]));
        assert_eq!(state.equipment.as_deref(), Some("낡은 권총 (탄 3발)"));
        assert_eq!(state.notes.as_deref(), Some("지하철역으로 향하는 중"));
    }

    #[test]
    fn first_label_wins_on_ambiguous_line() {
        let state = decode_hud("[메모] see [상태] later");

        assert_eq!(state.hp.as_deref(), Some("later"));
        assert_eq!(state.notes, None);
    }

    #[test]
    fn unlabeled_lines_are_ignored() {
        let state = decode_hud("just some text\n\n---");
        assert!(state.is_empty());
    }

    #[test]
    fn label_may_be_indented_or_prefixed() {
        let state = decode_hud("  - [장비] 손전등");
        assert_eq!(state.equipment.as_deref(), Some("손전등"));
    }
}
