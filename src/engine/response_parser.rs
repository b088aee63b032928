use log::warn;

use crate::model::parsed_response::ParsedResponse;

const HUD_FENCE_OPEN: &str = "```text";
const FENCE: &str = "```";

/// Split one raw model reply into narrative, HUD block and numbered choices.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let (narrative, hud_raw) = match extract_hud(raw) {
        Some((hud, narrative)) => (narrative, Some(hud)),
        None => (raw.trim().to_string(), None),
    };

    let choices = extract_choices(&narrative);

    ParsedResponse {
        narrative,
        choices,
        hud_raw,
    }
}

/// First ```` ```text ```` block wins. Returns `(interior, text without the block)`.
fn extract_hud(raw: &str) -> Option<(String, String)> {
    let start = raw.find(HUD_FENCE_OPEN)?;
    let body_start = start + HUD_FENCE_OPEN.len();
    let body_len = raw[body_start..].find(FENCE)?;
    let end = body_start + body_len + FENCE.len();

    let hud = raw[body_start..body_start + body_len].trim().to_string();

    let rest = &raw[end..];
    if rest.contains(HUD_FENCE_OPEN) {
        warn!("reply contains more than one HUD block, only the first is used");
    }

    let narrative = format!("{}{}", &raw[..start], rest).trim().to_string();
    Some((hud, narrative))
}

fn extract_choices(narrative: &str) -> Vec<String> {
    let mut choices = Vec::new();

    for line in narrative.lines() {
        let line = line.trim();

        let Some(number) = choice_number(line) else {
            continue;
        };

        // 0 is the free-form action slot, not a preset
        if number == "0" {
            continue;
        }

        choices.push(line.replace("**", ""));
    }

    choices
}

/// `"12. text"` -> `Some("12")`. Needs at least one space after the period
/// and some text after that.
fn choice_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let rest = line[digits..].strip_prefix('.')?;
    let text = rest.trim_start_matches(' ');
    if text.len() == rest.len() || text.trim().is_empty() {
        return None;
    }

    Some(&line[..digits])
}
