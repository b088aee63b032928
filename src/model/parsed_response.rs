use serde::{Deserialize, Serialize};

/// Per-turn output of the response parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Display text with the HUD block removed. Choice lines stay in here.
    pub narrative: String,

    /// `"N. text"` lines in order of appearance, bold markers stripped.
    pub choices: Vec<String>,

    /// Trimmed interior of the first `text` fenced block.
    pub hud_raw: Option<String>,
}
