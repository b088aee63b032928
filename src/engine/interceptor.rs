use log::info;

pub const RESET_MARKER: &str = "[SYSTEM_RESET]";
pub const PERK_MARKER: &str = "[PERK_ACQUIRED:";

/// Side effects the interceptor can ask for.
pub trait ControlContext {
    /// Clear log, state and perk, go back to mode selection and start a
    /// brand-new backend session.
    fn reset_session(&mut self);

    /// Record and persist the perk. Returns `false` when it was already known.
    fn unlock_perk(&mut self, name: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// The session was reset; nothing else in this reply is processed.
    Reset,
    Continue {
        /// Set only when the perk was new to this installation.
        unlocked_perk: Option<String>,
    },
}

/// Scan a raw reply for control tokens before it is parsed.
///
/// Reset wins over perk acquisition.
pub fn intercept(raw: &str, ctx: &mut impl ControlContext) -> Interception {
    if raw.contains(RESET_MARKER) {
        info!("reset marker received");
        ctx.reset_session();
        return Interception::Reset;
    }

    let unlocked_perk = match find_perk(raw) {
        Some(name) if ctx.unlock_perk(name) => {
            info!("perk unlocked: {name}");
            Some(name.to_string())
        }
        _ => None,
    };

    Interception::Continue { unlocked_perk }
}

/// `"... [PERK_ACQUIRED: 야간 시야] ..."` -> `Some("야간 시야")`
pub fn find_perk(raw: &str) -> Option<&str> {
    let start = raw.find(PERK_MARKER)? + PERK_MARKER.len();
    let len = raw[start..].find(']')?;
    let name = raw[start..start + len].trim();
    (!name.is_empty()).then_some(name)
}

/// Remove control tokens so they never reach the displayed narrative.
pub fn strip_directives(raw: &str) -> String {
    let mut out = raw.replace(RESET_MARKER, "");

    while let Some(start) = out.find(PERK_MARKER) {
        let Some(len) = out[start..].find(']') else {
            break;
        };
        out.replace_range(start..start + len + 1, "");
    }

    out
}
