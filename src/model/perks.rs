use serde::{Deserialize, Serialize};

/// Perks unlocked across every playthrough of this installation.
///
/// Ordered by first acquisition and free of duplicates. Nothing is ever
/// removed; a session reset does not touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct UnlockedPerks {
    names: Vec<String>,
}

impl UnlockedPerks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the perk was not known before.
    pub fn unlock(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for UnlockedPerks {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut perks = UnlockedPerks::new();
        for name in iter {
            let name = name.into();
            perks.unlock(&name);
        }
        perks
    }
}

impl From<Vec<String>> for UnlockedPerks {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<UnlockedPerks> for Vec<String> {
    fn from(perks: UnlockedPerks) -> Self {
        perks.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_ignores_duplicates_and_keeps_order() {
        let mut perks = UnlockedPerks::new();
        assert!(perks.unlock("Night Vision"));
        assert!(perks.unlock("Iron Will"));
        assert!(!perks.unlock("Night Vision"));

        assert_eq!(perks.names(), ["Night Vision", "Iron Will"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut perks = UnlockedPerks::new();
        perks.unlock("x");
        assert!(perks.unlock("X"));
        assert_eq!(perks.names().len(), 2);
    }

    #[test]
    fn serializes_as_plain_array() {
        let perks: UnlockedPerks = ["A", "B", "A"].into_iter().collect();
        let json = serde_json::to_string(&perks).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
    }

    #[test]
    fn duplicates_in_stored_data_are_dropped() {
        let perks: UnlockedPerks = serde_json::from_str(r#"["A","A","B"]"#).unwrap();
        assert_eq!(perks.names(), ["A", "B"]);
    }
}
