use chainwatch_protocol::constants::{MARKER_ATTACK, MARKER_ATTACK_ARMED, MARKER_REJECTED};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    AttackSuccess,
    AttackArmed,
    Rejected,
    Normal,
}

impl Category {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::AttackSuccess => "attack-success",
            Self::AttackArmed => "attack-armed",
            Self::Rejected => "rejected",
            Self::Normal => "normal",
        }
    }
}

// Evaluated top-down, first match wins.
const RULES: &[(&str, Category)] = &[
    (MARKER_ATTACK, Category::AttackSuccess),
    (MARKER_ATTACK_ARMED, Category::AttackArmed),
    (MARKER_REJECTED, Category::Rejected),
];

pub fn classify(line: &str) -> Category {
    RULES
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Normal)
}
