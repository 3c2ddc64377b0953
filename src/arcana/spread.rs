//! # Spreads
//!
//! A spread names a reading layout: how many cards are drawn and what each
//! position means. The catalog holds four fixed layouts plus `custom`, whose
//! card count is chosen when the reading starts and whose positions are plain
//! ordinals since nothing more meaningful is known about them.
//!
//! | Key            | Cards | Positions                                      |
//! |----------------|-------|------------------------------------------------|
//! | `one_card`     | 1     | Core Message                                   |
//! | `three_card`   | 3     | Past, Present, Future                          |
//! | `relationship` | 5     | Current Situation … Final Outcome              |
//! | `celtic_cross` | 7     | Current Situation … Advice, Final Outcome      |
//! | `custom`       | 1-78  | Position 1, Position 2, …                      |

use crate::deck::Deck;
use crate::error::{ArcanaError, Result};
use crate::model::Language;

pub const CUSTOM_KEY: &str = "custom";

/// Card count used for `custom` when the caller does not ask for one.
pub const DEFAULT_CUSTOM_COUNT: usize = 3;

struct SpreadDef {
    key: &'static str,
    name: &'static str,
    name_ko: &'static str,
    labels: &'static [&'static str],
    labels_ko: &'static [&'static str],
}

const CATALOG: &[SpreadDef] = &[
    SpreadDef {
        key: "one_card",
        name: "One Card",
        name_ko: "1장 리딩",
        labels: &["Core Message"],
        labels_ko: &["핵심 메시지"],
    },
    SpreadDef {
        key: "three_card",
        name: "Three Card",
        name_ko: "3장 리딩",
        labels: &["Past", "Present", "Future"],
        labels_ko: &["과거", "현재", "미래"],
    },
    SpreadDef {
        key: "relationship",
        name: "Five Card",
        name_ko: "5장 리딩",
        labels: &[
            "Current Situation",
            "Root Cause",
            "Obstacle",
            "Potential",
            "Final Outcome",
        ],
        labels_ko: &["현재 상황", "근본 원인", "장애물", "잠재력", "최종 결과"],
    },
    SpreadDef {
        key: "celtic_cross",
        name: "Seven Card",
        name_ko: "7장 리딩",
        labels: &[
            "Current Situation",
            "Past Influence",
            "Future Possibility",
            "Inner State",
            "External Environment",
            "Advice",
            "Final Outcome",
        ],
        labels_ko: &[
            "현재 상황",
            "과거의 영향",
            "미래의 가능성",
            "내면의 상태",
            "외부 환경",
            "조언",
            "최종 결과",
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spread {
    pub key: String,
    pub name: String,
    pub position_labels: Vec<String>,
}

impl Spread {
    pub fn count(&self) -> usize {
        self.position_labels.len()
    }

    pub fn label(&self, position: usize) -> Option<&str> {
        self.position_labels.get(position).map(String::as_str)
    }
}

/// Catalog entry summary for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadInfo {
    pub key: &'static str,
    pub name: String,
    /// `None` for the parameterized spread.
    pub count: Option<usize>,
    pub positions: Vec<String>,
}

pub fn catalog(language: Language) -> Vec<SpreadInfo> {
    let mut entries: Vec<SpreadInfo> = CATALOG
        .iter()
        .map(|def| {
            let spread = from_def(def, language);
            SpreadInfo {
                key: def.key,
                count: Some(spread.count()),
                name: spread.name,
                positions: spread.position_labels,
            }
        })
        .collect();
    entries.push(SpreadInfo {
        key: CUSTOM_KEY,
        name: custom_name(language).to_string(),
        count: None,
        positions: Vec::new(),
    });
    entries
}

/// Resolves a spread with English labels.
pub fn resolve(key: &str, requested_count: Option<usize>) -> Result<Spread> {
    resolve_in(Language::En, key, requested_count)
}

/// Resolves a spread key against the catalog.
///
/// Built-in spreads ignore `requested_count`. The `custom` spread takes
/// `requested_count` (default [`DEFAULT_CUSTOM_COUNT`]) and rejects anything
/// outside `1..=deck size`, since cards are never drawn twice in a session.
pub fn resolve_in(language: Language, key: &str, requested_count: Option<usize>) -> Result<Spread> {
    let normalized = normalize_key(key);

    if normalized == CUSTOM_KEY {
        let max = Deck::standard().len();
        let count = requested_count.unwrap_or(DEFAULT_CUSTOM_COUNT);
        if count == 0 || count > max {
            return Err(ArcanaError::InvalidSpreadCount {
                requested: count,
                max,
            });
        }
        return Ok(custom(language, count));
    }

    CATALOG
        .iter()
        .find(|def| def.key == normalized)
        .map(|def| from_def(def, language))
        .ok_or_else(|| ArcanaError::UnknownSpreadKey(key.to_string()))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn from_def(def: &SpreadDef, language: Language) -> Spread {
    let (name, labels) = match language {
        Language::En => (def.name, def.labels),
        Language::Ko => (def.name_ko, def.labels_ko),
    };
    Spread {
        key: def.key.to_string(),
        name: name.to_string(),
        position_labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

fn custom_name(language: Language) -> &'static str {
    match language {
        Language::En => "Custom",
        Language::Ko => "커스텀",
    }
}

fn custom(language: Language, count: usize) -> Spread {
    let position_labels = (1..=count)
        .map(|n| match language {
            Language::En => format!("Position {}", n),
            Language::Ko => format!("{}번째 카드", n),
        })
        .collect();
    Spread {
        key: CUSTOM_KEY.to_string(),
        name: custom_name(language).to_string(),
        position_labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_card_has_past_present_future() {
        let spread = resolve("three_card", None).unwrap();
        assert_eq!(spread.count(), 3);
        assert_eq!(spread.position_labels, vec!["Past", "Present", "Future"]);
    }

    #[test]
    fn builtin_ignores_requested_count() {
        let spread = resolve("celtic_cross", Some(2)).unwrap();
        assert_eq!(spread.count(), 7);
    }

    #[test]
    fn builtin_labels_match_counts() {
        for def in CATALOG {
            assert_eq!(def.labels.len(), def.labels_ko.len(), "{}", def.key);
            assert!(!def.labels.is_empty());
        }
    }

    #[test]
    fn custom_resolves_every_valid_count() {
        let max = Deck::standard().len();
        for n in 1..=max {
            let spread = resolve(CUSTOM_KEY, Some(n)).unwrap();
            assert_eq!(spread.count(), n);
            assert_eq!(spread.position_labels[0], "Position 1");
            assert_eq!(spread.position_labels[n - 1], format!("Position {}", n));
        }
    }

    #[test]
    fn custom_rejects_zero_and_oversized_counts() {
        let max = Deck::standard().len();
        assert!(matches!(
            resolve(CUSTOM_KEY, Some(0)),
            Err(ArcanaError::InvalidSpreadCount { requested: 0, .. })
        ));
        assert!(matches!(
            resolve(CUSTOM_KEY, Some(max + 1)),
            Err(ArcanaError::InvalidSpreadCount { requested, max: m }) if requested == max + 1 && m == max
        ));
    }

    #[test]
    fn custom_defaults_to_three_cards() {
        assert_eq!(resolve("custom", None).unwrap().count(), DEFAULT_CUSTOM_COUNT);
    }

    #[test]
    fn unknown_key_fails() {
        assert!(matches!(
            resolve("tree_of_life", None),
            Err(ArcanaError::UnknownSpreadKey(k)) if k == "tree_of_life"
        ));
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(resolve("Three-Card", None).unwrap().key, "three_card");
    }

    #[test]
    fn korean_labels() {
        let spread = resolve_in(Language::Ko, "three_card", None).unwrap();
        assert_eq!(spread.name, "3장 리딩");
        assert_eq!(spread.position_labels, vec!["과거", "현재", "미래"]);
        let custom = resolve_in(Language::Ko, "custom", Some(2)).unwrap();
        assert_eq!(custom.position_labels, vec!["1번째 카드", "2번째 카드"]);
    }

    #[test]
    fn catalog_lists_custom_last() {
        let entries = catalog(Language::En);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4].key, CUSTOM_KEY);
        assert_eq!(entries[4].count, None);
        assert_eq!(entries[1].count, Some(3));
    }
}
