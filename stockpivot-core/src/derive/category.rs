//! Product category classification from item descriptions

use crate::reader::CellValue;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Closed set of report categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Greenfield,
    Tess,
    JockeySolution,
    JockeyNatural,
    JardinSolution,
    JardinNatural,
    Princess,
    Other,
}

impl Category {
    /// Label printed in the report
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Greenfield => "Greenfield",
            Category::Tess => "Tess",
            Category::JockeySolution => "Жокей раствор",
            Category::JockeyNatural => "Жокей Натуральный",
            Category::JardinSolution => "JARDIN раствор",
            Category::JardinNatural => "JARDIN натур",
            Category::Princess => "Принцессы",
            Category::Other => "Прочие",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Categories sort by their report label
impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Marker for the soluble ("раствор.") line of a brand
const SOLUBLE: &str = "раств.";

/// One classification rule: if the description contains any of `needles`,
/// the row belongs to `plain`, or to `soluble` when the description also
/// mentions the soluble line.
struct CategoryRule {
    needles: &'static [&'static str],
    plain: Category,
    soluble: Option<Category>,
}

impl CategoryRule {
    fn apply(&self, description: &str) -> Option<Category> {
        if !self.needles.iter().any(|needle| description.contains(needle)) {
            return None;
        }
        match self.soluble {
            Some(soluble) if description.contains(SOLUBLE) => Some(soluble),
            _ => Some(self.plain),
        }
    }
}

/// Rules in priority order; the first match wins
const RULES: &[CategoryRule] = &[
    CategoryRule {
        needles: &["ГринФилд"],
        plain: Category::Greenfield,
        soluble: None,
    },
    CategoryRule {
        needles: &["Тесс"],
        plain: Category::Tess,
        soluble: None,
    },
    CategoryRule {
        needles: &["Жокей"],
        plain: Category::JockeyNatural,
        soluble: Some(Category::JockeySolution),
    },
    CategoryRule {
        needles: &["Жардин"],
        plain: Category::JardinNatural,
        soluble: Some(Category::JardinSolution),
    },
    CategoryRule {
        needles: &["Нури", "Ява", "Канди", "Гита"],
        plain: Category::Princess,
        soluble: None,
    },
];

/// Classify an item description cell.
///
/// Matching is case-sensitive and literal. Anything that is not a text cell,
/// or text matching no rule, is `Category::Other`.
pub fn classify(description: &CellValue) -> Category {
    match description {
        CellValue::Text(text) => classify_text(text),
        CellValue::Number(_) | CellValue::Empty => Category::Other,
    }
}

fn classify_text(text: &str) -> Category {
    RULES
        .iter()
        .find_map(|rule| rule.apply(text))
        .unwrap_or(Category::Other)
}
