//! Party plans: the six-category text output and the ways to produce one.

pub mod backend;
pub mod generate;
pub mod parse;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use backend::{GeneratedPlan, MockPlanBackend, PlanBackend};
pub use generate::{field_label, generate_plan};
pub use parse::{PlanParseError, clean_text, parse_plan_text};

/// One of the six plan categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Venue,
    Activities,
    Decorations,
    Catering,
    Music,
    Schedule,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Venue,
        Category::Activities,
        Category::Decorations,
        Category::Catering,
        Category::Music,
        Category::Schedule,
    ];

    /// JSON / dictionary key for this category.
    pub fn key(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Activities => "activities",
            Self::Decorations => "decorations",
            Self::Catering => "catering",
            Self::Music => "music",
            Self::Schedule => "schedule",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Six independent lists of short suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub venue: Vec<String>,
    pub activities: Vec<String>,
    pub decorations: Vec<String>,
    pub catering: Vec<String>,
    pub music: Vec<String>,
    pub schedule: Vec<String>,
}

impl Plan {
    pub fn section(&self, category: Category) -> &[String] {
        match category {
            Category::Venue => &self.venue,
            Category::Activities => &self.activities,
            Category::Decorations => &self.decorations,
            Category::Catering => &self.catering,
            Category::Music => &self.music,
            Category::Schedule => &self.schedule,
        }
    }

    pub fn section_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Venue => &mut self.venue,
            Category::Activities => &mut self.activities,
            Category::Decorations => &mut self.decorations,
            Category::Catering => &mut self.catering,
            Category::Music => &mut self.music,
            Category::Schedule => &mut self.schedule,
        }
    }

    /// Iterate over `(category, entries)` in display order.
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL.into_iter().map(|c| (c, self.section(c)))
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        self.sections().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
