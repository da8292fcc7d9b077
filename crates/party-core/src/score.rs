//! Deterministic placeholder score.
//!
//! This is NOT an evaluation of plan quality. The numbers are drawn from a
//! sine-based pseudo-random sequence seeded by a hash of the selection and
//! the plan size, so the same input always yields the same score. Results
//! carry `isPlaceholder: true` and a dictionary note saying as much.
//!
//! Invariants:
//! - each of the five categories is in `[18, 20]`;
//! - `total` is the sum of the categories and lies in `[93, 100]`;
//! - the result is a pure function of `(selection, plan_len)`.

use std::fmt;

use serde::Serialize;

use crate::i18n::{Dictionary, Language};
use crate::selection::FormSelection;

const CATEGORY_FLOOR: u8 = 18;
const CATEGORY_CAP: u8 = 20;
const MIN_TARGET: u32 = 93;
const TARGET_SPAN: f64 = 8.0;
const MAX_DRAWS: u32 = 200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The five score categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCategory {
    Creativity,
    Feasibility,
    BudgetFit,
    ThemeConsistency,
    GuestExperience,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::Creativity,
        ScoreCategory::Feasibility,
        ScoreCategory::BudgetFit,
        ScoreCategory::ThemeConsistency,
        ScoreCategory::GuestExperience,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Creativity => "creativity",
            Self::Feasibility => "feasibility",
            Self::BudgetFit => "budgetFit",
            Self::ThemeConsistency => "themeConsistency",
            Self::GuestExperience => "guestExperience",
        }
    }
}

/// Per-category points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCategories {
    pub creativity: u8,
    pub feasibility: u8,
    pub budget_fit: u8,
    pub theme_consistency: u8,
    pub guest_experience: u8,
}

impl ScoreCategories {
    fn from_array(points: [u8; 5]) -> Self {
        let [creativity, feasibility, budget_fit, theme_consistency, guest_experience] = points;
        Self {
            creativity,
            feasibility,
            budget_fit,
            theme_consistency,
            guest_experience,
        }
    }

    pub fn get(&self, category: ScoreCategory) -> u8 {
        match category {
            ScoreCategory::Creativity => self.creativity,
            ScoreCategory::Feasibility => self.feasibility,
            ScoreCategory::BudgetFit => self.budget_fit,
            ScoreCategory::ThemeConsistency => self.theme_consistency,
            ScoreCategory::GuestExperience => self.guest_experience,
        }
    }

    pub fn sum(&self) -> u32 {
        ScoreCategory::ALL
            .into_iter()
            .map(|c| u32::from(self.get(c)))
            .sum()
    }
}

/// Qualitative band for a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLevel {
    Excellent,
    Outstanding,
    Good,
    Qualified,
}

impl ScoreLevel {
    pub fn from_total(total: u32) -> Self {
        match total {
            98.. => Self::Excellent,
            95..=97 => Self::Outstanding,
            93..=94 => Self::Good,
            _ => Self::Qualified,
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Outstanding => "outstanding",
            Self::Good => "good",
            Self::Qualified => "qualified",
        };
        f.write_str(s)
    }
}

/// A deterministic stand-in for a professional plan score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderScore {
    pub categories: ScoreCategories,
    pub total: u32,
    pub level: ScoreLevel,
    /// Localized label for `level`.
    pub level_label: String,
    /// Always `true`.
    pub is_placeholder: bool,
}

// ---------------------------------------------------------------------------
// Pseudo-random primitives
// ---------------------------------------------------------------------------

/// 32-bit rolling hash (`h = h * 31 + unit`, wrapping) over UTF-16 code
/// units, returned as an absolute value.
pub fn seed_hash(input: &str) -> u32 {
    let hash = input.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs()
}

/// Fractional part of `sin(seed) * 10000`, in `[0, 1)`.
pub fn pseudo_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

fn draw_index(seed: f64) -> usize {
    // `pseudo_random` is < 1, so this is at most 4; the `min` guards
    // against rounding at the boundary.
    ((pseudo_random(seed) * 5.0) as usize).min(4)
}

/// Spread `target - 90` extra points over five categories starting at the
/// floor, then shuffle up to two points between categories.
fn distribute(seed: u32) -> [u8; 5] {
    let base = f64::from(seed);
    let target = MIN_TARGET + (pseudo_random(base) * TARGET_SPAN) as u32;

    let mut points = [CATEGORY_FLOOR; 5];
    let mut remaining = target - u32::from(CATEGORY_FLOOR) * 5;
    let mut draw = 0u32;

    while remaining > 0 {
        let idx = if draw < MAX_DRAWS {
            draw_index(base + 1.0 + f64::from(draw))
        } else {
            // Unreachable in practice; guarantees termination.
            match points.iter().position(|p| *p < CATEGORY_CAP) {
                Some(i) => i,
                None => break,
            }
        };
        if points[idx] < CATEGORY_CAP {
            points[idx] += 1;
            remaining -= 1;
        }
        draw += 1;
    }

    let adjustments = (pseudo_random(base + 100.0) * 3.0) as u32;
    for k in 0..adjustments {
        let from = draw_index(base + 200.0 + f64::from(k));
        let to = draw_index(base + 300.0 + f64::from(k));
        if from != to && points[from] > CATEGORY_FLOOR && points[to] < CATEGORY_CAP {
            points[from] -= 1;
            points[to] += 1;
        }
    }

    points
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Compute the placeholder score for a selection and the size of its plan.
pub fn placeholder_score(
    selection: &FormSelection,
    plan_len: usize,
    language: Language,
) -> PlaceholderScore {
    let seed = seed_hash(&selection.hash_key(plan_len));
    let categories = ScoreCategories::from_array(distribute(seed));
    let total = categories.sum();
    let level = ScoreLevel::from_total(total);
    let level_label = Dictionary::load(language).text(&format!("score.level.{level}"));

    tracing::debug!(seed, total, %level, "computed placeholder score");

    PlaceholderScore {
        categories,
        total,
        level,
        level_label,
        is_placeholder: true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
