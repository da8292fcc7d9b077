//! Template-fill plan generation.
//!
//! Every category has a fixed list of templates in the language dictionary
//! (`templates.<category>`). Generation substitutes `{token}` placeholders
//! with localized labels for the user's selections. This module contains
//! pure logic: no I/O and no error path. Missing fields interpolate as empty
//! strings and unknown values are carried through verbatim.

use crate::i18n::{Dictionary, interpolate};
use crate::selection::{Atmosphere, Budget, Field, FormSelection, Venue};

use super::{Category, Plan};

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Resolved values for every placeholder a template may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTokens {
    pub party_type: String,
    pub guest_count: String,
    pub venue: String,
    pub budget: String,
    pub theme: String,
    pub atmosphere: String,
    /// Indoor or outdoor wording.
    pub venue_style: String,
    /// Catering price range for the budget tier.
    pub price_range: String,
    /// Classical wording for an elegant party, upbeat otherwise.
    pub music_style: String,
}

impl TemplateTokens {
    pub fn resolve(selection: &FormSelection, dict: &Dictionary) -> Self {
        Self {
            party_type: field_label(dict, selection, Field::PartyType),
            guest_count: field_label(dict, selection, Field::GuestCount),
            venue: field_label(dict, selection, Field::Venue),
            budget: field_label(dict, selection, Field::Budget),
            theme: field_label(dict, selection, Field::Theme),
            atmosphere: field_label(dict, selection, Field::Atmosphere),
            venue_style: dict.text(venue_style_key(selection.venue())),
            price_range: dict.text(price_range_key(selection.budget())),
            music_style: dict.text(music_style_key(selection.atmosphere())),
        }
    }

    fn as_args(&self) -> [(&str, &str); 9] {
        [
            ("partyType", self.party_type.as_str()),
            ("guestCount", self.guest_count.as_str()),
            ("venue", self.venue.as_str()),
            ("budget", self.budget.as_str()),
            ("theme", self.theme.as_str()),
            ("atmosphere", self.atmosphere.as_str()),
            ("venueStyle", self.venue_style.as_str()),
            ("priceRange", self.price_range.as_str()),
            ("musicStyle", self.music_style.as_str()),
        ]
    }
}

/// Localized display label for one field of the selection.
///
/// Enumerated values map through `labels.<field>.<value>`; free text and
/// values without a label are returned as-is. Empty stays empty.
pub fn field_label(dict: &Dictionary, selection: &FormSelection, field: Field) -> String {
    let value = selection.get(field);
    if value.trim().is_empty() || field == Field::Theme {
        return value.to_owned();
    }
    dict.try_text(&format!("labels.{}.{value}", field.key()))
        .map_or_else(|| value.to_owned(), str::to_owned)
}

fn venue_style_key(venue: Option<Venue>) -> &'static str {
    match venue {
        Some(Venue::Indoor) => "words.venueStyle.indoor",
        _ => "words.venueStyle.outdoor",
    }
}

fn music_style_key(atmosphere: Option<Atmosphere>) -> &'static str {
    match atmosphere {
        Some(Atmosphere::Elegant) => "words.musicStyle.elegant",
        _ => "words.musicStyle.upbeat",
    }
}

/// Anything that is not `high` or `medium` (including unsupported tiers)
/// gets the lowest price range.
fn price_range_key(budget: Option<Budget>) -> &'static str {
    match budget {
        Some(Budget::High) => "catering.price.high",
        Some(Budget::Medium) => "catering.price.medium",
        _ => "catering.price.low",
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Fill every category's templates from `selection`.
pub fn generate_plan(selection: &FormSelection, dict: &Dictionary) -> Plan {
    let tokens = TemplateTokens::resolve(selection, dict);
    let args = tokens.as_args();

    let mut plan = Plan::default();
    for category in Category::ALL {
        let templates = dict.list(&format!("templates.{}", category.key()));
        *plan.section_mut(category) = templates
            .iter()
            .map(|template| interpolate(template, &args))
            .collect();
    }
    tracing::debug!(
        language = %dict.language(),
        entries = plan.len(),
        "generated template plan"
    );
    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
