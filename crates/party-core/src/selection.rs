use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// One of the six form fields, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PartyType,
    GuestCount,
    Venue,
    Budget,
    Theme,
    Atmosphere,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::PartyType,
        Field::GuestCount,
        Field::Venue,
        Field::Budget,
        Field::Theme,
        Field::Atmosphere,
    ];

    /// JSON / dictionary key for this field (camelCase).
    pub fn key(self) -> &'static str {
        match self {
            Self::PartyType => "partyType",
            Self::GuestCount => "guestCount",
            Self::Venue => "venue",
            Self::Budget => "budget",
            Self::Theme => "theme",
            Self::Atmosphere => "atmosphere",
        }
    }

    /// Known values for enumerated fields. `Theme` is free text.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::PartyType => PartyType::VALUES,
            Self::GuestCount => GuestCount::VALUES,
            Self::Venue => Venue::VALUES,
            Self::Budget => Budget::VALUES,
            Self::Theme => &[],
            Self::Atmosphere => Atmosphere::VALUES,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = FieldParseError;

    /// Accepts the camelCase key as well as kebab/snake spellings
    /// (`party-type`, `guest_count`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Field::ALL
            .into_iter()
            .find(|field| field.key().to_ascii_lowercase() == normalized)
            .ok_or_else(|| FieldParseError(s.to_owned()))
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown form field: {0:?}")]
pub struct FieldParseError(pub String);

// ---------------------------------------------------------------------------
// Enumerated field values
// ---------------------------------------------------------------------------

/// Error returned when a field value is not one of the known options.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {field} value: {value:?}")]
pub struct ValueParseError {
    pub field: &'static str,
    pub value: String,
}

macro_rules! field_values {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($s),+];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $(Self::$variant => $s),+
                };
                f.write_str(s)
            }
        }

        impl FromStr for $name {
            type Err = ValueParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    other => Err(ValueParseError {
                        field: $field,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

field_values!(
    /// Kind of party being planned.
    PartyType, "partyType" {
        Birthday => "birthday",
        Child => "child",
        Wedding => "wedding",
        Corporate => "corporate",
        Graduation => "graduation",
        Anniversary => "anniversary",
    }
);

field_values!(
    /// Rough size of the guest list.
    GuestCount, "guestCount" {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
);

field_values!(
    Venue, "venue" {
        Indoor => "indoor",
        Outdoor => "outdoor",
    }
);

field_values!(
    /// Budget tier. Selects the catering price range.
    Budget, "budget" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

field_values!(
    Atmosphere, "atmosphere" {
        Lively => "lively",
        Elegant => "elegant",
        Cozy => "cozy",
        Romantic => "romantic",
    }
);

// ---------------------------------------------------------------------------
// FormSelection
// ---------------------------------------------------------------------------

/// The six user-chosen party attributes that drive plan generation.
///
/// Values are kept as raw strings: unknown values are carried through
/// verbatim and missing ones are empty. Use the typed accessors
/// ([`FormSelection::venue`] etc.) when a known option is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSelection {
    pub party_type: String,
    pub guest_count: String,
    pub venue: String,
    pub budget: String,
    pub theme: String,
    pub atmosphere: String,
}

impl FormSelection {
    /// Extract a selection from an arbitrary JSON value.
    ///
    /// Never fails: strings are taken as-is, numbers and booleans are
    /// stringified, anything else (null, arrays, objects, missing keys)
    /// becomes an empty string. A non-object value yields an empty selection.
    pub fn from_json_value(value: &Value) -> Self {
        let mut selection = Self::default();
        let Some(map) = value.as_object() else {
            return selection;
        };
        for field in Field::ALL {
            let text = match map.get(field.key()) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => String::new(),
            };
            selection.set(field, text);
        }
        selection
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::PartyType => &self.party_type,
            Field::GuestCount => &self.guest_count,
            Field::Venue => &self.venue,
            Field::Budget => &self.budget,
            Field::Theme => &self.theme,
            Field::Atmosphere => &self.atmosphere,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::PartyType => &mut self.party_type,
            Field::GuestCount => &mut self.guest_count,
            Field::Venue => &mut self.venue,
            Field::Budget => &mut self.budget,
            Field::Theme => &mut self.theme,
            Field::Atmosphere => &mut self.atmosphere,
        };
        *slot = value.into();
    }

    /// Overwrite fields with every non-empty field of `other`.
    pub fn merge(&mut self, other: &FormSelection) {
        for field in Field::ALL {
            let value = other.get(field);
            if !value.trim().is_empty() {
                self.set(field, value);
            }
        }
    }

    /// Fields that are empty (after trimming), in wizard order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Seed string for the placeholder score: the six fields and the plan
    /// size joined with `-`.
    pub fn hash_key(&self, plan_len: usize) -> String {
        format!(
            "{}-{}-{}-{}-{}-{}-{plan_len}",
            self.party_type, self.guest_count, self.venue, self.budget, self.theme, self.atmosphere,
        )
    }

    pub fn party_type(&self) -> Option<PartyType> {
        self.party_type.parse().ok()
    }

    pub fn guest_count(&self) -> Option<GuestCount> {
        self.guest_count.parse().ok()
    }

    pub fn venue(&self) -> Option<Venue> {
        self.venue.parse().ok()
    }

    pub fn budget(&self) -> Option<Budget> {
        self.budget.parse().ok()
    }

    pub fn atmosphere(&self) -> Option<Atmosphere> {
        self.atmosphere.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
