//! Core logic for the party planner: form selections, template-fill plan
//! generation, the deterministic placeholder score, translation
//! dictionaries and the HTML export renderer.
//!
//! Everything here is pure except [`plan::MockPlanBackend`] (which sleeps)
//! and [`export::write_export`] (which writes a file).

pub mod export;
pub mod i18n;
pub mod plan;
pub mod score;
pub mod selection;
pub mod wizard;

pub use i18n::{Dictionary, Language};
pub use plan::{Category, Plan};
pub use score::{PlaceholderScore, placeholder_score};
pub use selection::{Field, FormSelection};
