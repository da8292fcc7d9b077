//! Multi-step form state: a tiny reducer over [`FormSelection`].
//!
//! The wizard asks for one field per step, in [`Field::ALL`] order. The
//! current step is always the first field that is still empty, so restoring
//! a partially filled form resumes where the user left off.

use crate::selection::{Field, FormSelection};

/// A state transition for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Set a single field.
    Set { field: Field, value: String },
    /// Clear every field.
    Reset,
}

/// Apply `action` to `state`, returning the new state.
pub fn apply(state: FormSelection, action: FormAction) -> FormSelection {
    match action {
        FormAction::Set { field, value } => {
            let mut next = state;
            next.set(field, value.trim());
            next
        }
        FormAction::Reset => FormSelection::default(),
    }
}

/// The next field the user still has to fill in, or `None` when complete.
pub fn next_step(state: &FormSelection) -> Option<Field> {
    state.missing_fields().into_iter().next()
}

/// 1-based progress through the wizard: `(current_step, total_steps)`.
///
/// A complete form reports `(total, total)`.
pub fn progress(state: &FormSelection) -> (usize, usize) {
    let total = Field::ALL.len();
    let current = match next_step(state) {
        Some(field) => Field::ALL
            .iter()
            .position(|f| *f == field)
            .map_or(total, |i| i + 1),
        None => total,
    };
    (current, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_trims_and_advances() {
        let state = apply(
            FormSelection::default(),
            FormAction::Set {
                field: Field::PartyType,
                value: "  birthday ".into(),
            },
        );
        assert_eq!(state.party_type, "birthday");
        assert_eq!(next_step(&state), Some(Field::GuestCount));
        assert_eq!(progress(&state), (2, 6));
    }

    #[test]
    fn next_step_resumes_at_first_gap() {
        let state = FormSelection {
            party_type: "child".into(),
            guest_count: "small".into(),
            budget: "low".into(),
            ..Default::default()
        };
        assert_eq!(next_step(&state), Some(Field::Venue));
    }

    #[test]
    fn reset_clears_everything() {
        let state = FormSelection {
            theme: "space".into(),
            ..Default::default()
        };
        let state = apply(state, FormAction::Reset);
        assert_eq!(state, FormSelection::default());
        assert_eq!(progress(&state), (1, 6));
    }

    #[test]
    fn complete_form_has_no_next_step() {
        let state = FormSelection {
            party_type: "wedding".into(),
            guest_count: "large".into(),
            venue: "outdoor".into(),
            budget: "high".into(),
            theme: "garden".into(),
            atmosphere: "romantic".into(),
        };
        assert_eq!(next_step(&state), None);
        assert_eq!(progress(&state), (6, 6));
    }
}
