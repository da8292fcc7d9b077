//! `partyplan form ...` and `partyplan lang`: the wizard over persisted state.

use anyhow::{Context, Result};

use party_core::plan::field_label;
use party_core::wizard::{self, FormAction};
use party_core::{Dictionary, Field, FormSelection, Language};

use crate::FormCommands;
use crate::storage::LocalStore;

pub fn run_form_command(
    command: &FormCommands,
    store: &mut LocalStore,
    dict: &Dictionary,
) -> Result<()> {
    match command {
        FormCommands::Show => show_form(&store.load_form(), dict),
        FormCommands::Set(fields) => {
            let mut state = store.load_form();
            for (field, value) in fields.provided() {
                warn_if_unknown(field, &value);
                state = wizard::apply(state, FormAction::Set { field, value });
            }
            store.save_form(&state)?;
            store.save().context("failed to persist form")?;
            tracing::debug!(path = %store.path().display(), "form saved");
            print_next(&state, dict);
        }
        FormCommands::Next => print_next(&store.load_form(), dict),
        FormCommands::Reset => {
            let state = wizard::apply(store.load_form(), FormAction::Reset);
            store.clear_form();
            store.save().context("failed to persist form")?;
            println!("{}", dict.text("wizard.reset"));
            print_next(&state, dict);
        }
    }
    Ok(())
}

/// Show the persisted language, or validate and persist a new one.
pub fn run_lang(store: &mut LocalStore, code: Option<&str>, current: Language) -> Result<()> {
    match code {
        None => println!("{current}"),
        Some(code) => {
            let language: Language = code.parse()?;
            store.set_language(language);
            store.save().context("failed to persist language")?;
            let dict = Dictionary::load(language);
            println!(
                "{}",
                dict.format("wizard.languageSet", &[("language", language.code())])
            );
        }
    }
    Ok(())
}

fn warn_if_unknown(field: Field, value: &str) {
    let options = field.options();
    if !options.is_empty() && !options.contains(&value.trim()) {
        tracing::warn!(
            field = field.key(),
            value,
            expected = ?options,
            "value is not a known option; it will be used verbatim"
        );
    }
}

fn show_form(state: &FormSelection, dict: &Dictionary) {
    let (step, total) = wizard::progress(state);
    let width = Field::ALL
        .iter()
        .map(|f| dict.text(&format!("fields.{}", f.key())).chars().count())
        .max()
        .unwrap_or(0);

    for field in Field::ALL {
        let name = dict.text(&format!("fields.{}", field.key()));
        let raw = state.get(field);
        let shown = if raw.is_empty() {
            "-".to_string()
        } else {
            let label = field_label(dict, state, field);
            if label == raw {
                label
            } else {
                format!("{label} ({raw})")
            }
        };
        let pad = width.saturating_sub(name.chars().count());
        println!("  {name}{}  {shown}", " ".repeat(pad));
    }
    println!();
    println!("[{step}/{total}]");
    print_next(state, dict);
}

fn print_next(state: &FormSelection, dict: &Dictionary) {
    let Some(field) = wizard::next_step(state) else {
        println!("{}", dict.text("wizard.complete"));
        return;
    };

    let missing = state
        .missing_fields()
        .iter()
        .map(|f| dict.text(&format!("fields.{}", f.key())))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}", dict.format("wizard.missing", &[("fields", missing.as_str())]));

    let name = dict.text(&format!("fields.{}", field.key()));
    println!("{}", dict.format("wizard.next", &[("field", name.as_str())]));

    let options = field.options();
    if options.is_empty() {
        println!("  {}", dict.text("wizard.freeText"));
    } else {
        let listed = options
            .iter()
            .map(|value| {
                let label = dict.text(&format!("labels.{}.{value}", field.key()));
                format!("{value} ({label})")
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}", dict.format("wizard.options", &[("options", listed.as_str())]));
    }
}
