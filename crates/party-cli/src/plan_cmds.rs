//! `partyplan generate` and `partyplan import`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use party_core::plan::{MockPlanBackend, PlanBackend, parse_plan_text};
use party_core::score::ScoreCategory;
use party_core::{Dictionary, FormSelection, Language, PlaceholderScore, Plan, placeholder_score};

use crate::storage::LocalStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput<'a> {
    selection: &'a FormSelection,
    plan: &'a Plan,
    score: &'a PlaceholderScore,
}

/// Generate a plan from the persisted form merged with `overrides`.
///
/// Unlike the HTTP endpoint this refuses incomplete selections, the same
/// rule the wizard applies before letting a user submit.
pub async fn run_generate(
    store: &mut LocalStore,
    overrides: &FormSelection,
    language: Language,
    json: bool,
) -> Result<()> {
    let dict = Dictionary::load(language);
    let mut selection = store.load_form();
    selection.merge(overrides);

    let missing = selection.missing_fields();
    if !missing.is_empty() {
        let names = missing
            .iter()
            .map(|f| dict.text(&format!("fields.{}", f.key())))
            .collect::<Vec<_>>()
            .join(", ");
        bail!(
            "{} (set them with `partyplan form set` or pass them as flags)",
            dict.format("wizard.missing", &[("fields", names.as_str())])
        );
    }

    store.save_form(&selection)?;
    store.save().context("failed to persist form")?;

    let backend = MockPlanBackend::default();
    let generated = backend.generate(&selection, language).await?;
    let score = placeholder_score(&selection, generated.plan.len(), language);
    tracing::info!(
        backend = backend.name(),
        entries = generated.plan.len(),
        total = score.total,
        "generated plan"
    );

    print_output(&selection, &generated.plan, &score, &dict, json)
}

/// Parse a free-text plan file and score it against the persisted form.
pub fn run_import(store: &LocalStore, file: &Path, language: Language, json: bool) -> Result<()> {
    let dict = Dictionary::load(language);
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read plan text from {}", file.display()))?;
    let plan = parse_plan_text(&text)
        .with_context(|| format!("failed to parse plan text in {}", file.display()))?;

    let selection = store.load_form();
    let score = placeholder_score(&selection, plan.len(), language);
    tracing::info!(entries = plan.len(), file = %file.display(), "imported plan text");

    print_output(&selection, &plan, &score, &dict, json)
}

fn print_output(
    selection: &FormSelection,
    plan: &Plan,
    score: &PlaceholderScore,
    dict: &Dictionary,
    json: bool,
) -> Result<()> {
    if json {
        let out = PlanOutput {
            selection,
            plan,
            score,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let mut text = String::new();
        render_text(&mut text, plan, score, dict)?;
        print!("{text}");
    }
    Ok(())
}

/// Plain-text rendering of a plan and its score for the terminal.
pub fn render_text<W: fmt::Write>(
    out: &mut W,
    plan: &Plan,
    score: &PlaceholderScore,
    dict: &Dictionary,
) -> fmt::Result {
    for (category, entries) in plan.sections() {
        if entries.is_empty() {
            continue;
        }
        writeln!(out, "## {}", dict.text(&format!("categories.{}", category.key())))?;
        for entry in entries {
            writeln!(out, "  - {entry}")?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "## {}: {}/100 ({})",
        dict.text("score.title"),
        score.total,
        score.level_label
    )?;
    for category in ScoreCategory::ALL {
        writeln!(
            out,
            "  {}: {}/20",
            dict.text(&format!("score.categories.{}", category.key())),
            score.categories.get(category)
        )?;
    }
    writeln!(out, "  {}", dict.text("score.note"))
}
