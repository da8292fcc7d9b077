//! `partyplan export`: render the stored form's plan as an HTML document.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use party_core::export::{render_html, write_export};
use party_core::plan::generate_plan;
use party_core::{Dictionary, Language, placeholder_score};

use crate::storage::LocalStore;

/// Write the export for the persisted form into `output` (defaults to the
/// current directory) and return the written path.
///
/// A failed write is logged and reported once; there is no retry.
pub fn run_export(store: &LocalStore, language: Language, output: Option<&Path>) -> Result<PathBuf> {
    let dict = Dictionary::load(language);
    let selection = store.load_form();
    if !selection.is_complete() {
        tracing::warn!(
            missing = ?selection.missing_fields(),
            "exporting an incomplete selection"
        );
    }

    let plan = generate_plan(&selection, &dict);
    let score = placeholder_score(&selection, plan.len(), language);
    let now = chrono::Local::now().naive_local();
    let mut html = String::with_capacity(8192);
    render_html(&mut html, &plan, &score, &selection, &dict, now)?;

    let dir = output.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    match write_export(&dir, &html, now) {
        Ok(path) => {
            let shown = path.display().to_string();
            println!("{}", dict.format("export.saved", &[("path", shown.as_str())]));
            Ok(path)
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), dir = %dir.display(), "export failed");
            let detail = format!("{err:#}");
            Err(anyhow!(
                "{}",
                dict.format("export.failed", &[("error", detail.as_str())])
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use party_core::FormSelection;

    #[test]
    fn export_writes_html_for_stored_form() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut store = LocalStore::open(tmp.path()).unwrap();
        store
            .save_form(&FormSelection {
                party_type: "wedding".into(),
                guest_count: "large".into(),
                venue: "outdoor".into(),
                budget: "high".into(),
                theme: "Garden <Party>".into(),
                atmosphere: "romantic".into(),
            })
            .unwrap();

        let out = tmp.path().join("exports");
        let path = run_export(&store, Language::En, Some(&out)).unwrap();
        assert!(path.starts_with(&out));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("party-plan-") && name.ends_with(".html"), "{name}");

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Garden &lt;Party&gt;"));
        assert!(!html.contains("Garden <Party>"));
    }

    #[test]
    fn export_failure_is_reported_with_localized_message() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = LocalStore::open(tmp.path()).unwrap();
        // A regular file where the export directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let err = run_export(&store, Language::En, Some(&blocker)).unwrap_err();
        assert!(err.to_string().starts_with("Export failed:"), "{err}");
    }
}
