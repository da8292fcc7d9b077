mod config;
mod export_cmd;
mod form_cmds;
mod plan_cmds;
mod serve_cmd;
mod storage;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use party_core::plan::MockPlanBackend;
use party_core::{Dictionary, Field, FormSelection, Language};

use config::{CliOverrides, PartyConfig};
use storage::LocalStore;

#[derive(Parser)]
#[command(name = "partyplan", about = "Party planner: template plans and placeholder scores")]
struct Cli {
    /// Output language, zh or en (overrides PARTYPLAN_LANG and the saved choice)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Directory holding storage.json (overrides PARTYPLAN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a partyplan config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP endpoint
    Serve {
        /// Address to bind (overrides PARTYPLAN_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides PARTYPLAN_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fill in the party form step by step
    Form {
        #[command(subcommand)]
        command: FormCommands,
    },
    /// Show or set the saved language
    Lang {
        /// Language code to save (omit to show the current one)
        code: Option<String>,
    },
    /// Generate a plan and its placeholder score from the saved form
    Generate {
        #[command(flatten)]
        fields: FieldArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export the saved form's plan as an HTML document
    Export {
        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Parse a free-text plan file and score it
    Import {
        /// Path to the plan text (markdown headings per category)
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum FormCommands {
    /// Show the saved selections and the next step
    Show,
    /// Set one or more fields
    Set(FieldArgs),
    /// Show the next field to fill in
    Next,
    /// Clear all saved selections
    Reset,
}

/// One flag per form field.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// birthday, child, wedding, corporate, graduation or anniversary
    #[arg(long)]
    pub party_type: Option<String>,
    /// small, medium or large
    #[arg(long)]
    pub guest_count: Option<String>,
    /// indoor or outdoor
    #[arg(long)]
    pub venue: Option<String>,
    /// low, medium or high
    #[arg(long)]
    pub budget: Option<String>,
    /// Free-text theme
    #[arg(long)]
    pub theme: Option<String>,
    /// lively, elegant, cozy or romantic
    #[arg(long)]
    pub atmosphere: Option<String>,
}

impl FieldArgs {
    /// The flags that were given, in wizard order.
    pub fn provided(&self) -> Vec<(Field, String)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| {
                let value = match field {
                    Field::PartyType => &self.party_type,
                    Field::GuestCount => &self.guest_count,
                    Field::Venue => &self.venue,
                    Field::Budget => &self.budget,
                    Field::Theme => &self.theme,
                    Field::Atmosphere => &self.atmosphere,
                };
                value.clone().map(|v| (field, v))
            })
            .collect()
    }

    pub fn to_selection(&self) -> FormSelection {
        let mut selection = FormSelection::default();
        for (field, value) in self.provided() {
            selection.set(field, value.trim());
        }
        selection
    }
}

/// Execute the `partyplan init` command: write the default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::default();
    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    println!("  server.bind = {}", cfg.server.bind);
    println!("  server.port = {}", cfg.server.port);
    println!("  server.mock_delay_ms = {}", cfg.server.mock_delay_ms);
    println!("  ui.language = {}", cfg.ui.language);
    println!();
    println!("Next: run `partyplan form next` to start filling in the party form.");

    Ok(())
}

/// Resolved config plus the opened local state, shared by every command
/// except `init`.
struct Session {
    config: PartyConfig,
    store: LocalStore,
    language: Language,
}

impl Session {
    fn open(cli: &Cli, bind: Option<String>, port: Option<u16>) -> anyhow::Result<Self> {
        let config = PartyConfig::resolve(&CliOverrides {
            bind,
            port,
            language: cli.lang.clone(),
            data_dir: cli.data_dir.clone(),
        })?;
        let store = LocalStore::open(&config.data_dir).with_context(|| {
            format!("failed to open local state in {}", config.data_dir.display())
        })?;
        let language = config.language_with(store.language());
        tracing::debug!(data_dir = %config.data_dir.display(), %language, "session opened");
        Ok(Self {
            config,
            store,
            language,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force } => {
            cmd_init(*force)?;
        }
        Commands::Serve { bind, port } => {
            let session = Session::open(&cli, bind.clone(), *port)?;
            let state = serve_cmd::AppState::new(
                MockPlanBackend::new(session.config.mock_delay),
                session.language,
            );
            serve_cmd::run_serve(state, &session.config.bind, session.config.port).await?;
        }
        Commands::Form { command } => {
            let mut session = Session::open(&cli, None, None)?;
            let dict = Dictionary::load(session.language);
            form_cmds::run_form_command(command, &mut session.store, &dict)?;
        }
        Commands::Lang { code } => {
            let mut session = Session::open(&cli, None, None)?;
            form_cmds::run_lang(&mut session.store, code.as_deref(), session.language)?;
        }
        Commands::Generate { fields, json } => {
            let mut session = Session::open(&cli, None, None)?;
            plan_cmds::run_generate(
                &mut session.store,
                &fields.to_selection(),
                session.language,
                *json,
            )
            .await?;
        }
        Commands::Export { output } => {
            let session = Session::open(&cli, None, None)?;
            export_cmd::run_export(&session.store, session.language, output.as_deref())?;
        }
        Commands::Import { file, json } => {
            let session = Session::open(&cli, None, None)?;
            plan_cmds::run_import(&session.store, file, session.language, *json)?;
        }
    }

    Ok(())
}
