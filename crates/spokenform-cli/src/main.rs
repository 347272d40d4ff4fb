//! Spokenform CLI
//!
//! Command-line front end for:
//! - Reconciling vocabulary override files with the built-in catalog
//! - Watching override files and reporting republications
//! - Describing compiled commands in spoken form
//! - Planning fallback responses and sending commands over file RPC

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use spokenform_ast::{describe_action, ActionDescriptor, Vocabulary};
use spokenform_transport::fallback::EditorError;
use spokenform_transport::{
    CommandClient, CommandEnvelope, CommandResponse, Editor, EditorOp, FallbackPlan, FileRpcTransport,
    Homophones, PhraseTracker,
};
use spokenform_vocab::{BuiltinGroup, Reconciled, SettingsConfig, VocabularyEngine};
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

#[derive(Parser)]
#[command(name = "spokenform")]
#[command(author, version, about = "Spokenform: voice vocabulary and command tooling")]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// More logging (DEBUG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Less logging (WARN)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SettingsArgs {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root that a relative settings directory resolves against
    #[arg(long, global = true)]
    user_dir: Option<PathBuf>,

    /// Directory holding the override files
    #[arg(long, global = true)]
    settings_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in vocabulary groups and their override files
    Groups,

    /// Reconcile groups once and print the resulting tables
    Reconcile {
        /// Groups to reconcile (default: all)
        groups: Vec<String>,
        /// Never create or append to override files
        #[arg(long)]
        no_update: bool,
        /// Print tables as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reconcile groups, then report republications until a line is entered
    Watch {
        /// Groups to watch (default: all)
        groups: Vec<String>,
    },

    /// Print the spoken form of a command envelope or action
    Describe {
        /// JSON file holding an envelope or a bare action
        input: PathBuf,
    },

    /// Print the local plan for a fallback response
    Fallback {
        /// JSON file holding `{"fallback": {...}}`
        input: PathBuf,
        /// Homophone groups, one comma-separated group per line
        #[arg(long, requires = "selection")]
        homophones: Option<PathBuf>,
        /// Run the plan against this selected text and print the result
        #[arg(long)]
        selection: Option<String>,
    },

    /// Send an action to the editor over file RPC
    Send {
        /// JSON file holding the action
        input: PathBuf,
        /// Directory shared with the editor
        #[arg(long)]
        rpc_dir: PathBuf,
        /// Transcript recorded in the envelope
        #[arg(long, default_value = "")]
        spoken_form: String,
        /// Shell command that wakes the editor
        #[arg(long)]
        trigger: Option<String>,
        /// Seconds to wait for a response
        #[arg(long, default_value_t = 3)]
        timeout: u64,
        /// Do not wait for the editor to finish
        #[arg(long)]
        no_wait: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let config = load_config(&cli.settings)?;

    match cli.command {
        Commands::Groups => cmd_groups(&config),
        Commands::Reconcile { groups, no_update, json } => cmd_reconcile(config, &groups, no_update, json),
        Commands::Watch { groups } => cmd_watch(config, &groups),
        Commands::Describe { input } => cmd_describe(config, &input),
        Commands::Fallback {
            input,
            homophones,
            selection,
        } => cmd_fallback(&input, homophones.as_deref(), selection.as_deref()),
        Commands::Send {
            input,
            rpc_dir,
            spoken_form,
            trigger,
            timeout,
            no_wait,
        } => cmd_send(&input, rpc_dir, &spoken_form, trigger, Duration::from_secs(timeout), no_wait),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(args: &SettingsArgs) -> Result<SettingsConfig> {
    let mut config = match &args.config {
        Some(path) => SettingsConfig::load(path)?,
        None => SettingsConfig::default(),
    }
    .with_env_overrides();
    if let Some(dir) = &args.user_dir {
        config.user_dir = dir.clone();
    }
    if let Some(dir) = &args.settings_dir {
        config.settings_directory = dir.clone();
    }
    Ok(config)
}

fn parse_groups(names: &[String]) -> Result<Vec<BuiltinGroup>> {
    if names.is_empty() {
        return Ok(BuiltinGroup::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| name.parse::<BuiltinGroup>().map_err(anyhow::Error::from))
        .collect()
}

fn reconcile_groups(engine: &VocabularyEngine, groups: &[BuiltinGroup], no_update: bool) -> Vec<Reconciled> {
    groups
        .iter()
        .map(|group| {
            let mut options = group.options();
            options.no_update_file = no_update;
            engine.reconcile(group.file_id(), group.defaults(), options)
        })
        .collect()
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

// ============================================================================
// Vocabulary commands
// ============================================================================

fn cmd_groups(config: &SettingsConfig) -> Result<()> {
    for group in BuiltinGroup::ALL {
        let table = group.default_table();
        println!(
            "{:<32} {:>4} entries  {}",
            group.file_id().bold(),
            table.len(),
            config.file_path(group.file_id()).display()
        );
    }
    Ok(())
}

fn cmd_reconcile(mut config: SettingsConfig, names: &[String], no_update: bool, json: bool) -> Result<()> {
    let groups = parse_groups(names)?;
    config.watch_files = false;
    let engine = VocabularyEngine::new(config);
    let reconciled = reconcile_groups(&engine, &groups, no_update);

    if json {
        let tables: serde_json::Map<String, Value> = groups
            .iter()
            .zip(&reconciled)
            .map(|(group, result)| Ok((group.file_id().to_string(), serde_json::to_value(result.table().lists())?)))
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    let mut error_count = 0;
    for (group, result) in groups.iter().zip(&reconciled) {
        let report = &result.report;
        let status = if report.has_errors() || !report.io_errors.is_empty() {
            "errors".red().bold()
        } else {
            "ok".green().bold()
        };
        println!("{} {} ({})", status, group.file_id().bold(), report.path.display());
        if report.created {
            println!("  {} new file", "wrote".green());
        }
        for (spoken, id) in &report.appended {
            println!("  {} {spoken}: {id}", "added".green());
        }
        for diagnostic in &report.diagnostics {
            println!("  {} {diagnostic}", "error:".red());
        }
        for err in &report.io_errors {
            println!("  {} {err}", "io:".red());
        }
        error_count += report.diagnostics.len() + report.io_errors.len();

        for (list, entries) in result.table().lists() {
            println!("  {}", list.cyan());
            for (spoken, id) in entries {
                println!("    {spoken:<24} {id}");
            }
        }
    }
    if error_count > 0 {
        eprintln!("{} {error_count} problem(s) found", "warning:".yellow().bold());
    }
    Ok(())
}

fn cmd_watch(mut config: SettingsConfig, names: &[String]) -> Result<()> {
    let groups = parse_groups(names)?;
    config.watch_files = true;
    let engine = VocabularyEngine::new(config);
    let reconciled = reconcile_groups(&engine, &groups, false);

    for (group, result) in groups.iter().zip(&reconciled) {
        let state = if result.subscription.is_active() {
            "watching".green().bold()
        } else {
            "not watched".yellow().bold()
        };
        println!("{state} {}", result.report.path.display());
        tracing::debug!(group = %group, generation = result.handle.generation(), "initial table");
    }
    eprintln!("{}", "press enter to stop".dimmed());

    // Republications are logged by the engine; wait for the user.
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("failed to read stdin")?;

    for (group, result) in groups.iter().zip(&reconciled) {
        tracing::info!(group = %group, generation = result.handle.generation(), "final table");
    }
    engine.shutdown();
    Ok(())
}

// ============================================================================
// Command commands
// ============================================================================

fn parse_action(value: Value) -> Result<ActionDescriptor> {
    if value.get("action").is_some() {
        let envelope: CommandEnvelope = serde_json::from_value(value).context("invalid command envelope")?;
        return Ok(envelope.action().clone());
    }
    serde_json::from_value(value).context("invalid action")
}

fn cmd_describe(mut config: SettingsConfig, input: &Path) -> Result<()> {
    let action = parse_action(read_json(input)?)?;
    config.watch_files = false;
    let engine = VocabularyEngine::new(config);
    let reconciled = reconcile_groups(&engine, &BuiltinGroup::ALL, true);
    let vocabulary = Vocabulary::from_handles(reconciled.iter().map(|result| &result.handle));

    let spoken = describe_action(&vocabulary, &action)?;
    println!("{}", spoken.bold());
    Ok(())
}

fn load_homophones(path: Option<&Path>) -> Result<Homophones> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Homophones::parse(&text))
        }
        None => Ok(Homophones::new()),
    }
}

/// Editor holding a single selection, recording what a plan does to it.
#[derive(Debug, Default)]
struct PreviewEditor {
    selection: String,
    ops: Vec<EditorOp>,
}

impl Editor for PreviewEditor {
    fn perform(&mut self, op: &EditorOp) -> std::result::Result<(), EditorError> {
        if let EditorOp::Insert(text) = op {
            self.selection = text.clone();
        }
        self.ops.push(op.clone());
        Ok(())
    }

    fn selected_text(&mut self) -> std::result::Result<String, EditorError> {
        Ok(self.selection.clone())
    }
}

/// Run `plan` over `selection`; returns the editor and any returned text.
fn preview_fallback(
    plan: &FallbackPlan,
    homophones: &Homophones,
    selection: &str,
) -> Result<(PreviewEditor, Option<String>)> {
    let mut editor = PreviewEditor {
        selection: selection.to_string(),
        ..Default::default()
    };
    let returned = plan.execute(&mut editor, homophones)?;
    Ok((editor, returned))
}

fn cmd_fallback(input: &Path, homophones: Option<&Path>, selection: Option<&str>) -> Result<()> {
    let response: CommandResponse = serde_json::from_value(read_json(input)?).context("invalid response")?;
    let CommandResponse::Fallback(fallback) = response else {
        println!("{} no fallback in response", "info:".yellow().bold());
        return Ok(());
    };

    let plan = FallbackPlan::from_fallback(&fallback)?;
    println!("{} {}", "fallback".green().bold(), fallback.action.bold());
    print!("{plan}");

    let Some(selection) = selection else {
        return Ok(());
    };
    let homophones = load_homophones(homophones)?;
    tracing::debug!(groups = homophones.len(), "homophones loaded");

    let (editor, returned) = preview_fallback(&plan, &homophones, selection)?;
    for op in &editor.ops {
        println!("  {} {op}", "editor".cyan());
    }
    println!("{} {}", "selection".bold(), editor.selection);
    if let Some(text) = returned {
        println!("{} {text}", "returned".bold());
    }
    Ok(())
}

/// Prints each editor operation instead of performing it.
struct PrintingEditor;

impl Editor for PrintingEditor {
    fn perform(&mut self, op: &EditorOp) -> std::result::Result<(), EditorError> {
        println!("  {} {op}", "editor".cyan());
        Ok(())
    }

    fn selected_text(&mut self) -> std::result::Result<String, EditorError> {
        Ok(String::new())
    }
}

fn shell_trigger(command: Option<String>) -> impl Fn() -> io::Result<()> + Send + Sync + 'static {
    move || {
        let Some(command) = &command else {
            return Ok(());
        };
        let status = Command::new("sh").arg("-c").arg(command).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::Other, format!("trigger exited with {status}")))
        }
    }
}

fn cmd_send(
    input: &Path,
    rpc_dir: PathBuf,
    spoken_form: &str,
    trigger: Option<String>,
    timeout: Duration,
    no_wait: bool,
) -> Result<()> {
    let action = parse_action(read_json(input)?)?;
    let transport = FileRpcTransport::new(rpc_dir, shell_trigger(trigger)).with_timeout(timeout);
    let phrases = Arc::new(PhraseTracker::new());
    phrases.begin_phrase(spoken_form);
    let client = CommandClient::new(transport, phrases);

    if no_wait {
        client.command_no_wait(action)?;
        println!("{}", "sent".green().bold());
        return Ok(());
    }

    let value = client
        .command_get(action, &mut PrintingEditor)
        .context("command failed")?;
    client.phrases().end_phrase();
    println!("{} {}", "ok".green().bold(), serde_json::to_string(&value)?);
    Ok(())
}
