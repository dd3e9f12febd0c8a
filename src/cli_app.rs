//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::thread;

use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use calmkit::core::config::Config;
use calmkit::core::errors::CalmError;
use calmkit::core::progress_store::QuizProgressStore;
use calmkit::logger::activity::{
    ActivityEvent, ActivityLoggerConfig, ActivityLoggerHandle, spawn_logger,
};
use calmkit::logger::jsonl::JsonlConfig;
use calmkit::page::layout::{site_page, sos_overlay_page};
use calmkit::sos::script::{parse_script, run_script};
use calmkit::sos::{SosController, VirtualClock};
use calmkit::widgets::emotions::{self, EMOTIONS};
use calmkit::widgets::jar::Jar;
use calmkit::widgets::quiz::{self, QUESTION_COUNT};
use calmkit::widgets::roi::RoiInputs;
use calmkit::widgets::tools::{self, ANXIETY_MAX_ANSWER, LOAD_ITEMS};
use calmkit::widgets::{InitOutcome, Site};

/// calmkit: crisis-support overlay and self-care widgets in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "calmkit",
    author,
    version,
    about = "calmkit - SOS overlay, breathing, grounding and self-care tools",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Open the interactive SOS overlay in the terminal.
    Sos(SosArgs),
    /// Replay a scripted SOS session on a virtual clock.
    Simulate(SimulateArgs),
    /// Score the wellbeing quiz or manage its saved progress.
    Quiz(QuizArgs),
    /// Estimate the return on investing in therapy.
    Roi(RoiArgs),
    /// Two-question anxiety check.
    Check(CheckArgs),
    /// Mental-load checklist.
    Load(LoadArgs),
    /// Draw encouraging phrases from the calm jar.
    Jar(JarArgs),
    /// List emotions or show one emotion's card.
    Emotions(EmotionsArgs),
    /// Bootstrap every site widget and report the outcome.
    Site,
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
enum StartArg {
    /// Start with the overlay closed.
    Closed,
    /// Start on the entry screen.
    #[default]
    Open,
    /// Start on the body-scan intro.
    BodyScan,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
struct SosArgs {
    /// Where the session starts.
    #[arg(long, value_enum, default_value_t = StartArg::Open)]
    start: StartArg,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
struct SimulateArgs {
    /// Script file (one action or `wait <duration>` per line); stdin when omitted or `-`.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
#[command(group(
    ArgGroup::new("quiz_mode")
        .required(true)
        .args(["answers", "status", "reset"])
))]
struct QuizArgs {
    /// Comma-separated answers, one per question, each 0-3.
    #[arg(long, value_delimiter = ',', value_name = "A,B,...")]
    answers: Vec<u8>,
    /// Show the saved question index.
    #[arg(long)]
    status: bool,
    /// Forget the saved question index.
    #[arg(long)]
    reset: bool,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
struct RoiArgs {
    /// Hours lost per week to the problem.
    #[arg(long, value_name = "HOURS")]
    lost_hours: Option<f64>,
    /// Yearly productivity loss in pesos.
    #[arg(long, value_name = "MXN")]
    productivity: Option<f64>,
    /// Relationship impact, 1-10.
    #[arg(long, value_name = "SCORE")]
    relationship: Option<f64>,
    /// Health impact, 1-10.
    #[arg(long, value_name = "SCORE")]
    health: Option<f64>,
    /// Yearly therapy investment in pesos.
    #[arg(long, value_name = "MXN")]
    therapy: Option<f64>,
}

#[derive(Debug, Clone, Args, Serialize)]
struct CheckArgs {
    /// Answer to "nervous or on edge", 0-3.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=i64::from(ANXIETY_MAX_ANSWER)))]
    nervous: u8,
    /// Answer to "unable to stop worrying", 0-3.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=i64::from(ANXIETY_MAX_ANSWER)))]
    worry: u8,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
struct LoadArgs {
    /// Indexes of the checklist items that apply (see --list).
    #[arg(value_name = "ITEM")]
    items: Vec<usize>,
    /// Print the checklist items with their indexes.
    #[arg(long, conflicts_with = "items")]
    list: bool,
}

#[derive(Debug, Clone, Args, Serialize)]
struct JarArgs {
    /// Seed for reproducible draws.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Number of phrases to draw.
    #[arg(long, default_value_t = 1, value_name = "N")]
    count: usize,
}

impl Default for JarArgs {
    fn default() -> Self {
        Self {
            seed: None,
            count: 1,
        }
    }
}

#[derive(Debug, Clone, Args, Serialize, Default)]
struct EmotionsArgs {
    /// Emotion name (case-insensitive). Lists every emotion when omitted.
    #[arg(value_name = "NAME")]
    name: Option<String>,
}

#[derive(Debug, Clone, Args, Serialize, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand, Serialize)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<CalmError> for CliError {
    fn from(err: CalmError) -> Self {
        match err {
            CalmError::InvalidConfig { .. }
            | CalmError::MissingConfig { .. }
            | CalmError::ConfigParse { .. }
            | CalmError::UnknownAction { .. }
            | CalmError::Scenario { .. }
            | CalmError::InvalidInput { .. } => Self::User(err.to_string()),
            _ => Self::Runtime(err.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Sos(args) => run_sos(cli, args),
        Command::Simulate(args) => run_simulate(cli, args),
        Command::Quiz(args) => run_quiz(cli, args),
        Command::Roi(args) => run_roi(cli, args),
        Command::Check(args) => run_check(cli, args),
        Command::Load(args) => run_load(cli, args),
        Command::Jar(args) => run_jar(cli, args),
        Command::Emotions(args) => run_emotions(cli, args),
        Command::Site => run_site(cli),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ──────────────────── activity log ────────────────────

/// Logger thread for the lifetime of one command.
struct ActivityLog {
    handle: ActivityLoggerHandle,
    join: Option<thread::JoinHandle<()>>,
}

impl ActivityLog {
    fn start(config: &Config) -> Result<Self, CliError> {
        if !config.logging.enabled {
            return Ok(Self {
                handle: ActivityLoggerHandle::detached(),
                join: None,
            });
        }
        let logger_config = ActivityLoggerConfig {
            jsonl_config: JsonlConfig {
                path: config.paths.activity_log.clone(),
                fallback_path: Some(std::env::temp_dir().join("calmkit-activity.jsonl")),
                max_size_bytes: config.logging.max_size_bytes,
                max_rotated_files: config.logging.max_rotated_files,
            },
            channel_capacity: config.logging.channel_capacity,
        };
        let (handle, join) = spawn_logger(logger_config)?;
        handle.send(ActivityEvent::SessionStarted {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config_hash: config.stable_hash()?,
        });
        Ok(Self {
            handle,
            join: Some(join),
        })
    }

    fn finish(self, reason: &str) {
        self.handle.send(ActivityEvent::SessionStopped {
            reason: reason.to_string(),
        });
        self.handle.shutdown();
        if let Some(join) = self.join {
            let _ = join.join();
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Ok(Config::load(cli.config.as_deref())?)
}

// ──────────────────── sos ────────────────────

#[cfg(feature = "tui")]
fn run_sos(cli: &Cli, args: &SosArgs) -> Result<(), CliError> {
    use calmkit::tui::{StartMode, TuiOptions};

    if !io::stdout().is_terminal() {
        return Err(CliError::User(
            "sos needs an interactive terminal; use `calmkit simulate` for scripted sessions"
                .to_string(),
        ));
    }
    let config = load_config(cli)?;
    let options = TuiOptions {
        timing: config.timing.clone(),
        frame: std::time::Duration::from_millis(config.tui.frame_ms),
        color: config.tui.color && !cli.no_color,
        start: match args.start {
            StartArg::Closed => StartMode::Closed,
            StartArg::Open => StartMode::Open,
            StartArg::BodyScan => StartMode::BodyScan,
        },
    };
    let log = ActivityLog::start(&config)?;
    let result = calmkit::tui::run(&options, &log.handle);
    log.finish(if result.is_ok() { "quit" } else { "error" });
    Ok(result?)
}

#[cfg(not(feature = "tui"))]
fn run_sos(_cli: &Cli, _args: &SosArgs) -> Result<(), CliError> {
    Err(CliError::User(
        "this build has no terminal front end (enable the `tui` feature)".to_string(),
    ))
}

// ──────────────────── simulate ────────────────────

fn run_simulate(cli: &Cli, args: &SimulateArgs) -> Result<(), CliError> {
    let source = match &args.script {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).map_err(|e| CalmError::io(path, e))?
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let steps = parse_script(&source)?;
    let config = load_config(cli)?;
    let log = ActivityLog::start(&config)?;

    let mut ctl = SosController::new(sos_overlay_page(), VirtualClock::new(), config.timing)
        .with_logger(log.handle.clone());
    let trace = run_script(&mut ctl, &steps);
    log.finish("simulation complete");

    let state = ctl.state();
    match output_mode(cli) {
        OutputMode::Human => {
            for record in &trace {
                println!(
                    "{:>8}ms  {:<22} {:<30} overlay={:<7} fired={}",
                    record.clock_ms,
                    record.step,
                    record.screen,
                    record.overlay,
                    record.fired
                );
            }
            println!(
                "{} {} step(s), final screen {}",
                "OK".green().bold(),
                trace.len(),
                state.screen.to_string().cyan()
            );
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "simulate",
                "steps": trace.len(),
                "final_screen": state.screen.id(),
                "overlay": state.overlay.phase.label(),
                "trace": trace,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── quiz ────────────────────

fn run_quiz(cli: &Cli, args: &QuizArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);

    if !args.answers.is_empty() {
        let outcome = quiz::evaluate(&args.answers)?;
        match mode {
            OutputMode::Human => {
                println!("{}", outcome.band.title.bold());
                println!("  {}", outcome.band.message);
                println!("  Puntaje: {}/{}", outcome.score, QUESTION_COUNT * 3);
                println!("  Contacto: {}", outcome.link);
            }
            OutputMode::Json => write_json_line(&json!({
                "command": "quiz",
                "outcome": outcome,
            }))?,
        }
        return Ok(());
    }

    let config = load_config(cli)?;
    let store = QuizProgressStore::new(config.paths.progress_file.clone());
    if args.reset {
        store.clear()?;
        match mode {
            OutputMode::Human => println!("Progreso del test borrado."),
            OutputMode::Json => write_json_line(&json!({
                "command": "quiz reset",
                "path": store.path().to_string_lossy(),
            }))?,
        }
        return Ok(());
    }

    let saved = store.load()?;
    match mode {
        OutputMode::Human => match saved {
            Some(index) if index > 0 => {
                println!("Pregunta guardada: {} de {QUESTION_COUNT}", index + 1);
            }
            _ => println!("Sin progreso guardado."),
        },
        OutputMode::Json => write_json_line(&json!({
            "command": "quiz status",
            "question_index": saved,
            "path": store.path().to_string_lossy(),
        }))?,
    }
    Ok(())
}

// ──────────────────── roi ────────────────────

fn run_roi(cli: &Cli, args: &RoiArgs) -> Result<(), CliError> {
    let inputs = RoiInputs::normalised(
        args.lost_hours,
        args.productivity,
        args.relationship,
        args.health,
        args.therapy,
    );
    let result = inputs.compute()?;
    match output_mode(cli) {
        OutputMode::Human => {
            println!("Costo de no atenderte:  {}", result.cost_label().red());
            println!("Beneficio de atenderte: {}", result.benefit_label().green());
            println!("Retorno de inversión:   {}", result.roi_label().bold());
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "roi",
            "inputs": inputs,
            "result": result,
        }))?,
    }
    Ok(())
}

// ──────────────────── check / load ────────────────────

fn run_check(cli: &Cli, args: &CheckArgs) -> Result<(), CliError> {
    let total = args.nervous + args.worry;
    let message = tools::anxiety_message(total);
    match output_mode(cli) {
        OutputMode::Human => println!("{} {message}", format!("[{total}/6]").cyan()),
        OutputMode::Json => write_json_line(&json!({
            "command": "check",
            "total": total,
            "message": message,
        }))?,
    }
    Ok(())
}

fn run_load(cli: &Cli, args: &LoadArgs) -> Result<(), CliError> {
    if args.list {
        match output_mode(cli) {
            OutputMode::Human => {
                for (i, item) in LOAD_ITEMS.iter().enumerate() {
                    println!("  {i}  {item}");
                }
            }
            OutputMode::Json => write_json_line(&json!({
                "command": "load list",
                "items": LOAD_ITEMS,
            }))?,
        }
        return Ok(());
    }

    if let Some(bad) = args.items.iter().find(|i| **i >= LOAD_ITEMS.len()) {
        return Err(CliError::User(format!(
            "item {bad} does not exist (0-{})",
            LOAD_ITEMS.len() - 1
        )));
    }
    let mut items = args.items.clone();
    items.sort_unstable();
    items.dedup();
    let level = tools::load_level(items.len());
    let percent = tools::load_percent(items.len(), LOAD_ITEMS.len());
    match output_mode(cli) {
        OutputMode::Human => println!(
            "Carga mental: {} ({percent}, {} de {})",
            level.label.bold(),
            items.len(),
            LOAD_ITEMS.len()
        ),
        OutputMode::Json => write_json_line(&json!({
            "command": "load",
            "checked": items,
            "level": level,
            "percent": percent,
        }))?,
    }
    Ok(())
}

// ──────────────────── jar / emotions ────────────────────

fn run_jar(cli: &Cli, args: &JarArgs) -> Result<(), CliError> {
    let mut jar = args.seed.map_or_else(Jar::default, Jar::seeded);
    let phrases: Vec<&str> = (0..args.count).map(|_| jar.draw()).collect();
    match output_mode(cli) {
        OutputMode::Human => {
            for phrase in &phrases {
                println!("✨ \"{phrase}\"");
            }
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "jar",
            "phrases": phrases,
        }))?,
    }
    Ok(())
}

fn run_emotions(cli: &Cli, args: &EmotionsArgs) -> Result<(), CliError> {
    let mode = output_mode(cli);
    let Some(name) = &args.name else {
        match mode {
            OutputMode::Human => {
                for emotion in &EMOTIONS {
                    println!("  {} {}", emotion.emoji, emotion.name);
                }
            }
            OutputMode::Json => write_json_line(&json!({
                "command": "emotions",
                "emotions": EMOTIONS,
            }))?,
        }
        return Ok(());
    };

    let emotion = emotions::find(name)
        .ok_or_else(|| CliError::User(format!("unknown emotion {name:?}")))?;
    match mode {
        OutputMode::Human => {
            println!("{} {}", emotion.emoji, emotion.name.bold());
            println!("  {}", emotion.description);
            println!("  {} {}", "Tip:".yellow(), emotion.tip);
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "emotions",
            "emotion": emotion,
        }))?,
    }
    Ok(())
}

// ──────────────────── site ────────────────────

fn run_site(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let log = ActivityLog::start(&config)?;
    let mut page = site_page();
    let mut site = Site::new(QuizProgressStore::new(config.paths.progress_file.clone()));
    let report = site.init(&mut page, Some(&log.handle));
    log.finish("site bootstrap");

    match output_mode(cli) {
        OutputMode::Human => {
            for record in &report.records {
                let status = match &record.outcome {
                    InitOutcome::Ready => "ready".green().to_string(),
                    InitOutcome::Skipped { reason } => format!("{} ({reason})", "skipped".yellow()),
                    InitOutcome::Failed { code, message } => {
                        format!("{} [{code}] {message}", "failed".red().bold())
                    }
                };
                println!("  {:<10} {status}", record.widget);
            }
            println!(
                "{} ready, {} skipped, {} failed",
                report.ready(),
                report.skipped(),
                report.failed()
            );
        }
        OutputMode::Json => write_json_line(&json!({
            "command": "site",
            "ready": report.ready(),
            "skipped": report.skipped(),
            "failed": report.failed(),
            "widgets": report.records,
        }))?,
    }
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;

            match output_mode(cli) {
                OutputMode::Human => println!("{}", config.to_toml()?),
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("{}", "Configuration is valid.".green());
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("{} {e}", "Configuration is INVALID:".red().bold());
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

// ──────────────────── output helpers ────────────────────

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("CALMKIT_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_before_and_after_subcommand() {
        let before = Cli::try_parse_from([
            "calmkit",
            "--config",
            "/tmp/calmkit.toml",
            "--json",
            "--no-color",
            "site",
        ]);
        assert!(before.is_ok());

        let after = Cli::try_parse_from(["calmkit", "site", "--json", "--no-color"]);
        assert!(after.is_ok());
    }

    #[test]
    fn parses_every_subcommand() {
        let cases = [
            vec!["calmkit", "sos", "--start", "body-scan"],
            vec!["calmkit", "simulate", "session.txt"],
            vec!["calmkit", "simulate"],
            vec!["calmkit", "quiz", "--answers", "1,2,3,0,1"],
            vec!["calmkit", "quiz", "--status"],
            vec!["calmkit", "roi", "--lost-hours", "5", "--therapy", "12000"],
            vec!["calmkit", "check", "2", "3"],
            vec!["calmkit", "load", "0", "3"],
            vec!["calmkit", "load", "--list"],
            vec!["calmkit", "jar", "--seed", "7", "--count", "3"],
            vec!["calmkit", "emotions", "calma"],
            vec!["calmkit", "config", "validate"],
        ];

        for case in cases {
            let parsed = Cli::try_parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse case: {case:?}");
        }
    }

    #[test]
    fn quiz_requires_a_mode() {
        assert!(Cli::try_parse_from(["calmkit", "quiz"]).is_err());
        assert!(Cli::try_parse_from(["calmkit", "quiz", "--reset"]).is_ok());
    }

    #[test]
    fn check_answers_are_bounded() {
        assert!(Cli::try_parse_from(["calmkit", "check", "4", "0"]).is_err());
        assert!(Cli::try_parse_from(["calmkit", "check", "3", "3"]).is_ok());
    }

    #[test]
    fn load_list_conflicts_with_items() {
        assert!(Cli::try_parse_from(["calmkit", "load", "--list", "1"]).is_err());
    }

    #[test]
    fn completions_support_bash_zsh_and_fish() {
        for shell in ["bash", "zsh", "fish"] {
            let parsed = Cli::try_parse_from(["calmkit", "completions", shell]);
            assert!(parsed.is_ok(), "failed shell parse for {shell}");
        }
    }

    #[test]
    fn output_mode_resolution_honors_precedence() {
        assert_eq!(
            resolve_output_mode(true, Some("human"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("json"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("human"), false),
            OutputMode::Human
        );
        assert_eq!(resolve_output_mode(false, None, false), OutputMode::Json);
        assert_eq!(resolve_output_mode(false, Some("auto"), true), OutputMode::Human);
    }

    #[test]
    fn calm_errors_map_to_exit_codes() {
        let user: CliError = CalmError::InvalidInput {
            field: "answers",
            details: "x".to_string(),
        }
        .into();
        assert_eq!(user.exit_code(), 1);
        let runtime: CliError = CalmError::Runtime {
            details: "x".to_string(),
        }
        .into();
        assert_eq!(runtime.exit_code(), 2);
    }
}
