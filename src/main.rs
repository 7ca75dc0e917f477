use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use substep::config::{AppConfig, LOG_ENV};
use substep::flows::onboarding::{OnboardingFlow, OpenOutcome, PurposeModal};
use substep::flows::personal_info::{JsonSubmitter, Submitter};
use substep::flows::welcome::{Policy, PersonalDetailsList, Report, compose_welcome};
use substep::navigation::OnboardingScreen;
use substep::runtime::{ExitReason, FormState, Runtime};
use substep::store::{DraftStore, JsonFileStore, MemoryStore};
use substep::terminal::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

type AppResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "substep", version, about = "Multi-step terminal forms")]
struct Cli {
    /// YAML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append logs here. Without it nothing is logged.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect the bank account owner's personal information.
    PersonalInfo {
        /// JSON draft to resume from and save into.
        #[arg(long)]
        draft: Option<PathBuf>,
        #[arg(long)]
        bank_account_id: Option<u64>,
        /// Where the submission JSON goes. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Walk the onboarding screens.
    Onboarding {
        /// Treat guided setup as already done.
        #[arg(long)]
        completed: bool,
    },
    /// Print the welcome text for a report described in YAML or JSON.
    Welcome {
        #[arg(long)]
        report: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(path) = &cli.log_file {
        init_logging(path, &config)?;
    }

    match cli.command {
        Command::PersonalInfo {
            draft,
            bank_account_id,
            output,
        } => run_personal_info(
            &config,
            draft.or_else(|| config.draft_path.clone()),
            bank_account_id.unwrap_or(config.bank_account_id),
            output.or_else(|| config.output_path.clone()),
        ),
        Command::Onboarding { completed } => run_onboarding(completed),
        Command::Welcome { report } => run_welcome(&report),
    }
}

fn init_logging(path: &Path, config: &AppConfig) -> AppResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_new(config.log_filter(std::env::var(LOG_ENV).ok()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Holds the submission until the alternate screen is gone.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_personal_info(
    config: &AppConfig,
    draft: Option<PathBuf>,
    bank_account_id: u64,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let store: Box<dyn DraftStore> = match draft {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };
    let captured = Captured::default();
    let submitter: Box<dyn Submitter> = match &output {
        Some(path) => Box::new(JsonSubmitter::new(File::create(path)?)),
        None => Box::new(JsonSubmitter::new(captured.clone())),
    };

    let today = Local::now().date_naive();
    let state = FormState::new(
        store,
        submitter,
        bank_account_id,
        today,
        config.session_options(),
    )?;
    let reason = Runtime::new(state, Terminal::new()?).run()?;
    info!(?reason, "personal info flow ended");

    match reason {
        ExitReason::Submitted => {
            if let Some(path) = output {
                println!("Submission written to {}", path.display());
            } else {
                let bytes = captured
                    .0
                    .lock()
                    .map_err(|_| "capture buffer poisoned")?
                    .clone();
                io::stdout().write_all(&bytes)?;
            }
        }
        ExitReason::Left(nav) => println!("Left the form ({nav:?})."),
        ExitReason::Quit => println!("Cancelled. Your answers are kept in the draft."),
    }
    Ok(())
}

fn run_onboarding(completed: bool) -> AppResult<()> {
    let (tx, done) = std::sync::mpsc::channel();
    let mut flow = match OnboardingFlow::open(Some(completed), move || {
        let _ = tx.send(());
    })? {
        OpenOutcome::Opened(flow) => flow,
        OpenOutcome::Redirect(commands) => {
            for command in commands {
                println!("-> {command:?}");
            }
            return Ok(());
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut modal = PurposeModal::new(false);

    loop {
        match flow.screen() {
            OnboardingScreen::Purpose => {
                println!("{}\n{}", PurposeModal::TITLE, PurposeModal::SUBTITLE);
                for (index, item) in modal.menu_items().iter().enumerate() {
                    println!("  {}. {}", index + 1, item.title);
                }
                print!("Choose 1-4 (b to go back): ");
            }
            screen => print!("[{}] Enter to continue, b to go back: ", screen.name()),
        }
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        let answer = line.trim();

        if answer.eq_ignore_ascii_case("b") {
            if let Some(command) = flow.back() {
                println!("-> {command:?}");
                return Ok(());
            }
            if flow.screen() == OnboardingScreen::Purpose {
                modal.reopen();
            }
            continue;
        }

        match flow.screen() {
            OnboardingScreen::Purpose => {
                let Some(purpose) = answer
                    .parse::<usize>()
                    .ok()
                    .and_then(|choice| choice.checked_sub(1))
                    .and_then(|index| modal.select(index))
                else {
                    println!("Pick one of the listed options.");
                    continue;
                };
                flow.choose_purpose(purpose);
            }
            _ => {
                flow.next();
            }
        }

        if done.try_recv().is_ok() {
            modal.close();
            let purpose = flow.purpose().map(|purpose| purpose.title()).unwrap_or("-");
            println!("Onboarding complete. Purpose: {purpose}");
            return Ok(());
        }
    }
}

#[derive(Debug, Deserialize)]
struct WelcomeInput {
    report: Report,
    #[serde(default)]
    policy: Policy,
    #[serde(default)]
    personal_details: PersonalDetailsList,
}

fn run_welcome(path: &Path) -> AppResult<()> {
    let raw = std::fs::read_to_string(path)?;
    let input: WelcomeInput = serde_yaml::from_str(&raw)?;
    let message = compose_welcome(&input.report, &input.policy, &input.personal_details);
    println!("{}\n\n{}", message.hero, message.body_text());
    Ok(())
}
