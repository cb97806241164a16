use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pwkeeper::commands::{self, DeleteTarget};
use pwkeeper::fprintd::FprintdAuthenticator;
use pwkeeper::terminal::TerminalPrompter;
use pwkeeper::AppConfig;
use pwkeeper_core::auth::{
    BiometricAuthenticator, Gate, GateOutcome, NoBiometrics, DEFAULT_MAX_PIN_ATTEMPTS,
};
use pwkeeper_core::Database;

#[derive(Parser)]
#[command(name = "pwk")]
#[command(about = "PIN-protected local password keeper")]
#[command(version)]
struct Cli {
    /// Directory holding passwords.db and auth_prefs.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Wrong PIN entries allowed before a lockout (at most the default)
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_PIN_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(DEFAULT_MAX_PIN_ATTEMPTS))
    )]
    max_pin_attempts: u32,

    /// Always use the PIN, even if biometric login is enabled
    #[arg(long, global = true)]
    no_biometric: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all entries ordered by title
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show entries whose title contains QUERY
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Add an entry (the password is always prompted)
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Delete an entry by id, or every entry with a title
    Delete {
        #[arg(required_unless_present = "title")]
        id: Option<i64>,
        #[arg(long, conflicts_with = "id")]
        title: Option<String>,
        /// Skip the confirmation dialog
        #[arg(short, long)]
        yes: bool,
    },
    /// Replace the PIN
    ChangePin,
    /// Turn fingerprint login on or off
    Biometric {
        #[arg(value_enum)]
        mode: BiometricMode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BiometricMode {
    Enable,
    Disable,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pwkeeper=warn,pwkeeper_core=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir, cli.max_pin_attempts, cli.no_biometric)?;

    let db = Database::open(&config.database_path()).with_context(|| {
        format!(
            "Failed to open credential store at {}",
            config.database_path().display()
        )
    })?;
    db.migrate().context("Failed to initialize credential store")?;

    let prefs = config.prefs_store();
    let mut gate = Gate::new(prefs.clone(), config.gate)
        .with_context(|| format!("Failed to read {}", prefs.path().display()))?;

    let mut prompter = TerminalPrompter::stdio();
    let mut biometrics: Box<dyn BiometricAuthenticator> = if cli.no_biometric {
        Box::new(NoBiometrics)
    } else {
        Box::new(FprintdAuthenticator::for_current_user())
    };

    match gate.run(&mut prompter, biometrics.as_mut())? {
        GateOutcome::Authenticated => {}
        GateOutcome::Cancelled => bail!("Authentication cancelled"),
        GateOutcome::LockedOut => bail!("Too many failed PIN attempts, try again later"),
    }

    let mut stdout = std::io::stdout().lock();

    match cli.command.unwrap_or(Commands::List { json: false }) {
        Commands::List { json } => commands::list(&db, &mut stdout, json)?,
        Commands::Search { query, json } => commands::search(&db, &query, &mut stdout, json)?,
        Commands::Add { title, email } => {
            commands::add(&db, &mut prompter, title, email)?;
        }
        Commands::Delete { id, title, yes } => {
            let target = match (id, title) {
                (Some(id), _) => DeleteTarget::Id(id),
                (None, Some(title)) => DeleteTarget::Title(title),
                (None, None) => bail!("Give an entry id or --title"),
            };
            commands::delete(&db, &mut prompter, target, yes)?;
        }
        Commands::ChangePin => {
            if gate.change_pin(&mut prompter)? {
                writeln!(stdout, "PIN changed")?;
            }
        }
        Commands::Biometric { mode } => {
            let enabled = matches!(mode, BiometricMode::Enable);
            gate.set_biometric(enabled, biometrics.as_ref())?;
            writeln!(
                stdout,
                "Biometric login {}",
                if enabled { "enabled" } else { "disabled" }
            )?;
        }
    }

    Ok(())
}
