use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use gti::{
    app::{Action, App, Plan},
    app_dirs::AppDirs,
    challenge::{ChallengeProgression, ProgressStore},
    config::{Config, ConfigStore, FileConfigStore},
    history::HistoryLog,
    quotes::{BuiltinQuotes, CustomText, QuoteSource},
    report::Summary,
    runtime::{terminal_events, RefreshLoop},
    ui::View,
    word_generator::{is_language_supported, supported_languages, WordGenerator},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// typing practice in the terminal, with history, streaks and challenge levels
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {
    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// type one or more quotes (the default)
    Quote {
        /// number of quotes to join into one text
        #[clap(short = 'n', long, default_value_t = 2)]
        count: usize,

        /// custom text to type instead of a quote
        #[clap(short = 'p', long)]
        prompt: Option<String>,
    },
    /// type a run of random words
    Words {
        /// number of words in the test
        #[clap(short = 'w', long, default_value_t = 25)]
        count: usize,

        /// word list to draw from
        #[clap(short = 'l', long)]
        language: Option<String>,
    },
    /// type for a fixed number of seconds
    Timed {
        /// session length in seconds
        #[clap(short = 's', long)]
        seconds: Option<u64>,

        /// word list to draw from
        #[clap(short = 'l', long)]
        language: Option<String>,
    },
    /// climb through levels with speed and accuracy targets
    Challenge,
    /// summarize recorded sessions
    Stats,
    /// show or reset the config file
    Config {
        /// print the active config
        #[clap(long)]
        show: bool,

        /// overwrite the config file with the defaults
        #[clap(long)]
        reset: bool,
    },
}

fn init_logging() {
    let dir = AppDirs::state_dir();
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("gti.log"))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env("GTI_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn language_or_default(language: Option<String>, config: &Config) -> String {
    let language = language.unwrap_or_else(|| config.language.default.clone());
    if !is_language_supported(&language) {
        eprintln!(
            "gti: unsupported language {:?}, using the default word list",
            language
        );
        warn!(
            "unsupported language {:?}, expected one of {:?}",
            language,
            supported_languages().collect::<Vec<_>>()
        );
    }
    language
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = store.load_or_init();
    let history = HistoryLog::from_config(&config.history);

    let plan = match cli.command.unwrap_or(Command::Quote {
        count: 2,
        prompt: None,
    }) {
        Command::Quote { count, prompt } => {
            let source: Box<dyn QuoteSource> = match prompt {
                Some(text) => Box::new(CustomText(text)),
                None => Box::new(BuiltinQuotes),
            };
            Plan::Quote { source, count }
        }
        Command::Words { count, language } => Plan::Words {
            generator: WordGenerator::new(&language_or_default(language, &config)),
            count,
        },
        Command::Timed { seconds, language } => Plan::Timed {
            generator: WordGenerator::new(&language_or_default(language, &config)),
            limit: seconds
                .map(|s| Duration::from_secs(s.max(1)))
                .unwrap_or_else(|| config.timed_limit()),
        },
        Command::Challenge => {
            let recovered = ChallengeProgression::load(ProgressStore::in_dir(store.config_dir()));
            if let Some(e) = &recovered.diagnostic {
                warn!("challenge progress unreadable, starting from level 1: {}", e);
            }
            Plan::Challenge {
                progression: recovered.value,
                generator: WordGenerator::new(&config.language.default),
            }
        }
        Command::Stats => return print_stats(&history, &store),
        Command::Config { show, reset } => {
            if !show && !reset {
                let mut cmd = Cli::command();
                if let Some(sub) = cmd.find_subcommand_mut("config") {
                    sub.print_help()?;
                }
                return Ok(());
            }
            if reset {
                store.save(&Config::default())?;
                println!("Reset config at {}", store.path().display());
            }
            if show {
                let current = if reset { Config::default() } else { config };
                println!("# {}", store.path().display());
                println!("{}", serde_json::to_string_pretty(&current)?);
            }
            return Ok(());
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let refresh = config.tick_interval();
    let mut app = App::new(config, history, plan);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, refresh);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn print_stats(history: &HistoryLog, store: &FileConfigStore) -> Result<(), Box<dyn Error>> {
    if !history.is_enabled() {
        println!("History tracking is disabled.");
        return Ok(());
    }
    let records = history.load()?;
    print!("{}", Summary::from_records(&records));

    let progression = ChallengeProgression::load(ProgressStore::in_dir(store.config_dir()));
    if let Some(e) = &progression.diagnostic {
        warn!("challenge progress unreadable: {}", e);
    }
    println!(
        "Challenge level: {}",
        progression.value.highest_level_completed()
    );
    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    refresh: Duration,
) -> Result<(), Box<dyn Error>> {
    let events = RefreshLoop::new(terminal_events(), refresh);
    info!("session started in {} mode", app.session.mode);

    loop {
        terminal.draw(|f| f.render_widget(View::new(app, Instant::now()), f.area()))?;

        if app.handle(events.next_event()) == Action::Quit {
            return Ok(());
        }
    }
}
