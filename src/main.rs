use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pickwheel::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    history::HistoryDb,
    logging::{self, LogLevel},
    notifier::{TerminalNotifier, TickSound},
    runtime::{InputSource, Runner, TerminalInput, WheelEvent},
    ui::screen::current_screen,
    util::parse_names,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};

/// spin a wheel of names in the terminal and draw them one by one
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal name picker: enter names, spin the wheel, and each winner is drawn off it until everyone has had a turn."
)]
pub struct Cli {
    /// names to put on the wheel (comma separated values are split)
    names: Vec<String>,

    /// read names from a file, one per line
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// how long a spin lasts, in milliseconds
    #[clap(short = 'd', long)]
    duration_ms: Option<u64>,

    /// full turns the wheel makes before settling
    #[clap(short = 'r', long)]
    rotations: Option<u32>,

    /// how each stripe crossing the pointer is signalled
    #[clap(short = 's', long, value_enum)]
    sound: Option<TickSound>,

    /// print recent winners and exit
    #[clap(long)]
    history: bool,

    /// write every recorded winner to a CSV file and exit
    #[clap(long, value_name = "PATH")]
    export_history: Option<PathBuf>,

    /// delete every recorded winner and exit
    #[clap(long)]
    clear_history: bool,

    /// log verbosity
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// log file location (defaults to the state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Applies command line overrides on top of the stored configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(ms) = self.duration_ms {
            config.spin_duration_ms = ms;
        }
        if let Some(rotations) = self.rotations {
            config.rotations = rotations;
        }
        if let Some(sound) = self.sound {
            config.tick_sound = sound;
        }
    }

    /// Names from the positional arguments, else the file, else `None`.
    fn names(&self) -> io::Result<Option<Vec<String>>> {
        if !self.names.is_empty() {
            return Ok(Some(self.names.iter().flat_map(|n| parse_names(n)).collect()));
        }
        match &self.file {
            Some(path) => Ok(Some(parse_names(&std::fs::read_to_string(path)?))),
            None => Ok(None),
        }
    }

    fn is_history_command(&self) -> bool {
        self.history || self.export_history.is_some() || self.clear_history
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .or_else(AppDirs::log_path)
        .unwrap_or_else(|| PathBuf::from("pickwheel.log"));
    if let Err(e) = logging::init(&log_path, cli.log_level) {
        eprintln!("logging disabled: {e}");
    }

    if cli.is_history_command() {
        return run_history_command(&cli);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);
    let from_cli = cli.names()?;
    let start_on_wheel = from_cli.as_ref().is_some_and(|n| !n.is_empty());
    let names = from_cli.unwrap_or_else(|| config.names.clone());

    let history = match HistoryDb::open_default() {
        Ok(db) => Some(db),
        Err(e) => {
            warn!(error = %e, "history disabled");
            None
        }
    };

    let notifier = TerminalNotifier::new(config.tick_sound);
    let mut runner = Runner::new(TerminalInput::spawn(), config.frame_interval());
    let mut app = App::new(config, names, notifier, history);
    if start_on_wheel {
        app.build_wheel()?;
    }
    info!(names = app.names.len(), "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    if let Ok(size) = terminal.size() {
        app.viewport = (size.width, size.height);
    }

    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let mut config = app.config.clone();
    config.names = app.names.clone();
    if let Err(e) = store.save(&config) {
        warn!(error = %e, path = %store.path().display(), "failed to save config");
    }

    result
}

fn run_history_command(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let db = HistoryDb::open_default()?;

    if let Some(path) = &cli.export_history {
        let rows = db.export_csv(path)?;
        println!("exported {rows} winners to {}", path.display());
    }
    if cli.history {
        for entry in db.recent(50)? {
            println!(
                "{}  {}  ({} left)",
                entry.spun_at.format("%Y-%m-%d %H:%M"),
                entry.label,
                entry.remaining
            );
        }
    }
    if cli.clear_history {
        let count = db.count()?;
        db.clear()?;
        println!("cleared {count} winners");
    }
    Ok(())
}

fn start_tui<B: Backend, I: InputSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<I>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            WheelEvent::Frame => {
                let was_animating = app.is_animating();
                app.on_frame(Instant::now());
                // One more draw after an animation ends clears its last frame.
                if was_animating || app.is_animating() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            WheelEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            WheelEvent::Closed => {
                warn!("terminal input closed, exiting");
                break;
            }
            WheelEvent::Key(key) => {
                if app.handle_key(key, Instant::now()) == AppAction::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    let screen = current_screen(&app.state);
    screen.render(app, f);
}
