// bftty: resumable Brainfuck VM with a terminal IDE

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bftty::interpreter::engine::Status;
use bftty::plain;
use bftty::ui::App;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "BFTTY_LOG";

#[derive(Parser)]
#[command(name = "bftty")]
#[command(version)]
#[command(about = "Run Brainfuck programs on a resumable VM", long_about = None)]
struct Cli {
    /// Brainfuck source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Run without the TUI: input from stdin, output to stdout
    #[arg(long)]
    plain: bool,

    /// Text to queue as input before the program starts
    #[arg(short, long, value_name = "TEXT")]
    input: Option<String>,

    /// Write logs to FILE (filter with BFTTY_LOG, e.g. BFTTY_LOG=debug)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn init_logging(log: Option<&Path>, plain: bool) -> io::Result<()> {
    let filter = || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    match log {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        // The TUI owns the screen, so without a log file it stays silent.
        None if plain => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn run_tui(source: String, initial_input: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(source, initial_input);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.log.as_deref(), cli.plain)?;

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.file.display(), e);
            std::process::exit(1);
        }
    };
    info!("loaded {} ({} bytes)", cli.file.display(), source.len());

    let initial_input = cli.input.unwrap_or_default().into_bytes();

    if !cli.plain {
        return run_tui(source, &initial_input);
    }

    let result = plain::run_streams(
        &source,
        &initial_input,
        io::stdin().lock(),
        io::stdout().lock(),
    );
    match &result {
        Ok(Status::Halted) => {}
        Ok(Status::AwaitingInput) => {
            eprintln!();
            eprintln!("Program stopped: input ended while it was waiting for a byte");
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", e);
        }
    }
    std::process::exit(plain::exit_code(&result));
}
