use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use spellbench::cli::output::{OutputFormat, Style};
use spellbench::cli::{console, Dispatcher, Flow};
use spellbench::config::Overrides;
use spellbench::engine::parse_accuracy;
use spellbench::{Config, Loader, ParallelBench, WordListLoader};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "spellbench")]
#[command(version, about = "Interactive spelling correction and self-correction benchmark", long_about = None)]
struct Cli {
    /// Correct a single word, print the candidates and exit
    #[arg(short, long)]
    word: Option<String>,

    /// Dictionary word list (one word per line) [default: knownWords.txt]
    #[arg(short, long, value_name = "PATH")]
    dict: Option<PathBuf>,

    /// Parallel benchmark concurrency [default: logical CPU count]
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Initial accuracy: keep candidates scoring at least this share of the
    /// best (0.9, 90 or 90%)
    #[arg(short, long, value_name = "ACCURACY", value_parser = accuracy_arg)]
    accuracy: Option<f64>,

    /// Show the length-difference column for candidates
    #[arg(long)]
    len_diff: bool,

    /// Output format for --word (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellbench", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose, cli.quiet);

    let config = Config::load(Overrides {
        dictionary: cli.dict.clone(),
        concurrency: cli.concurrency,
        accuracy: cli.accuracy,
        len_diff: cli.len_diff,
        no_color: cli.no_color,
    })?;

    if !config.color {
        colored::control::set_override(false);
    }

    let loader = WordListLoader::new(&config.dictionary).with_accuracy(config.accuracy);
    let engine = loader
        .load(true)
        .with_context(|| format!("Failed to load dictionary {}", config.dictionary.display()))?;

    let style = Style {
        colored: config.color,
        len_diff: config.len_diff,
        progress: io::stderr().is_terminal(),
    };
    let bench = ParallelBench::new(loader, config.concurrency())?;
    let mut dispatcher = Dispatcher::new(engine, bench, style, io::stdout());

    if let Some(word) = &cli.word {
        dispatcher.correct_once(word, cli.format)?;
        return Ok(());
    }

    let stdin = io::stdin();
    if console::run(&mut dispatcher, stdin.lock(), config.command_prefix)? == Flow::Quit {
        std::process::exit(0);
    }

    Ok(())
}

fn accuracy_arg(arg: &str) -> Result<f64, String> {
    parse_accuracy(arg).map_err(|err| err.to_string())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
