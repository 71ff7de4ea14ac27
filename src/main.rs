// jackfront: tokenizer and parser driver for Jack source files

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use log::{LevelFilter, Log, Metadata, Record};

use jackfront::{Frontend, FrontendOptions};

#[derive(ClapParser, Debug)]
#[command(name = "jackfront", version, about = "Tokenize and parse a Jack source file")]
struct Cli {
    /// Jack source file to read
    file: PathBuf,

    /// Print the token stream instead of the parse tree
    #[arg(long)]
    tokens: bool,

    /// Emit JSON instead of the indented text form
    #[arg(long)]
    json: bool,

    /// Drop comments before parsing
    #[arg(long)]
    strip_comments: bool,

    /// Log pipeline progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&cli.file)
        .map_err(|e| format!("cannot read '{}': {}", cli.file.display(), e))?;

    let frontend = Frontend::new(FrontendOptions {
        keep_comments: !cli.strip_comments,
    });

    if cli.tokens {
        let tokens = frontend.tokenize_text(&source)?;
        if cli.json {
            return Ok(serde_json::to_string_pretty(&tokens)?);
        }
        let listing = tokens
            .iter()
            .map(|t| format!("{:>4}  {}", t.line, t))
            .collect::<Vec<_>>()
            .join("\n");
        return Ok(listing);
    }

    let class = frontend.parse_text(&source)?;
    if cli.json {
        Ok(serde_json::to_string_pretty(&class)?)
    } else {
        Ok(class.to_string())
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
