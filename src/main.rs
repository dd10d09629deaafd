use std::{
    env,
    fs::read_to_string,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{ArgAction, Parser as ClapParser};
use nibbl::{lexer::lexer::tokenize, parse, render_error};
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = "nibbl";
const PROMPT: &str = ">> ";

/// Parse nibbl source and print the resulting syntax tree.
#[derive(ClapParser, Debug)]
#[command(name = PROGRAM, version, about)]
struct Cli {
    /// Source file to parse. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the token stream instead of the syntax tree
    #[arg(long)]
    tokens: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.file {
        Some(path) => run_file(path, cli.tokens),
        None => {
            run_repl(cli.tokens)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "nibbl=warn",
        1 => "nibbl=debug",
        _ => "nibbl=trace",
    }
}

fn run_file(path: &Path, show_tokens: bool) -> anyhow::Result<ExitCode> {
    let source = read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if show_tokens {
        for token in tokenize(source, Some(file_name)) {
            println!("{}", token);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let (program, errors) = parse(&source, Some(file_name.clone()));

    if errors.is_empty() {
        println!("{}", program);
        return Ok(ExitCode::SUCCESS);
    }

    for error in &errors {
        eprint!("{}", render_error(error, &source, &file_name));
    }
    Ok(ExitCode::FAILURE)
}

fn run_repl(show_tokens: bool) -> anyhow::Result<()> {
    let user = env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| String::from("there"));

    println!("Hello, {}", user);
    println!(
        "Welcome to {} v{} on {}",
        PROGRAM,
        env!("CARGO_PKG_VERSION"),
        env::consts::OS
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", PROMPT);
        stdout.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?
            == 0
        {
            println!();
            return Ok(());
        }

        if show_tokens {
            for token in tokenize(line, None) {
                println!("{}", token);
            }
            continue;
        }

        let (program, errors) = parse(&line, None);
        if errors.is_empty() {
            println!("{}", program);
        } else {
            println!("parser errors:");
            for error in &errors {
                println!("\t{}", error);
            }
        }
    }
}
