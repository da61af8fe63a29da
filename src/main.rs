use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use uscheme::environment::Env;
use uscheme::interpreter;
use uscheme::parser::Parser;
use uscheme::primitives;
use uscheme::scanner::Scanner;
use uscheme::value::Value;

#[derive(ClapParser, Debug)]
#[command(version, about = "uScheme language evaluator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file as a single expression and prints its tree
    Parse { filename: Option<PathBuf> },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: Option<PathBuf> },

    /// Evaluates every top-level expression in a file against one global environment
    Run { filename: Option<PathBuf> },

    /// Interactive read-eval-print loop
    Repl,
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: PathBuf) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Configure env_logger to write to file with module path and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'uscheme::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("uscheme::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Interactive loop: reads a form (continuing across lines until parentheses
/// balance), evaluates it against the global environment, prints the result,
/// and reports errors without aborting the session.
fn repl(global_env: &Env) -> Result<()> {
    let prompt = ">>> ";
    let second_prompt = "> ";

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let mut source = line?;

        // Keep reading while more '(' than ')' have been seen.
        while paren_balance(&source) > 0 {
            write!(stdout, "{}", second_prompt)?;
            stdout.flush()?;

            let Some(next_line) = lines.next() else {
                return Ok(());
            };
            source.push('\n');
            source.push_str(&next_line?);
        }

        if source.trim().is_empty() {
            continue;
        }

        let scanner = Scanner::new(source.as_bytes());
        let parser = Parser::new(scanner);

        for exp in parser {
            let exp = match exp {
                Ok(exp) => exp,
                Err(e) => {
                    eprintln!("{}", e);
                    break;
                }
            };

            match interpreter::evaluate(&exp, global_env) {
                Ok(Value::Unit) => {}
                Ok(value) => println!("{}", value),
                Err(e) => {
                    eprintln!("{}", e);
                    break;
                }
            }
        }
    }
}

/// Net parenthesis depth of `source`; positive means unclosed lists remain.
fn paren_balance(source: &str) -> i64 {
    let mut depth: i64 = 0;
    let mut in_comment = false;

    for c in source.chars() {
        match c {
            '\n' => in_comment = false,
            ';' => in_comment = true,
            '(' if !in_comment => depth += 1,
            ')' if !in_comment => depth -= 1,
            _ => {}
        }
    }

    depth
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => match filename {
            Some(filename) => {
                info!("Running Tokenize subcommand");
                let buf = read_file(filename)?;
                let mut scanner = Scanner::new(&buf);
                let mut tokenized = true;

                while let Some(token) = scanner.next() {
                    match token {
                        Ok(token) => {
                            debug!("Scanned token: {}", token);

                            println!("{}", token);
                        }

                        Err(e) => {
                            tokenized = false;

                            debug!("Tokenization debug: {}", e);

                            eprintln!("{}", e);
                        }
                    }
                }

                if !tokenized {
                    debug!("Tokenization failed, exiting with code 65");

                    std::process::exit(65);
                }

                info!("Tokenization completed successfully");
            }
            None => {
                info!("No filepath provided for Tokenize");

                println!("No input filepath was provided. Exiting...");

                std::process::exit(0);
            }
        },

        Commands::Parse { filename } => match filename {
            Some(filename) => {
                info!("Running Parse subcommand");
                let buf = read_file(filename)?;
                let scanner = Scanner::new(&buf);
                let mut parser = Parser::new(scanner);

                match parser.parse() {
                    Ok(exp) => {
                        info!("Expression parsed successfully");

                        debug!("Tree: {}", exp);
                        println!("{}", exp);
                    }

                    Err(e) => {
                        debug!("Parse debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                }

                info!("Parse subcommand completed");
            }
            None => {
                info!("No filepath provided for Parse");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },

        Commands::Evaluate { filename } => match filename {
            Some(filename) => {
                info!("Running Evaluate subcommand");

                let buf = read_file(filename)?;
                let scanner = Scanner::new(&buf);
                let mut parser = Parser::new(scanner);
                let global_env = primitives::global_env();

                match parser.parse() {
                    Ok(exp) => {
                        info!("Expression parsed successfully");

                        match interpreter::evaluate(&exp, &global_env) {
                            Ok(value) => {
                                debug!("Evaluated to: {}", value);
                                println!("{}", value);
                            }

                            Err(e) => {
                                debug!("Evaluation debug: {}", e);
                                eprintln!("{}", e);
                                std::process::exit(70);
                            }
                        }
                    }

                    Err(e) => {
                        debug!("Parse debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                }

                info!("Evaluate subcommand completed");
            }

            None => {
                info!("No filepath provided for Evaluate");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },

        Commands::Run { filename } => match filename {
            Some(filename) => {
                info!("Running Run subcommand");
                let buf = read_file(filename)?;

                let scanner = Scanner::new(&buf);
                let parser = Parser::new(scanner);
                let global_env = primitives::global_env();

                let mut expressions = Vec::new();

                for exp in parser {
                    match exp {
                        Ok(exp) => {
                            debug!("Parsed expression: {}", exp);
                            expressions.push(exp);
                        }
                        Err(e) => {
                            debug!("Parse debug: {}", e);
                            eprintln!("{}", e);
                            std::process::exit(65);
                        }
                    }
                }

                info!("Parsed {} top-level expressions", expressions.len());

                for exp in &expressions {
                    match interpreter::evaluate(exp, &global_env) {
                        Ok(Value::Unit) => {}

                        Ok(value) => {
                            println!("{}", value);
                        }

                        Err(e) => {
                            debug!("Runtime debug: {}", e);
                            eprintln!("{}", e);
                            std::process::exit(70);
                        }
                    }
                }

                info!("Program executed successfully");
            }

            None => {
                info!("No filepath provided for Run");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },

        Commands::Repl => {
            info!("Starting REPL");
            let global_env = primitives::global_env();
            repl(&global_env)?;
        }
    }

    Ok(())
}
