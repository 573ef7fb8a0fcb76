//! Serrate compiler CLI

use clap::{ArgAction, Parser, Subcommand};
use serrate_codegen::{write_output, CBackend, CodeGen, CompileOptions};
use serrate_error::{DiagnosticKind, DiagnosticRenderer, Diagnostics, Error, SourceCache};
use serrate_lexer::{Lexer, TokenKind};
use serrate_parser::{dump, parse, Node};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "serrate")]
#[command(author = "Ivy Mycelia")]
#[command(version)]
#[command(about = "Serrate language compiler", long_about = None)]
struct Cli {
    /// More log output on stderr; repeat for debug and trace
    #[arg(long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print diagnostics without ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compiles a .sr file to C
    Build {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: output.c)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Checks for errors without compiling
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Shows file tokens (debug)
    Lex {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Shows file AST (debug)
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Errors that end a CLI run
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Compile(#[from] Error),

    #[error("could not serialize the syntax tree: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for file system failures, 1 for everything else
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Compile(Error::ReadSource { .. } | Error::WriteOutput { .. }) => 2,
            _ => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let color = !cli.no_color;

    match cli.command {
        Commands::Build { input, output } => {
            let defaults = CompileOptions::default();
            let options = CompileOptions {
                output: output.unwrap_or(defaults.output),
                color,
            };
            build(&input, &options)?;
        }

        Commands::Check { input } => {
            println!("Checking: {}", input.display());

            let (cache, file_id) = load(&input)?;
            let program = parse_checked(&cache, file_id, color)?;
            println!("  [ok] Parser: {} statements", statement_count(&program));

            println!("\nNo errors found!");
        }

        Commands::Lex { input } => {
            println!("Tokenizing: {}\n", input.display());

            let (cache, file_id) = load(&input)?;
            let source = source_bytes(&cache, file_id);
            let tokens = Lexer::new(source, file_id).tokenize();

            for token in &tokens {
                let lexeme = match token.kind {
                    TokenKind::Eof => Cow::Borrowed("EOF"),
                    _ => token.text(),
                };

                println!(
                    "  {:4}:{:<3}  {:<12}  {}",
                    token.line(),
                    token.column(),
                    format!("{:?}", token.kind),
                    lexeme
                );
            }

            println!("\nTotal: {} tokens", tokens.len());

            let unknown = tokens.iter().filter(|t| t.kind == TokenKind::Unknown).count();
            if unknown > 0 {
                println!("Unknown bytes: {}", unknown);
            }
        }

        Commands::Parse { input, json } => {
            let (cache, file_id) = load(&input)?;
            let (program, diagnostics) = parse(source_bytes(&cache, file_id), file_id);

            if json {
                println!("{}", serde_json::to_string_pretty(&program)?);
            } else {
                println!("Syntax tree: {}\n", input.display());
                print!("{}", dump(&program));
            }

            if diagnostics.has_errors() {
                report(&cache, &diagnostics, color);
                return Err(Error::Aborted(diagnostics.len()).into());
            }
        }
    }

    Ok(())
}

fn build(input: &Path, options: &CompileOptions) -> Result<(), CliError> {
    println!("Compiling: {}", input.display());

    let (cache, file_id) = load(input)?;
    let program = parse_checked(&cache, file_id, options.color)?;
    println!("  [ok] Parser: {} statements", statement_count(&program));

    let code = CBackend::new().generate(&program);
    write_output(&options.output, &code)?;
    println!("  [ok] Output: {}", options.output.display());

    println!("\nTo compile:");
    println!("  cc -o program {}", options.output.display());

    Ok(())
}

/// Reads `input` as raw bytes into a fresh source cache
fn load(input: &Path) -> serrate_error::Result<(SourceCache, u32)> {
    let bytes = fs::read(input).map_err(|source| Error::ReadSource {
        path: input.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %input.display(), bytes = bytes.len(), "read source");

    let mut cache = SourceCache::new();
    let file_id = cache.add(input.display().to_string(), bytes);
    Ok((cache, file_id))
}

fn source_bytes(cache: &SourceCache, file_id: u32) -> &[u8] {
    cache
        .get(file_id)
        .map(|file| file.source.as_slice())
        .unwrap_or_default()
}

/// Parses a loaded file, reporting diagnostics and aborting if there are any
fn parse_checked(cache: &SourceCache, file_id: u32, color: bool) -> serrate_error::Result<Node> {
    let (program, diagnostics) = parse(source_bytes(cache, file_id), file_id);

    if diagnostics.has_errors() {
        report(cache, &diagnostics, color);
        return Err(Error::Aborted(diagnostics.len()));
    }

    Ok(program)
}

fn report(cache: &SourceCache, diagnostics: &Diagnostics, color: bool) {
    let renderer = DiagnosticRenderer::new(cache).with_colors(color);

    let lex = diagnostics.count(DiagnosticKind::Lex);
    let syntax = diagnostics.len() - lex;

    if lex > 0 {
        eprintln!("\nLexer errors: {}", lex);
    }
    if syntax > 0 {
        eprintln!("\nSyntax errors: {}", syntax);
    }
    eprintln!();

    for diagnostic in diagnostics {
        eprintln!("{}", renderer.render(diagnostic));
    }
}

fn statement_count(program: &Node) -> usize {
    program.body().map_or(0, <[Node]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "serrate",
            "parse",
            "main.sr",
            "--json",
            "--verbose",
            "--verbose",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        match cli.command {
            Commands::Parse { input, json } => {
                assert_eq!(input, PathBuf::from("main.sr"));
                assert!(json);
            }
            _ => panic!("Expected parse subcommand"),
        }
    }

    #[test]
    fn test_short_v_is_not_verbosity() {
        let err = match Cli::try_parse_from(["serrate", "-V"]) {
            Ok(_) => panic!("Expected the version to be printed"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        assert!(Cli::try_parse_from(["serrate", "check", "main.sr", "-v"]).is_err());
    }

    #[test]
    fn test_build_output_flag() {
        let cli = Cli::try_parse_from(["serrate", "build", "main.sr", "-o", "out.c"]).unwrap();
        match cli.command {
            Commands::Build { output, .. } => assert_eq!(output, Some(PathBuf::from("out.c"))),
            _ => panic!("Expected build subcommand"),
        }
    }

    #[test]
    fn test_missing_file_exit_code() {
        let err = match load(Path::new("does/not/exist.sr")) {
            Ok(_) => panic!("Expected a read error"),
            Err(err) => CliError::from(err),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("could not read"));
    }
}
