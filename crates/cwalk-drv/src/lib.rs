//! cwalk-drv - Interpreter driver.
//!
//! Ties the pipeline together: read source (from a file or inline
//! text), lex, parse, analyze, evaluate, report. The interpreter
//! core reports failures as `CwalkError`s; the driver prints the kind
//! and message and turns any failed run into termination status -1.
//!
//! ```text
//! Source text
//!      |
//!      v
//!  [Lexer] --> token stream
//!      |
//!      v
//!  [Parser] --> arena AST
//!      |
//!      v
//!  [SemanticAnalyzer] --> validated AST
//!      |
//!      v
//!  [Evaluator] --> side effects + termination status
//! ```

use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context};
use colored::Colorize;
use log::debug;

use cwalk_eval::Evaluator;
use cwalk_lex::Lexer;
use cwalk_par::Parser;
use cwalk_sem::SemanticAnalyzer;
use cwalk_util::CwalkError;

/// Command-line usage text.
pub const USAGE: &str = "\
Usage: cwalk (-f <path> | -c <source>) [--verbose]

Options:
  -f, --file <path>    Interpret a C source file
  -c, --code <source>  Interpret C source text given inline
      --verbose        Trace the interpreter phases
  -h, --help           Print this help
  -V, --version        Print version
";

/// Where the source text comes from. The two options are mutually
/// exclusive on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(PathBuf),
    Inline(String),
}

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: Source,
    pub verbose: bool,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    Run(Config),
    Help,
    Version,
}

/// Parses command-line arguments (without the program name).
pub fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut file: Option<PathBuf> = None;
    let mut code: Option<String> = None;
    let mut verbose = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-f" | "--file" => {
                let value = iter.next().context("missing value for -f/--file")?;
                if file.replace(PathBuf::from(value)).is_some() {
                    bail!("-f/--file given more than once");
                }
            }
            "-c" | "--code" => {
                let value = iter.next().context("missing value for -c/--code")?;
                if code.replace(value).is_some() {
                    bail!("-c/--code given more than once");
                }
            }
            "--verbose" => verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            other => bail!("unknown argument '{}'", other),
        }
    }

    let source = match (file, code) {
        (Some(path), None) => Source::File(path),
        (None, Some(text)) => Source::Inline(text),
        (Some(_), Some(_)) => bail!("choose only one of -f/--file and -c/--code"),
        (None, None) => bail!("choose one of -f/--file or -c/--code"),
    };

    Ok(Command::Run(Config { source, verbose }))
}

/// One interpreter invocation.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the session and returns the termination status.
    ///
    /// Interpreter failures are reported here and produce status -1;
    /// only environment failures (an unreadable input file) escape as
    /// errors.
    pub fn run(&self) -> anyhow::Result<i32> {
        let source = self.read_source()?;

        Ok(match self.interpret(&source) {
            Ok(status) => status,
            Err(error) => {
                report_error(&error);
                -1
            }
        })
    }

    fn read_source(&self) -> anyhow::Result<String> {
        match &self.config.source {
            Source::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("could not read '{}'", path.display())),
            Source::Inline(text) => Ok(text.clone()),
        }
    }

    /// The pipeline: lex, parse, analyze, evaluate.
    fn interpret(&self, source: &str) -> Result<i32, CwalkError> {
        debug!("lexing {} bytes", source.len());
        let lexer = Lexer::new(source);

        debug!("parsing");
        let ast = Parser::new(lexer)?.parse()?;
        debug!("parsed {} nodes", ast.len());

        debug!("semantic analysis");
        SemanticAnalyzer::analyze(&ast)?;

        debug!("evaluating");
        let mut evaluator = Evaluator::new(&ast, BufReader::new(io::stdin()), io::stdout());
        evaluator.interpret()
    }
}

/// Prints the `[ErrorKind] message` diagnostic for a failed run.
pub fn report_error(error: &CwalkError) {
    eprintln!("{} {}", format!("[{}]", error.kind()).red().bold(), error);
}

/// Prints the final status line.
pub fn report_status(status: i32) {
    println!(
        "{}",
        format!("Process terminated with status {}", status).blue()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_file_argument() {
        match parse_args(args(&["-f", "prog.c"])).unwrap() {
            Command::Run(config) => {
                assert_eq!(config.source, Source::File(PathBuf::from("prog.c")));
                assert!(!config.verbose);
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_code_argument() {
        match parse_args(args(&["--code", "int main() { return 0; }", "--verbose"])).unwrap() {
            Command::Run(config) => {
                assert!(matches!(config.source, Source::Inline(_)));
                assert!(config.verbose);
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_source_is_an_error() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_both_sources_is_an_error() {
        assert!(parse_args(args(&["-f", "a.c", "-c", "int main() {}"])).is_err());
    }

    #[test]
    fn test_repeated_source_is_an_error() {
        assert!(parse_args(args(&["-f", "a.c", "-f", "b.c"])).is_err());
    }

    #[test]
    fn test_unknown_argument() {
        assert!(parse_args(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert!(matches!(parse_args(args(&["-h"])).unwrap(), Command::Help));
        assert!(matches!(
            parse_args(args(&["--version"])).unwrap(),
            Command::Version
        ));
    }

    #[test]
    fn test_inline_session_runs() {
        let session = Session::new(Config {
            source: Source::Inline("int main() { return 7; }".into()),
            verbose: false,
        });
        assert_eq!(session.run().unwrap(), 7);
    }

    #[test]
    fn test_failed_run_yields_minus_one() {
        let session = Session::new(Config {
            source: Source::Inline("int main() { return 1 / 0; }".into()),
            verbose: false,
        });
        assert_eq!(session.run().unwrap(), -1);
    }

    #[test]
    fn test_unreadable_file_is_an_environment_error() {
        let session = Session::new(Config {
            source: Source::File(PathBuf::from("/no/such/file.c")),
            verbose: false,
        });
        assert!(session.run().is_err());
    }
}
