//! ksc-drv - Driver for the KS interpreter.
//!
//! The driver is the orchestrator around the core pipeline: it parses the
//! command line, reads source files, runs tokenize → parse → interpret,
//! maps stage failures to exit codes, and hosts the interactive prompt
//! and the `--tokens`/`--ast` dump modes.
//!
//! ```text
//! Source (.ks)
//!      │
//!      ▼
//!  [ksc-lex] ──▶ tokens ──▶ [ksc-par] ──▶ AST ──▶ [ksc-eval] ──▶ stdout
//! ```

use anyhow::Context;
use ksc_eval::{Interpreter, RuntimeError};
use ksc_lex::{tokenize, LexError, TokenKind};
use ksc_par::{parse, ParseError};
use ksc_util::{Diagnostic, Span};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Exit code for success.
pub const EXIT_OK: i32 = 0;
/// Exit code for lexical or syntax errors (sysexits EX_DATAERR).
pub const EXIT_SYNTAX: i32 = 65;
/// Exit code for runtime errors (sysexits EX_SOFTWARE).
pub const EXIT_RUNTIME: i32 = 70;
/// Exit code for I/O and usage failures.
pub const EXIT_IO: i32 = 1;

/// What a single invocation should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Execute a source file.
    Run(PathBuf),
    /// Dump the token stream of a file.
    Tokens(PathBuf),
    /// Dump the AST of a file.
    Ast(PathBuf),
    /// Line-by-line evaluation against one shared global scope.
    Repl,
}

/// Parsed command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    /// Trace pipeline phases to stderr.
    pub verbose: bool,
}

impl Config {
    /// Parses raw arguments (program name already stripped).
    pub fn from_args(args: &[String]) -> Result<Config, String> {
        let mut verbose = false;
        let mut rest: Vec<&str> = Vec::new();
        for arg in args {
            if arg == "--verbose" {
                verbose = true;
            } else {
                rest.push(arg.as_str());
            }
        }

        let mode = match rest.as_slice() {
            [] => Mode::Repl,
            ["--tokens", file] => Mode::Tokens(PathBuf::from(file)),
            ["--ast", file] => Mode::Ast(PathBuf::from(file)),
            [file] if !file.starts_with("--") => Mode::Run(PathBuf::from(file)),
            _ => return Err(usage()),
        };

        Ok(Config { mode, verbose })
    }
}

/// The one-line usage message.
pub fn usage() -> String {
    "usage: ks [--tokens|--ast] [--verbose] [<file.ks>]".to_string()
}

/// Runs one invocation and returns the process exit code.
pub fn run(config: &Config) -> i32 {
    match &config.mode {
        Mode::Run(path) => run_file(path, config.verbose),
        Mode::Tokens(path) => dump_tokens(path),
        Mode::Ast(path) => dump_ast(path),
        Mode::Repl => run_repl(),
    }
}

/// Reads a source file, enforcing the `.ks` suffix.
fn read_source(path: &Path) -> anyhow::Result<String> {
    if path.extension().map_or(true, |ext| ext != "ks") {
        anyhow::bail!("source file must have a .ks extension: {}", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))
}

fn run_file(path: &Path, verbose: bool) -> i32 {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return EXIT_IO;
        },
    };

    if verbose {
        eprintln!("tokenizing {}", path.display());
    }
    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(err) => {
            report_lex_error(&err);
            return EXIT_SYNTAX;
        },
    };

    if verbose {
        eprintln!("parsing {} ({} tokens)", path.display(), tokens.len());
    }
    let program = match parse(tokens) {
        Ok(program) => program,
        Err(err) => {
            report_parse_error(&err);
            return EXIT_SYNTAX;
        },
    };

    if verbose {
        eprintln!(
            "interpreting {} ({} statements)",
            path.display(),
            program.statements.len()
        );
    }
    match ksc_eval::interpret(&program) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            report_runtime_error(&err);
            EXIT_RUNTIME
        },
    }
}

fn dump_tokens(path: &Path) -> i32 {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return EXIT_IO;
        },
    };

    match tokenize(&source) {
        Ok(tokens) => {
            for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
                println!("{}", token);
            }
            EXIT_OK
        },
        Err(err) => {
            report_lex_error(&err);
            EXIT_SYNTAX
        },
    }
}

fn dump_ast(path: &Path) -> i32 {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return EXIT_IO;
        },
    };

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(err) => {
            report_lex_error(&err);
            return EXIT_SYNTAX;
        },
    };

    match parse(tokens) {
        Ok(program) => {
            println!("{:#?}", program);
            EXIT_OK
        },
        Err(err) => {
            report_parse_error(&err);
            EXIT_SYNTAX
        },
    }
}

/// Interactive mode: one interpreter for the whole session, so bindings
/// persist across lines and across failed lines.
fn run_repl() -> i32 {
    println!("KS interactive interpreter");
    println!("type 'exit' to quit");

    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        print!("ks> ");
        if io::stdout().flush().is_err() {
            return EXIT_OK;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return EXIT_OK, // EOF
            Ok(_) => {},
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            return EXIT_OK;
        }

        run_line(&mut interpreter, line);
    }
}

/// Runs one REPL line; errors are reported and the session continues.
fn run_line(interpreter: &mut Interpreter, source: &str) {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(err) => {
            report_lex_error(&err);
            return;
        },
    };

    let program = match parse(tokens) {
        Ok(program) => program,
        Err(err) => {
            report_parse_error(&err);
            return;
        },
    };

    if let Err(err) = interpreter.interpret(&program) {
        report_runtime_error(&err);
    }
}

fn report_lex_error(err: &LexError) {
    eprintln!("{}", Diagnostic::error(err.message.clone(), err.span));
}

fn report_parse_error(err: &ParseError) {
    eprintln!(
        "{}",
        Diagnostic::error(err.message.clone(), Span::point(err.line, 0))
    );
}

fn report_runtime_error(err: &RuntimeError) {
    eprintln!("{}", Diagnostic::error(err.to_string(), Span::DUMMY));
}
