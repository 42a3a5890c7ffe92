#![deny(clippy::expect_used)]
//! Expresso command-line interface
//!
//! Usage:
//!   expresso                 # Start interactive REPL
//!   expresso -e "expr"       # Evaluate one expression and print the result
//!
//! `EXPRESSO_MAX_DEPTH` and `EXPRESSO_STRICT_VARIABLES` override the
//! evaluator configuration.

use std::env;
use std::path::PathBuf;
use std::process;

use expresso::repl::{render, Command, ReplResult, ReplSession};
use expresso::{Engine, EvaluatorConfig, LexError, ParseError};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Context, Editor, Helper};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const COMMANDS: &[&str] = &[
    ":set", ":unset", ":check", ":vars", ":functions", ":reset", ":help", ":quit",
];

mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const ERROR: &str = "\x1b[31m";
    pub const PROMPT: &str = "\x1b[32m";
}

/// Completion over commands, function names and bound variables
struct ExpressoHelper {
    names: Vec<String>,
}

impl ExpressoHelper {
    fn new(session: &ReplSession) -> Self {
        let mut helper = Self { names: Vec::new() };
        helper.refresh(session);
        helper
    }

    fn refresh(&mut self, session: &ReplSession) {
        self.names = session
            .engine()
            .registry()
            .names()
            .chain(session.context().names())
            .map(str::to_string)
            .collect();
        self.names.sort();
        self.names.dedup();
    }
}

impl Helper for ExpressoHelper {}

impl Completer for ExpressoHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before_cursor = &line[..pos];

        if before_cursor.starts_with(':') && !before_cursor.contains(char::is_whitespace) {
            let pairs = COMMANDS
                .iter()
                .filter(|c| c.starts_with(before_cursor))
                .map(|c| Pair {
                    display: c.to_string(),
                    replacement: c.to_string(),
                })
                .collect();
            return Ok((0, pairs));
        }

        let start = before_cursor
            .rfind(|c: char| !(c.is_alphanumeric() || c == '_'))
            .map_or(0, |i| i + 1);
        let prefix = &before_cursor[start..];
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }
        let pairs = self
            .names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ExpressoHelper {
    type Hint = String;
}

impl Highlighter for ExpressoHelper {}

impl Validator for ExpressoHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();
        if is_incomplete(input) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

/// An expression with an unclosed group or comment continues on the next line
fn is_incomplete(input: &str) -> bool {
    let source = match Command::parse(input) {
        Ok(Command::Evaluate(source)) | Ok(Command::Set { source, .. }) => source,
        _ => return false,
    };
    matches!(
        expresso_parser::parse(source),
        Err(ParseError::UnclosedParenthesis { .. })
            | Err(ParseError::UnclosedBracket { .. })
            | Err(ParseError::Lex(LexError::UnterminatedComment { .. }))
    )
}

fn history_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".expresso_history"))
}

fn load_config() -> EvaluatorConfig {
    EvaluatorConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(2);
    })
}

fn print_result(result: &ReplResult) {
    if let Some(error) = &result.error {
        eprintln!("{}ERROR:{} {}", colors::ERROR, colors::RESET, error);
        return;
    }
    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    if let Some(value) = &result.value {
        println!("{}", render(value));
    }
}

fn run_expression(source: &str) {
    let engine = Engine::new().with_config(load_config());
    let mut session = ReplSession::with_engine(engine);
    let result = session.run(Command::Evaluate(source));
    print_result(&result);
    if !result.success {
        process::exit(1);
    }
}

fn run_repl() {
    println!("  Expresso v{} - expression REPL", VERSION);
    println!("  Type \":help\" for help, \":quit\" to exit.\n");

    let engine = Engine::new().with_config(load_config());
    let mut session = ReplSession::with_engine(engine);

    let config = Config::builder().auto_add_history(false).build();
    let mut rl: Editor<ExpressoHelper, DefaultHistory> =
        Editor::with_config(config).unwrap_or_else(|e| {
            eprintln!("Error: failed to create REPL editor: {}", e);
            process::exit(1);
        });
    rl.set_helper(Some(ExpressoHelper::new(&session)));

    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    let prompt = format!("{}expresso>{} ", colors::PROMPT, colors::RESET);
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let result = session.eval(&line);
                if result.quit {
                    break;
                }
                print_result(&result);
                if let Some(helper) = rl.helper_mut() {
                    helper.refresh(&session);
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
}

fn print_usage() {
    println!("Expresso v{}", VERSION);
    println!();
    println!("Usage:");
    println!("  expresso              Start the interactive REPL");
    println!("  expresso -e <expr>    Evaluate one expression");
    println!("  expresso --version    Print the version");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None => run_repl(),
        Some("-e") => match args.get(2) {
            Some(source) => run_expression(source),
            None => {
                eprintln!("Error: -e requires an argument");
                process::exit(1);
            }
        },
        Some("-v") | Some("--version") => println!("expresso {}", VERSION),
        Some("-h") | Some("--help") => print_usage(),
        Some(other) => {
            eprintln!("Error: unknown argument '{}'", other);
            print_usage();
            process::exit(1);
        }
    }
}
