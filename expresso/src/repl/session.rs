use crate::api::Engine;
use crate::context::Context;
use crate::value::Value;

use super::command::Command;

/// Name bound to the last successful result
pub const ANSWER_VARIABLE: &str = "ans";

const HELP: &str = "\
Enter an expression to evaluate it. Commands:
  :set <name> = <expr>   evaluate <expr> and bind it to <name>
  :unset <name>          remove a variable
  :check <expr>          validate without evaluating
  :vars                  list variables
  :functions             list registered functions
  :reset                 drop all variables
  :help                  show this text
  :quit                  leave";

/// Outcome of one REPL line
#[derive(Debug, Clone, PartialEq)]
pub struct ReplResult {
    pub success: bool,
    /// Value of an evaluated expression
    pub value: Option<Value>,
    /// Text produced by a command
    pub output: String,
    pub error: Option<String>,
    /// The line asked to leave the REPL
    pub quit: bool,
}

impl ReplResult {
    pub fn success(value: Value) -> Self {
        Self {
            success: true,
            value: Some(value),
            output: String::new(),
            error: None,
            quit: false,
        }
    }

    pub fn message(output: impl Into<String>) -> Self {
        Self {
            success: true,
            value: None,
            output: output.into(),
            error: None,
            quit: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            value: None,
            output: String::new(),
            error: Some(message.into()),
            quit: false,
        }
    }

    fn quit() -> Self {
        Self {
            quit: true,
            ..Self::message("")
        }
    }
}

/// REPL state: an engine plus the variables bound so far
#[derive(Debug, Clone, Default)]
pub struct ReplSession {
    engine: Engine,
    context: Context,
}

impl ReplSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine,
            context: Context::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Parse and run one line of input
    pub fn eval(&mut self, line: &str) -> ReplResult {
        match Command::parse(line) {
            Ok(command) => self.run(command),
            Err(message) => ReplResult::error(message),
        }
    }

    pub fn run(&mut self, command: Command<'_>) -> ReplResult {
        match command {
            Command::Empty => ReplResult::message(""),
            Command::Evaluate(source) => match self.evaluate(source) {
                Ok(value) => {
                    self.context.set(ANSWER_VARIABLE, value.clone());
                    ReplResult::success(value)
                }
                Err(message) => ReplResult::error(message),
            },
            Command::Set { name, source } => match self.evaluate(source) {
                Ok(value) => {
                    tracing::debug!(name, "bind variable");
                    self.context.set(name, value.clone());
                    ReplResult::success(value)
                }
                Err(message) => ReplResult::error(message),
            },
            Command::Unset(name) => match self.context.remove(name) {
                Some(_) => ReplResult::message(format!("removed '{}'", name)),
                None => ReplResult::error(format!("variable '{}' is not defined", name)),
            },
            Command::Validate(source) => {
                let result = self.engine.validate_with_context(source, &self.context);
                ReplResult::message(result.to_string())
            }
            Command::Vars => ReplResult::message(self.describe_variables()),
            Command::Functions => ReplResult::message(self.describe_functions()),
            Command::Reset => {
                self.context = Context::new();
                ReplResult::message("session reset")
            }
            Command::Help => ReplResult::message(HELP),
            Command::Quit => ReplResult::quit(),
        }
    }

    fn evaluate(&self, source: &str) -> Result<Value, String> {
        self.engine
            .evaluate(source, &self.context)
            .map_err(|err| err.format_with_context(source))
    }

    fn describe_variables(&self) -> String {
        if self.context.is_empty() {
            return "(no variables)".to_string();
        }
        self.context
            .iter()
            .map(|(name, value)| format!("{} = {}", name, render(value)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn describe_functions(&self) -> String {
        let registry = self.engine.registry();
        registry
            .names()
            .map(|name| {
                let arities = registry
                    .overloads(name)
                    .iter()
                    .map(|d| d.arity.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ");
                format!("{}({})", name, arities)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// REPL form of a value: strings quoted, everything else as displayed
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", &**s),
        other => other.to_string(),
    }
}
