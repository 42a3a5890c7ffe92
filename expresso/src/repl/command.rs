use expresso_parser::{tokenize, Token};

/// One line of REPL input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Evaluate(&'a str),
    /// `:set name = expression`
    Set { name: &'a str, source: &'a str },
    /// `:unset name`
    Unset(&'a str),
    /// `:check expression`
    Validate(&'a str),
    Vars,
    Functions,
    Reset,
    Help,
    Quit,
}

impl<'a> Command<'a> {
    /// Split a line into a command; anything not starting with `:` is an expression
    pub fn parse(line: &'a str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Evaluate(line));
        };

        let (word, arg) = match rest.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (rest, ""),
        };

        match word {
            "set" | "let" => parse_binding(arg),
            "unset" => identifier(arg).map(Command::Unset),
            "check" | "validate" if !arg.is_empty() => Ok(Command::Validate(arg)),
            "check" | "validate" => Err("usage: :check <expression>".to_string()),
            "vars" => Ok(Command::Vars),
            "functions" | "fns" => Ok(Command::Functions),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command ':{}' (try :help)", other)),
        }
    }
}

fn parse_binding(arg: &str) -> Result<Command<'_>, String> {
    const USAGE: &str = "usage: :set <name> = <expression>";

    let (name, source) = arg.split_once('=').ok_or_else(|| USAGE.to_string())?;
    let source = source.trim();
    if source.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(Command::Set {
        name: identifier(name.trim())?,
        source,
    })
}

/// Accept `text` only if the lexer reads it back as one identifier
fn identifier(text: &str) -> Result<&str, String> {
    let valid = match tokenize(text).as_deref() {
        Ok([name, eof]) => {
            name.token == Token::Identifier && name.text == text && eof.token == Token::Eof
        }
        _ => false,
    };
    if !valid {
        return Err(format!("'{}' is not a valid variable name", text));
    }
    Ok(text)
}
