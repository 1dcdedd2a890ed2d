// newlang: parse and run a source file statement by statement

use std::fs;
use std::io;
use std::path::Path;
use std::process;

use crossterm::style::Stylize;
use crossterm::tty::IsTty;

use newlang::interpreter::{Interpreter, StatementOutcome};
use newlang::parser::{CharacterSource, Lexer, Parser};

const USAGE: &str = "newlang [--tokens | --ast] [--no-color] <file>";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Run,
    Tokens,
    Ast,
}

struct Options {
    mode: Mode,
    color: bool,
    file: String,
}

/// Terminal styling, disabled for `--no-color`, `NO_COLOR` and redirected output
struct Painter {
    color: bool,
}

impl Painter {
    fn parse(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            eprintln!("Usage: {}", USAGE);
            process::exit(1);
        }
    };

    let painter = Painter {
        color: options.color && io::stdout().is_tty(),
    };

    if !Path::new(&options.file).exists() {
        eprintln!("Error: File '{}' not found", options.file);
        process::exit(1);
    }

    let source = match fs::read_to_string(&options.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read '{}': {}", options.file, err);
            process::exit(1);
        }
    };

    let reader = CharacterSource::new(&source).with_name(options.file.as_str());
    let lexer = Lexer::from_source(reader);

    if options.mode == Mode::Tokens {
        for token in lexer {
            println!(
                "{} {}",
                painter.dim(&token.location.to_string()),
                token.describe()
            );
        }
        return;
    }

    eprintln!("Running {}...", options.file);
    let mut interp = Interpreter::new();
    let mut parser = Parser::from_lexer(lexer);
    let outcomes = interp.run_parser(&mut parser);

    let failures = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
    for outcome in &outcomes {
        report(outcome, options.mode, parser.source_name(), &painter);
    }

    if failures > 0 {
        eprintln!("{} of {} statements failed.", failures, outcomes.len());
        process::exit(1);
    }
}

fn report(
    outcome: &StatementOutcome,
    mode: Mode,
    source_name: Option<&str>,
    painter: &Painter,
) {
    if let Some(syntax) = &outcome.syntax {
        if mode == Mode::Ast {
            println!("{:#?}", syntax);
        }
        println!(" parse: {}", painter.parse(syntax.to_string().trim()));
    }

    match &outcome.result {
        Ok(value) => println!("result: {}", value.inspect()),
        Err(err) => eprintln!("{}", painter.error(&err.diagnostic(source_name))),
    }
    println!();
}

/// Returns `Ok(None)` when `--help` or `--version` was handled.
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut mode = Mode::Run;
    let mut color = std::env::var_os("NO_COLOR").map_or(true, |value| value.is_empty());
    let mut file = None;

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("Usage: {}", USAGE);
                println!();
                println!("  --tokens    print the token stream instead of running");
                println!("  --ast       print each statement's syntax tree before running it");
                println!("  --no-color  disable colored output");
                return Ok(None);
            }
            "--version" | "-V" => {
                println!("newlang {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--tokens" => mode = Mode::Tokens,
            "--ast" => mode = Mode::Ast,
            "--no-color" => color = false,
            flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
            path => {
                if file.replace(path.to_string()).is_some() {
                    return Err("more than one input file".to_string());
                }
            }
        }
    }

    let file = file.ok_or_else(|| "no input file provided".to_string())?;
    Ok(Some(Options { mode, color, file }))
}
