// Driver that parses and runs source text statement by statement

use crate::interpreter::errors::{EvalError, RuntimeError};
use crate::memory::{Context, Value};
use crate::parser::ast::Syntax;
use crate::parser::parse::Parser;

/// What happened to one top-level statement
#[derive(Debug, Clone, PartialEq)]
pub struct StatementOutcome {
    /// The parsed statement, or `None` when it failed to parse
    pub syntax: Option<Syntax>,
    pub result: Result<Value, EvalError>,
}

impl StatementOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs statements against one persistent [`Context`]
pub struct Interpreter {
    /// Bindings made by earlier statements
    context: Context,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            context: Context::new(),
        }
    }

    pub fn with_context(context: Context) -> Self {
        Interpreter { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Run one already parsed statement or expression
    pub fn execute(&mut self, syntax: &Syntax) -> Result<Value, RuntimeError> {
        syntax.run(&mut self.context)
    }

    /// Parse and run all of `source`, stopping at the first error.
    ///
    /// Returns the value of the last statement (`undefined` for empty input).
    pub fn eval_source(&mut self, source: &str) -> Result<Value, EvalError> {
        let mut parser = Parser::new(source);
        let mut last = Value::Undefined;

        while let Some(statement) = parser.parse_statement()? {
            last = self.execute(&statement)?;
        }
        parser.expect_end()?;

        Ok(last)
    }

    /// Parse and run all of `source`, reporting every statement separately.
    ///
    /// A grammar error skips to the next `;` or `}` and parsing resumes; a
    /// runtime error abandons only the statement that raised it.
    pub fn run_source(&mut self, source: &str) -> Vec<StatementOutcome> {
        self.run_parser(&mut Parser::new(source))
    }

    pub fn run_parser(&mut self, parser: &mut Parser) -> Vec<StatementOutcome> {
        let mut outcomes = Vec::new();

        loop {
            match parser.parse_statement() {
                Ok(Some(statement)) => {
                    let result = self.execute(&statement).map_err(EvalError::from);
                    outcomes.push(StatementOutcome {
                        syntax: Some(statement),
                        result,
                    });
                }
                Ok(None) => match parser.expect_end() {
                    Ok(()) => break,
                    Err(err) => outcomes.push(StatementOutcome {
                        syntax: None,
                        result: Err(err.into()),
                    }),
                },
                Err(err) => {
                    outcomes.push(StatementOutcome {
                        syntax: None,
                        result: Err(err.into()),
                    });
                    parser.synchronize();
                }
            }
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_source_returns_last_value() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.eval_source("1+2*3;"), Ok(Value::Number(7.0)));
        assert_eq!(interp.eval_source(""), Ok(Value::Undefined));
        assert_eq!(interp.eval_source("var a = 2; a * a"), Ok(Value::Number(4.0)));
    }

    #[test]
    fn test_eval_source_reports_first_error() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.eval_source("var ;"),
            Err(EvalError::Parse(_))
        ));
        assert!(matches!(
            interp.eval_source("x;"),
            Err(EvalError::Runtime(RuntimeError::UndefinedVariable { .. }))
        ));
        assert!(matches!(interp.eval_source("1; }"), Err(EvalError::Parse(_))));
    }

    #[test]
    fn test_context_persists_between_calls() {
        let mut interp = Interpreter::new();
        interp.eval_source("var a = 1;").unwrap();
        assert_eq!(interp.eval_source("a + 1;"), Ok(Value::Number(2.0)));
        assert_eq!(interp.context().get("a"), Some(&Value::Number(1.0)));

        interp.context_mut().define_global("b", Value::from("s"));
        assert_eq!(interp.eval_source("b + a;"), Ok(Value::from("s1")));
    }

    #[test]
    fn test_run_source_continues_after_errors() {
        let mut interp = Interpreter::new();
        let outcomes = interp.run_source("var a = 1; 4 + x; var ; a + 1; }  a;");
        let results: Vec<bool> = outcomes.iter().map(StatementOutcome::is_ok).collect();
        assert_eq!(results, vec![true, false, false, true, false, true]);

        assert_eq!(outcomes[3].result, Ok(Value::Number(2.0)));
        assert!(matches!(
            outcomes[1].result,
            Err(EvalError::Runtime(RuntimeError::UndefinedVariable { .. }))
        ));
        assert!(outcomes[2].syntax.is_none());
        assert_eq!(outcomes[5].result, Ok(Value::Number(1.0)));
    }

    #[test]
    fn test_with_context() {
        let mut ctx = Context::new();
        ctx.define_local("seed", Value::Number(9.0));
        let mut interp = Interpreter::with_context(ctx);
        let statement = Parser::new("seed - 1;").parse_statement().unwrap().unwrap();
        assert_eq!(interp.execute(&statement), Ok(Value::Number(8.0)));
    }
}
