//! Recursive-descent parser for SPL.
//!
//! Parsing stops at the first error; the caller gets a single
//! [`Diagnostic`] describing it.
//!
//! ```text
//! program := stmt*
//! stmt    := new | assign | write | if | while | fun | return | block | expr ';'
//! expr    := or
//! or      := and ('or' and)*
//! and     := not ('and' not)*
//! not     := 'not' not | cmp
//! cmp     := add (cmp-op add)?
//! add     := mul (('+' | '-') mul)*
//! mul     := unary (('*' | '/' | '%') unary)*
//! unary   := '-' unary | primary
//! primary := INT | 'true' | 'false' | 'read' | IDENT | IDENT '(' expr ')' | '(' expr ')'
//! ```

mod cursor;
mod grammar;

use spl_diagnostic::Diagnostic;
use spl_ir::Program;
use spl_lexer::Token;

use cursor::Cursor;

/// Parser state.
pub struct Parser {
    cursor: Cursor,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    /// Parse statements until end of input.
    pub fn parse_program(mut self) -> Result<Program, Diagnostic> {
        let mut body = Vec::new();
        while !self.cursor.is_at_end() {
            body.push(self.parse_stmt()?);
        }
        Ok(Program::new(body))
    }
}

/// Lex and parse SPL source text.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str) -> Result<Program, Diagnostic> {
    let tokens = spl_lexer::lex(source)?;
    let program = Parser::new(tokens).parse_program()?;
    tracing::debug!(statements = program.body.len(), "parsed");
    Ok(program)
}
