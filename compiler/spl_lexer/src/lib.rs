//! Lexer for SPL using logos.
//!
//! Whitespace and comments (`#` or `//` to end of line) are skipped.
//! Lexing stops at the first malformed token and reports it as a
//! [`Diagnostic`].

mod token;

use logos::Logos;
use spl_diagnostic::{Diagnostic, ErrorCode};
use spl_ir::{ast::unescape, Span};

pub use token::{Token, TokenKind};

/// Raw token from logos, before literal conversion.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    // === Keywords ===
    #[token("new")]
    New,
    #[token("write")]
    Write,
    #[token("print")]
    Print,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("fun")]
    Fun,
    #[token("return")]
    Return,
    #[token("read")]
    Read,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,

    // === Operators ===
    #[token(":=")]
    ColonEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // === Literals ===
    #[regex(r"[0-9]+")]
    Int,

    // Strings may not span lines
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Lex `source` into tokens, ending with [`TokenKind::Eof`].
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = span_of(logos.span());
        let slice = logos.slice();
        let kind = match result {
            Ok(raw) => convert_token(raw, slice, span)?,
            Err(()) => {
                let message = format!("invalid character `{slice}`");
                return Err(Diagnostic::new(ErrorCode::E0002, message)
                    .with_label(span, "not valid in SPL source"));
            }
        };
        tokens.push(Token::new(kind, span));
    }

    let end = span_of(source.len()..source.len());
    tokens.push(Token::new(TokenKind::Eof, end));
    tracing::debug!(count = tokens.len(), "lexed");
    Ok(tokens)
}

fn span_of(range: std::ops::Range<usize>) -> Span {
    // Sources over 4 GiB saturate rather than wrap.
    Span::try_from_range(range).unwrap_or(Span::point(u32::MAX))
}

fn convert_token(raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, Diagnostic> {
    let kind = match raw {
        RawToken::New => TokenKind::New,
        RawToken::Write => TokenKind::Write,
        RawToken::Print => TokenKind::Print,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Fun => TokenKind::Fun,
        RawToken::Return => TokenKind::Return,
        RawToken::Read => TokenKind::Read,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::ColonEq => TokenKind::ColonEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Int => match slice.parse::<i32>() {
            Ok(n) => TokenKind::Int(n),
            Err(_) => {
                let message = format!("integer literal `{slice}` is too large");
                return Err(Diagnostic::new(ErrorCode::E0003, message)
                    .with_label(span, "does not fit in 32 bits")
                    .with_note(format!("the largest integer literal is {}", i32::MAX)));
            }
        },
        RawToken::Str => TokenKind::Str(unescape(&slice[1..slice.len() - 1])),
        RawToken::UnterminatedStr => {
            return Err(Diagnostic::new(ErrorCode::E0001, "unterminated string literal")
                .with_label(span, "missing closing `\"` before end of line"));
        }
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
    };
    Ok(kind)
}
