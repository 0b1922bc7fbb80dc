//! Lexer and parser for key-condition expressions.
//!
//! A key condition addresses at most two key attributes:
//!
//! ```text
//! movieId = :m
//! movieId = :m AND crew > :c
//! ```
//!
//! The partition term must use `=`; the optional sort term may use any of
//! `=`, `<`, `<=`, `>`, `>=`. `AND` is matched case-insensitively.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Errors produced during key-condition parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },
    /// The expression ended prematurely.
    #[error("unexpected end of key condition")]
    UnexpectedEof,
    /// The partition term used an operator other than `=`.
    #[error("partition key condition must use '=', found '{found}'")]
    NonEqualityPartition {
        /// The operator that was used.
        found: String,
    },
}

/// Comparison operator in a sort-key term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// The operator's textual form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed key condition: a partition equality term and an optional
/// sort-key comparison term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    /// The partition key attribute name.
    pub partition_attribute: String,
    /// The placeholder bound to the partition key value (without `:`).
    pub partition_value_ref: String,
    /// The optional sort-key term.
    pub sort: Option<SortTerm>,
}

/// The sort-key half of a key condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    /// The sort key attribute name.
    pub attribute: String,
    /// The comparison operator.
    pub op: CompareOp,
    /// The placeholder bound to the comparison value (without `:`).
    pub value_ref: String,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Identifier(String),
    ValueRef(String),
    Op(CompareOp),
    And,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) => write!(f, "identifier '{s}'"),
            Self::ValueRef(s) => write!(f, ":{s}"),
            Self::Op(op) => write!(f, "'{op}'"),
            Self::And => write!(f, "AND"),
            Self::Eof => write!(f, "end of expression"),
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>, ExpressionError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok == Token::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(char::is_ascii_whitespace) {
            self.chars.next();
        }
    }

    fn next_token(&mut self) -> Result<Token, ExpressionError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        match ch {
            ':' => {
                self.chars.next();
                let name = self.read_ident_chars();
                if name.is_empty() {
                    return Err(ExpressionError::UnexpectedToken {
                        expected: "value name after ':'".to_owned(),
                        found: "empty".to_owned(),
                    });
                }
                Ok(Token::ValueRef(name))
            }
            '=' => {
                self.chars.next();
                Ok(Token::Op(CompareOp::Eq))
            }
            '<' => {
                self.chars.next();
                if self.chars.peek() == Some(&'=') {
                    self.chars.next();
                    Ok(Token::Op(CompareOp::Le))
                } else {
                    Ok(Token::Op(CompareOp::Lt))
                }
            }
            '>' => {
                self.chars.next();
                if self.chars.peek() == Some(&'=') {
                    self.chars.next();
                    Ok(Token::Op(CompareOp::Ge))
                } else {
                    Ok(Token::Op(CompareOp::Gt))
                }
            }
            c if is_ident_start(c) => {
                let ident = self.read_ident_chars();
                if ident.eq_ignore_ascii_case("and") {
                    Ok(Token::And)
                } else {
                    Ok(Token::Identifier(ident))
                }
            }
            other => Err(ExpressionError::UnexpectedToken {
                expected: "attribute name, ':' placeholder, or operator".to_owned(),
                found: format!("'{other}'"),
            }),
        }
    }

    fn read_ident_chars(&mut self) -> String {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if is_ident_continue(c) {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_identifier(&mut self) -> Result<String, ExpressionError> {
        match self.advance() {
            Token::Identifier(name) => Ok(name),
            Token::Eof => Err(ExpressionError::UnexpectedEof),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "attribute name".to_owned(),
                found: other.to_string(),
            }),
        }
    }

    fn expect_op(&mut self) -> Result<CompareOp, ExpressionError> {
        match self.advance() {
            Token::Op(op) => Ok(op),
            Token::Eof => Err(ExpressionError::UnexpectedEof),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "comparison operator".to_owned(),
                found: other.to_string(),
            }),
        }
    }

    fn expect_value_ref(&mut self) -> Result<String, ExpressionError> {
        match self.advance() {
            Token::ValueRef(name) => Ok(name),
            Token::Eof => Err(ExpressionError::UnexpectedEof),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "':' placeholder".to_owned(),
                found: other.to_string(),
            }),
        }
    }
}

/// Parse a key-condition expression.
///
/// # Errors
///
/// Returns [`ExpressionError`] when the expression is syntactically invalid
/// or the partition term does not use `=`.
pub fn parse_key_condition(input: &str) -> Result<KeyCondition, ExpressionError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser::new(tokens);

    let partition_attribute = parser.expect_identifier()?;
    let op = parser.expect_op()?;
    if op != CompareOp::Eq {
        return Err(ExpressionError::NonEqualityPartition {
            found: op.to_string(),
        });
    }
    let partition_value_ref = parser.expect_value_ref()?;

    let sort = match parser.peek() {
        Token::And => {
            parser.advance();
            let attribute = parser.expect_identifier()?;
            let op = parser.expect_op()?;
            let value_ref = parser.expect_value_ref()?;
            Some(SortTerm {
                attribute,
                op,
                value_ref,
            })
        }
        _ => None,
    };

    match parser.advance() {
        Token::Eof => Ok(KeyCondition {
            partition_attribute,
            partition_value_ref,
            sort,
        }),
        other => Err(ExpressionError::UnexpectedToken {
            expected: "end of expression".to_owned(),
            found: other.to_string(),
        }),
    }
}
