use crate::stack::ensure_sufficient_stack;
use std::fmt;
use thiserror::Error;

/// Deepest list nesting the reader accepts.
pub const MAX_NESTING: usize = 1_000;

#[derive(Error, PartialEq, Debug)]
pub enum ParseError {
    #[error("unexpected EOF")]
    UnexpectedEOF,
    #[error("unexpected )")]
    UnexpectedCParen,
    #[error("unexpected {token} after end of expression")]
    TrailingInput { token: String, pos: usize },
    #[error("lists nested deeper than {0}")]
    TooDeep(usize),
}

/// Parsed program. Only numbers and symbols are atoms, everything else is
/// a (possibly empty) list of expressions.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    List(Vec<Expr>),
}

impl Expr {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(sym) => Some(sym),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::List(list) => {
                let items = list.iter().map(|e| e.to_string()).collect::<Vec<_>>();
                write!(f, "({})", items.join(" "))
            }
        }
    }
}

// Pad parens with spaces so splitting on whitespace isolates them
pub fn tokenize(text: &str) -> Vec<String> {
    text.replace('(', " ( ")
        .replace(')', " ) ")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Read position over an already tokenized input. Tokens are consumed
/// strictly left to right, the underlying slice is never modified.
pub struct TokenCursor<'a> {
    tokens: &'a [String],
    pos: usize,
    depth: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        TokenCursor { tokens, pos: 0, depth: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }
}

impl<'a> Iterator for TokenCursor<'a> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }
}

/// Parse `text` as exactly one expression. A stray `)` or a second
/// expression after the first one is an error.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text);
    let mut cursor = TokenCursor::new(&tokens);
    let expr = read_from_tokens(&mut cursor)?;
    match cursor.peek() {
        None => Ok(expr),
        Some(")") => Err(ParseError::UnexpectedCParen),
        Some(token) => Err(ParseError::TrailingInput {
            token: token.to_string(),
            pos: cursor.pos(),
        }),
    }
}

/// Read the next expression off the cursor, leaving it right after it.
pub fn read_from_tokens(cursor: &mut TokenCursor) -> Result<Expr, ParseError> {
    match cursor.next() {
        None => Err(ParseError::UnexpectedEOF),
        Some(")") => Err(ParseError::UnexpectedCParen),
        Some("(") => {
            if cursor.depth >= MAX_NESTING {
                return Err(ParseError::TooDeep(MAX_NESTING));
            }
            cursor.depth += 1;
            let list = ensure_sufficient_stack(|| read_list(cursor));
            cursor.depth -= 1;
            list
        }
        Some(token) => Ok(atom(token)),
    }
}

// children up to the matching CParen, the OParen is already consumed
fn read_list(cursor: &mut TokenCursor) -> Result<Expr, ParseError> {
    let mut list = Vec::new();
    loop {
        match cursor.peek() {
            None => return Err(ParseError::UnexpectedEOF),
            Some(")") => break,
            Some(_) => list.push(read_from_tokens(cursor)?),
        }
    }
    cursor.next(); // get over that CParen
    Ok(Expr::List(list))
}

// Numbers first (float, then integer), any other token is a symbol
pub fn atom(token: &str) -> Expr {
    if let Ok(n) = token.parse::<f64>() {
        Expr::Number(n)
    } else if let Ok(n) = token.parse::<i64>() {
        Expr::Number(n as f64)
    } else {
        Expr::Symbol(token.to_string())
    }
}
