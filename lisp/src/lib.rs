mod builtin;
mod environment;
mod eval;
mod parser;
mod procedure;
mod stack;
mod value;

pub use builtin::{builtins, math_library, primitives};
pub use environment::Environment;
pub use eval::{eval, ErrorKind, EvalErr, Keyword, LispContext, MAX_EVAL_DEPTH};
pub use parser::{
    atom, parse, read_from_tokens, tokenize, Expr, ParseError, TokenCursor, MAX_NESTING,
};
pub use procedure::{Arity, Fp, Procedure};
pub use value::Value;

#[cfg(test)]
mod eval_test;
