use crate::builtin::builtins;
use crate::environment::Environment;
use crate::parser::{parse, Expr, ParseError};
use crate::procedure::{Arity, Procedure};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, PartialEq, Debug)]
pub enum EvalErr {
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    #[error("not a procedure: {0}")]
    NotCallable(String),
    #[error("{name}: expected {expected} args, got {got}")]
    WrongNumberOfArgs { name: String, expected: Arity, got: usize },
    #[error("{name}: {reason}")]
    BadArgument { name: String, reason: String },
    #[error("invalid expression: {0}")]
    InvalidExpr(String),
    #[error("maximum recursion depth ({0}) exceeded")]
    RecursionLimit(usize),
}

/// Coarse classification of failures, as reported to the user.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ErrorKind {
    Syntax,
    UnboundVariable,
    Application,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::UnboundVariable => write!(f, "UnboundVariable"),
            ErrorKind::Application => write!(f, "ApplicationError"),
        }
    }
}

impl EvalErr {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalErr::Syntax(_) => ErrorKind::Syntax,
            EvalErr::UnboundVariable(_) => ErrorKind::UnboundVariable,
            _ => ErrorKind::Application,
        }
    }
}

/// Reserved leading symbols. They're matched before any lookup so
/// binding one of these names has no effect on evaluation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Keyword {
    Quote,
    If,
    Define,
    Set,
    Lambda,
}

impl Keyword {
    pub fn from_symbol(sym: &str) -> Option<Keyword> {
        match sym {
            "quote" => Some(Keyword::Quote),
            "if" => Some(Keyword::If),
            "define" => Some(Keyword::Define),
            "set!" => Some(Keyword::Set),
            "lambda" => Some(Keyword::Lambda),
            _ => None,
        }
    }
}

/// Deepest nesting of `eval` calls (nested forms plus procedure calls)
/// before a program is aborted with `EvalErr::RecursionLimit`.
pub const MAX_EVAL_DEPTH: usize = 10_000;

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

// Counts one level of eval nesting for as long as it's alive
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<DepthGuard, EvalErr> {
        EVAL_DEPTH.with(|depth| {
            if depth.get() >= MAX_EVAL_DEPTH {
                return Err(EvalErr::RecursionLimit(MAX_EVAL_DEPTH));
            }
            depth.set(depth.get() + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

pub fn eval(expr: &Expr, env: &Rc<Environment>) -> Result<Value, EvalErr> {
    let _depth = DepthGuard::enter()?;
    ensure_sufficient_stack(|| eval_expr(expr, env))
}

fn eval_expr(expr: &Expr, env: &Rc<Environment>) -> Result<Value, EvalErr> {
    tracing::trace!(%expr, "eval");
    match expr {
        Expr::Symbol(sym) => match env.find(sym)?.get(sym)? {
            Value::Unbound => Err(EvalErr::UnboundVariable(sym.clone())),
            value => Ok(value),
        },
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::List(list) => match list.split_first() {
            None => Ok(Value::empty()),
            Some((op, args)) => match op.as_symbol().and_then(Keyword::from_symbol) {
                Some(keyword) => eval_keyword(keyword, expr, args, env),
                None => apply(op, args, env),
            },
        },
    }
}

fn eval_keyword(keyword: Keyword, form: &Expr, args: &[Expr],
                env: &Rc<Environment>) -> Result<Value, EvalErr> {
    match (keyword, args) {
        (Keyword::Quote, [exp]) => Ok(Value::from(exp)),
        (Keyword::If, [test, conseq, alt]) => {
            if eval(test, env)?.is_truthy() {
                eval(conseq, env)
            } else {
                eval(alt, env)
            }
        }
        (Keyword::Define, [Expr::Symbol(var), exp]) => {
            let value = eval(exp, env)?;
            tracing::debug!(%var, %value, "define");
            env.define(var.clone(), value);
            Ok(Value::Unspecified)
        }
        (Keyword::Set, [Expr::Symbol(var), exp]) => {
            let value = eval(exp, env)?;
            tracing::debug!(%var, %value, "set!");
            env.find(var)?.set(var, value)?;
            Ok(Value::Unspecified)
        }
        (Keyword::Lambda, [Expr::List(params), body]) => {
            let params = params
                .iter()
                .map(|p| p.as_symbol().map(String::from))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| EvalErr::InvalidExpr(form.to_string()))?;
            Ok(Value::Proc(Rc::new(Procedure::lambda(params, body.clone(), env.clone()))))
        }
        _ => Err(EvalErr::InvalidExpr(form.to_string())),
    }
}

fn apply(op: &Expr, args: &[Expr], env: &Rc<Environment>) -> Result<Value, EvalErr> {
    let callee = eval(op, env)?;
    // left to right, arguments may set! shared state
    let args = args
        .iter()
        .map(|arg| eval(arg, env))
        .collect::<Result<Vec<_>, _>>()?;
    match callee {
        Value::Proc(p) => p.call(args),
        other => Err(EvalErr::NotCallable(other.to_string())),
    }
}

/// An interpreter session: a global environment preloaded with the
/// builtins, evaluating one program at a time.
pub struct LispContext {
    global: Rc<Environment>,
}

impl Default for LispContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LispContext {
    pub fn new() -> LispContext {
        let global = Environment::global();
        global.update(builtins());
        LispContext { global: Rc::new(global) }
    }

    pub fn global(&self) -> &Rc<Environment> {
        &self.global
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalErr> {
        eval(expr, &self.global)
    }

    pub fn eval_str(&self, text: &str) -> Result<Value, EvalErr> {
        let expr = parse(text)?;
        self.eval(&expr)
    }
}
