use crate::environment::Environment;
use crate::eval::{eval, EvalErr};
use crate::parser::Expr;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

pub type Fp = Rc<dyn Fn(&[Value]) -> Result<Value, EvalErr>>;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
    Any,
}

impl Arity {
    pub fn accepts(&self, nargs: usize) -> bool {
        match *self {
            Arity::Exact(n) => nargs == n,
            Arity::AtLeast(n) => nargs >= n,
            Arity::Range(lo, hi) => lo <= nargs && nargs <= hi,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

pub enum Procedure {
    Builtin {
        name: &'static str,
        arity: Arity,
        fp: Fp,
    },
    // captured env is shared with whoever else holds it, never copied
    Lambda {
        params: Vec<String>,
        body: Expr,
        env: Rc<Environment>,
    },
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Procedure::Builtin { name, .. } => write!(f, "#<builtin {}>", name),
            Procedure::Lambda { params, .. } => write!(f, "#<lambda ({})>", params.join(" ")),
        }
    }
}

impl Procedure {
    pub fn lambda(params: Vec<String>, body: Expr, env: Rc<Environment>) -> Procedure {
        Procedure::Lambda { params, body, env }
    }

    pub fn builtin(name: &'static str, arity: Arity, fp: Fp) -> Procedure {
        Procedure::Builtin { name, arity, fp }
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, EvalErr> {
        match self {
            Procedure::Builtin { name, arity, fp } => {
                if !arity.accepts(args.len()) {
                    return Err(EvalErr::WrongNumberOfArgs {
                        name: name.to_string(),
                        expected: *arity,
                        got: args.len(),
                    });
                }
                fp(&args)
            }
            Procedure::Lambda { params, body, env } => {
                tracing::debug!(params = ?params, nargs = args.len(), "calling lambda");
                // fresh frame per call, parented to the defining env
                let frame = Environment::new(params.clone(), args, Some(env.clone()));
                eval(body, &Rc::new(frame))
            }
        }
    }
}
