use crate::parser::Expr;
use crate::procedure::Procedure;
use std::fmt;
use std::rc::Rc;

/// Runtime values. Lists share their storage through an `Rc` so that
/// `eq?` can tell two handles on the same list from two equal lists.
#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    Symbol(String),
    Bool(bool),
    List(Rc<Vec<Value>>),
    Proc(Rc<Procedure>),
    // result of define, set! and print; renders as nothing
    Unspecified,
    // bound to parameters that got no argument
    Unbound,
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn empty() -> Value {
        Value::list(Vec::new())
    }

    /// Only `#f` is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Symbol(_) => "symbol",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
            Value::Proc(_) => "procedure",
            Value::Unspecified => "unspecified",
            Value::Unbound => "unbound",
        }
    }

    /// Identity comparison used by `eq?`. Atoms compare by value, lists and
    /// procedures by allocation. All empty lists are the same list.
    pub fn is_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || (a.is_empty() && b.is_empty())
            }
            (Value::Proc(a), Value::Proc(b)) => Rc::ptr_eq(a, b),
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::Unbound, Value::Unbound) => true,
            _ => false,
        }
    }
}

// Structural equality (`equal?`). Procedures have no structure to compare
// so they're only equal to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a == b,
            _ => self.is_eq(other),
        }
    }
}

impl From<&Expr> for Value {
    fn from(expr: &Expr) -> Value {
        match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::Symbol(s) => Value::Symbol(s.clone()),
            Expr::List(list) => Value::list(list.iter().map(Value::from).collect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::List(list) => {
                let items = list.iter().map(|v| v.to_string()).collect::<Vec<_>>();
                write!(f, "({})", items.join(" "))
            }
            Value::Proc(p) => write!(f, "{:?}", p),
            Value::Unspecified => Ok(()),
            Value::Unbound => write!(f, "#<unbound>"),
        }
    }
}
