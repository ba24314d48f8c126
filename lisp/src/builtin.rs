use crate::eval::EvalErr;
use crate::procedure::{Arity, Procedure};
use crate::value::Value;
use std::collections::HashMap;
use std::f64::consts;
use std::rc::Rc;

fn bad_arg(name: &str, reason: impl Into<String>) -> EvalErr {
    EvalErr::BadArgument { name: name.to_string(), reason: reason.into() }
}

// destructure a fixed number of arguments
fn take<'a, const N: usize>(name: &str, args: &'a [Value]) -> Result<&'a [Value; N], EvalErr> {
    args.try_into().map_err(|_| EvalErr::WrongNumberOfArgs {
        name: name.to_string(),
        expected: Arity::Exact(N),
        got: args.len(),
    })
}

fn number(name: &str, value: &Value) -> Result<f64, EvalErr> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(bad_arg(name, format!("expected number, found {}", other.type_name()))),
    }
}

fn list<'a>(name: &str, value: &'a Value) -> Result<&'a [Value], EvalErr> {
    match value {
        Value::List(items) => Ok(items.as_slice()),
        other => Err(bad_arg(name, format!("expected list, found {}", other.type_name()))),
    }
}

fn procedure(value: &Value) -> Result<&Rc<Procedure>, EvalErr> {
    match value {
        Value::Proc(p) => Ok(p),
        other => Err(EvalErr::NotCallable(other.to_string())),
    }
}

fn builtin<F>(name: &'static str, arity: Arity, fp: F) -> (String, Value)
where
    F: Fn(&[Value]) -> Result<Value, EvalErr> + 'static,
{
    let procedure = Procedure::builtin(name, arity, Rc::new(fp));
    (name.to_string(), Value::Proc(Rc::new(procedure)))
}

fn constant(name: &str, value: f64) -> (String, Value) {
    (name.to_string(), Value::Number(value))
}

fn unary(name: &'static str, op: fn(f64) -> f64) -> (String, Value) {
    builtin(name, Arity::Exact(1), move |args| {
        let [x] = take::<1>(name, args)?;
        Ok(Value::Number(op(number(name, x)?)))
    })
}

fn binary(name: &'static str, op: fn(f64, f64) -> f64) -> (String, Value) {
    builtin(name, Arity::Exact(2), move |args| {
        let [lhs, rhs] = take::<2>(name, args)?;
        Ok(Value::Number(op(number(name, lhs)?, number(name, rhs)?)))
    })
}

fn compare(name: &'static str, op: fn(f64, f64) -> bool) -> (String, Value) {
    builtin(name, Arity::Exact(2), move |args| {
        let [lhs, rhs] = take::<2>(name, args)?;
        Ok(Value::Bool(op(number(name, lhs)?, number(name, rhs)?)))
    })
}

fn predicate(name: &'static str, test: fn(&Value) -> bool) -> (String, Value) {
    builtin(name, Arity::Exact(1), move |args| {
        let [x] = take::<1>(name, args)?;
        Ok(Value::Bool(test(x)))
    })
}

fn float_class(name: &'static str, test: fn(f64) -> bool) -> (String, Value) {
    builtin(name, Arity::Exact(1), move |args| {
        let [x] = take::<1>(name, args)?;
        Ok(Value::Bool(test(number(name, x)?)))
    })
}

fn factorial(args: &[Value]) -> Result<Value, EvalErr> {
    let [x] = take::<1>("factorial", args)?;
    let n = number("factorial", x)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(bad_arg("factorial", "only accepts non-negative integral values"));
    }
    // 171! and up don't fit in an f64
    if n > 170.0 {
        return Ok(Value::Number(f64::INFINITY));
    }
    Ok(Value::Number((1..=n as u64).fold(1.0, |acc, k| acc * k as f64)))
}

fn log(args: &[Value]) -> Result<Value, EvalErr> {
    match args {
        [x] => Ok(Value::Number(number("log", x)?.ln())),
        [x, base] => Ok(Value::Number(number("log", x)?.log(number("log", base)?))),
        _ => Err(EvalErr::WrongNumberOfArgs {
            name: "log".to_string(),
            expected: Arity::Range(1, 2),
            got: args.len(),
        }),
    }
}

/// Constants and functions of the standard math library.
pub fn math_library() -> HashMap<String, Value> {
    vec![
        constant("pi", consts::PI),
        constant("e", consts::E),
        constant("tau", consts::TAU),
        unary("sqrt", f64::sqrt),
        unary("exp", f64::exp),
        unary("expm1", f64::exp_m1),
        unary("log2", f64::log2),
        unary("log10", f64::log10),
        unary("log1p", f64::ln_1p),
        unary("sin", f64::sin),
        unary("cos", f64::cos),
        unary("tan", f64::tan),
        unary("asin", f64::asin),
        unary("acos", f64::acos),
        unary("atan", f64::atan),
        unary("sinh", f64::sinh),
        unary("cosh", f64::cosh),
        unary("tanh", f64::tanh),
        unary("asinh", f64::asinh),
        unary("acosh", f64::acosh),
        unary("atanh", f64::atanh),
        unary("floor", f64::floor),
        unary("ceil", f64::ceil),
        unary("trunc", f64::trunc),
        unary("fabs", f64::abs),
        unary("degrees", f64::to_degrees),
        unary("radians", f64::to_radians),
        binary("atan2", f64::atan2),
        binary("pow", f64::powf),
        binary("hypot", f64::hypot),
        binary("fmod", |x, y| x % y),
        binary("copysign", f64::copysign),
        float_class("isnan", f64::is_nan),
        float_class("isinf", f64::is_infinite),
        float_class("isfinite", f64::is_finite),
        builtin("factorial", Arity::Exact(1), factorial),
        builtin("log", Arity::Range(1, 2), log),
    ]
    .into_iter()
    .collect()
}

/// The fixed primitive set every program can rely on.
pub fn primitives() -> HashMap<String, Value> {
    vec![
        binary("+", |x, y| x + y),
        binary("-", |x, y| x - y),
        binary("*", |x, y| x * y),
        builtin("/", Arity::Exact(2), |args| {
            let [lhs, rhs] = take::<2>("/", args)?;
            let (lhs, rhs) = (number("/", lhs)?, number("/", rhs)?);
            if rhs == 0.0 {
                return Err(bad_arg("/", "division by zero"));
            }
            Ok(Value::Number(lhs / rhs))
        }),
        compare(">", |x, y| x > y),
        compare("<", |x, y| x < y),
        compare(">=", |x, y| x >= y),
        compare("<=", |x, y| x <= y),
        compare("=", |x, y| x == y),
        binary("expt", f64::powf),
        builtin("append", Arity::Exact(2), |args| {
            let [lhs, rhs] = take::<2>("append", args)?;
            let mut items = list("append", lhs)?.to_vec();
            items.extend_from_slice(list("append", rhs)?);
            Ok(Value::list(items))
        }),
        builtin("apply", Arity::Exact(2), |args| {
            let [callee, spread] = take::<2>("apply", args)?;
            procedure(callee)?.call(list("apply", spread)?.to_vec())
        }),
        // arguments arrive evaluated in order, only the last one matters
        builtin("begin", Arity::AtLeast(1), |args| {
            args.last().cloned().ok_or_else(|| bad_arg("begin", "nothing to evaluate"))
        }),
        builtin("car", Arity::Exact(1), |args| {
            let [x] = take::<1>("car", args)?;
            list("car", x)?.first().cloned().ok_or_else(|| bad_arg("car", "empty list"))
        }),
        builtin("cdr", Arity::Exact(1), |args| {
            let [x] = take::<1>("cdr", args)?;
            Ok(Value::list(list("cdr", x)?.iter().skip(1).cloned().collect()))
        }),
        builtin("cons", Arity::Exact(2), |args| {
            let [head, tail] = take::<2>("cons", args)?;
            let mut items = vec![head.clone()];
            items.extend_from_slice(list("cons", tail)?);
            Ok(Value::list(items))
        }),
        builtin("eq?", Arity::Exact(2), |args| {
            let [lhs, rhs] = take::<2>("eq?", args)?;
            Ok(Value::Bool(lhs.is_eq(rhs)))
        }),
        builtin("equal?", Arity::Exact(2), |args| {
            let [lhs, rhs] = take::<2>("equal?", args)?;
            Ok(Value::Bool(lhs == rhs))
        }),
        builtin("length", Arity::Exact(1), |args| {
            let [x] = take::<1>("length", args)?;
            Ok(Value::Number(list("length", x)?.len() as f64))
        }),
        builtin("list", Arity::Any, |args| Ok(Value::list(args.to_vec()))),
        builtin("map", Arity::Exact(2), |args| {
            let [callee, items] = take::<2>("map", args)?;
            let callee = procedure(callee)?;
            let mapped = list("map", items)?
                .iter()
                .map(|item| callee.call(vec![item.clone()]))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::list(mapped))
        }),
        builtin("not", Arity::Exact(1), |args| {
            let [x] = take::<1>("not", args)?;
            Ok(Value::Bool(!x.is_truthy()))
        }),
        builtin("print", Arity::Exact(1), |args| {
            let [x] = take::<1>("print", args)?;
            println!("{}", x);
            Ok(Value::Unspecified)
        }),
        predicate("list?", |x| matches!(x, Value::List(_))),
        predicate("null?", |x| matches!(x, Value::List(items) if items.is_empty())),
        predicate("number?", |x| matches!(x, Value::Number(_))),
        predicate("procedure?", |x| matches!(x, Value::Proc(_))),
        predicate("symbol?", |x| matches!(x, Value::Symbol(_))),
        constant("pi", consts::PI),
        ("#t".to_string(), Value::Bool(true)),
        ("#f".to_string(), Value::Bool(false)),
    ]
    .into_iter()
    .collect()
}

/// Everything installed in a fresh global environment.
pub fn builtins() -> HashMap<String, Value> {
    let mut table = math_library();
    table.extend(primitives());
    table
}
