use crate::eval::{ErrorKind, EvalErr, LispContext, MAX_EVAL_DEPTH};
use crate::parser::ParseError;
use crate::value::Value;

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_self_evaluating_and_lookup() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("42")?, num(42.0));
    assert_eq!(cx.eval_str("(* 2 3)")?, num(6.0));
    assert_eq!(cx.eval_str("pi")?, num(std::f64::consts::PI));
    assert_eq!(cx.eval_str("()")?, Value::empty());
    Ok(())
}

#[test]
fn test_define_then_use() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("(define r 10)")?, Value::Unspecified);
    assert_eq!(cx.eval_str("(* r r)")?, num(100.0));
    assert_eq!(cx.eval_str("(begin (define r 3) (* pi (* r r)))")?.to_string(),
               format!("{}", std::f64::consts::PI * 9.0));
    Ok(())
}

#[test]
fn test_if() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("(if (> 3 2) 1 2)")?, num(1.0));
    assert_eq!(cx.eval_str("(if (> 2 3) 1 2)")?, num(2.0));
    // untaken branch never runs
    cx.eval_str("(if (> 3 2) 1 (define leaked 1))")?;
    cx.eval_str("(if (> 2 3) (define leaked 1) 2)")?;
    assert!(cx.global().find("leaked").is_err());
    assert_eq!(cx.eval_str("leaked"), Err(EvalErr::UnboundVariable("leaked".to_string())));
    Ok(())
}

#[test]
fn test_truthiness() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("(if 0 1 2)")?, num(1.0));
    assert_eq!(cx.eval_str("(if (quote ()) 1 2)")?, num(1.0));
    assert_eq!(cx.eval_str("(if #f 1 2)")?, num(2.0));
    assert_eq!(cx.eval_str("(if (define x 1) 1 2)")?, num(1.0));
    assert_eq!(cx.eval_str("(not 0)")?, Value::Bool(false));
    assert_eq!(cx.eval_str("(not #f)")?, Value::Bool(true));
    assert_eq!(cx.eval_str("(not (= 1 2))")?, Value::Bool(true));
    Ok(())
}

#[test]
fn test_quote() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("(quote (undefined-fn 1 (x)))")?.to_string(), "(undefined-fn 1 (x))");
    assert_eq!(cx.eval_str("(quote abc)")?, Value::Symbol("abc".to_string()));
    assert_eq!(cx.eval_str("(symbol? (quote abc))")?, Value::Bool(true));
    Ok(())
}

#[test]
fn test_stateful_closures() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define make-account (lambda (balance) \
                   (lambda (amt) (begin (set! balance (+ balance amt)) balance))))")?;
    cx.eval_str("(define account1 (make-account 100))")?;
    cx.eval_str("(define account2 (make-account 500))")?;
    assert_eq!(cx.eval_str("(account1 -20)")?, num(80.0));
    assert_eq!(cx.eval_str("(account1 -20)")?, num(60.0));
    assert_eq!(cx.eval_str("(account2 1)")?, num(501.0));
    assert_eq!(cx.eval_str("(account1 0)")?, num(60.0));
    // balance lives in the closure's frame, not the global one
    assert!(cx.global().find("balance").is_err());
    Ok(())
}

#[test]
fn test_closures_share_captured_env() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define counter 0)")?;
    cx.eval_str("(define bump (lambda () (set! counter (+ counter 1))))")?;
    cx.eval_str("(define peek (lambda () counter))")?;
    cx.eval_str("(bump)")?;
    cx.eval_str("(bump)")?;
    assert_eq!(cx.eval_str("(peek)")?, num(2.0));
    // later mutations in the defining scope are observed
    cx.eval_str("(set! counter 40)")?;
    assert_eq!(cx.eval_str("(peek)")?, num(40.0));
    Ok(())
}

#[test]
fn test_recursion() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define fact (lambda (n) (if (<= n 1) 1 (* n (fact (- n 1))))))")?;
    assert_eq!(cx.eval_str("(fact 10)")?, num(3628800.0));
    cx.eval_str("(define fib (lambda (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))")?;
    assert_eq!(cx.eval_str("(map fib (list 0 1 2 3 4 5 6))")?.to_string(), "(0 1 1 2 3 5 8)");
    Ok(())
}

#[test]
fn test_define_shadows_inside_lambda() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define x 1)")?;
    cx.eval_str("(define f (lambda () (begin (define x 2) x)))")?;
    assert_eq!(cx.eval_str("(f)")?, num(2.0));
    assert_eq!(cx.eval_str("x")?, num(1.0));
    Ok(())
}

#[test]
fn test_args_evaluated_left_to_right() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define n 0)")?;
    cx.eval_str("(define next (lambda () (begin (set! n (+ n 1)) n)))")?;
    assert_eq!(cx.eval_str("(list (next) (next) (next))")?.to_string(), "(1 2 3)");
    Ok(())
}

#[test]
fn test_operator_can_be_any_expression() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("((lambda (x y) (+ x y)) 3 4)")?, num(7.0));
    assert_eq!(cx.eval_str("((if #t + -) 3 4)")?, num(7.0));
    Ok(())
}

#[test]
fn test_missing_args_are_unbound() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define f (lambda (a b) a))")?;
    assert_eq!(cx.eval_str("(f 1)")?, num(1.0));
    assert_eq!(cx.eval_str("(f 1 2 3)")?, num(1.0));
    cx.eval_str("(define g (lambda (a b) b))")?;
    assert_eq!(cx.eval_str("(g 1)"), Err(EvalErr::UnboundVariable("b".to_string())));
    Ok(())
}

#[test]
fn test_keywords_are_not_shadowable() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define quote (lambda (x) 99))")?;
    assert_eq!(cx.eval_str("(quote x)")?, Value::Symbol("x".to_string()));
    Ok(())
}

#[test]
fn test_errors() {
    let cx = LispContext::new();
    let unbound = cx.eval_str("(+ nope 1)").unwrap_err();
    assert_eq!(unbound, EvalErr::UnboundVariable("nope".to_string()));
    assert_eq!(unbound.kind(), ErrorKind::UnboundVariable);

    let set_unbound = cx.eval_str("(set! nope 1)").unwrap_err();
    assert_eq!(set_unbound.kind(), ErrorKind::UnboundVariable);
    assert!(cx.global().find("nope").is_err());

    let syntax = cx.eval_str("(+ 1 2").unwrap_err();
    assert_eq!(syntax, EvalErr::Syntax(ParseError::UnexpectedEOF));
    assert_eq!(syntax.kind(), ErrorKind::Syntax);
    assert_eq!(cx.eval_str(")"), Err(EvalErr::Syntax(ParseError::UnexpectedCParen)));

    let not_callable = cx.eval_str("(1 2 3)").unwrap_err();
    assert_eq!(not_callable, EvalErr::NotCallable("1".to_string()));
    assert_eq!(not_callable.kind(), ErrorKind::Application);

    assert!(matches!(cx.eval_str("(if 1 2)"), Err(EvalErr::InvalidExpr(_))));
    assert!(matches!(cx.eval_str("(define 3 4)"), Err(EvalErr::InvalidExpr(_))));
    assert!(matches!(cx.eval_str("(lambda (x 1) x)"), Err(EvalErr::InvalidExpr(_))));
    assert!(matches!(cx.eval_str("(quote)"), Err(EvalErr::InvalidExpr(_))));
}

#[test]
fn test_failure_keeps_earlier_effects() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    let err = cx.eval_str("(begin (define kept 1) (car (quote ())))").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(cx.eval_str("kept")?, num(1.0));
    Ok(())
}

#[test]
fn test_trailing_input_is_a_syntax_error() {
    let cx = LispContext::new();
    assert_eq!(cx.eval_str("(+ 1 2))"), Err(EvalErr::Syntax(ParseError::UnexpectedCParen)));
    let err = cx.eval_str("(define a 1) (undefined)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    // nothing ran
    assert!(cx.global().find("a").is_err());
}

#[test]
fn test_recursion_limit() -> Result<(), EvalErr> {
    let cx = LispContext::new();
    cx.eval_str("(define f (lambda (n) (if (= n 0) 0 (f (- n 1)))))")?;
    assert_eq!(cx.eval_str("(f 1000)")?, num(0.0));
    let err = cx.eval_str("(f 1000000)").unwrap_err();
    assert_eq!(err, EvalErr::RecursionLimit(MAX_EVAL_DEPTH));
    assert_eq!(err.kind(), ErrorKind::Application);
    // the session is still usable afterwards
    assert_eq!(cx.eval_str("(f 10)")?, num(0.0));
    cx.eval_str("(define g (lambda (n) (+ 1 (g n))))")?;
    assert_eq!(cx.eval_str("(g 0)"), Err(EvalErr::RecursionLimit(MAX_EVAL_DEPTH)));
    Ok(())
}
