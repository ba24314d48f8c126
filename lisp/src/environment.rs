use crate::eval::EvalErr;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A scope frame. Frames point to their outer frame only, the same outer
/// frame can be shared by any number of call frames and closures.
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn global() -> Environment {
        Environment { bindings: RefCell::new(HashMap::new()), outer: None }
    }

    // names without a matching value get Value::Unbound, extra values are dropped
    pub fn new(names: Vec<String>, values: Vec<Value>,
               outer: Option<Rc<Environment>>) -> Environment {
        let mut values = values.into_iter();
        let bindings = names
            .into_iter()
            .map(|name| (name, values.next().unwrap_or(Value::Unbound)))
            .collect();
        Environment { bindings: RefCell::new(bindings), outer }
    }

    /// Innermost frame in the chain that binds `name` itself.
    pub fn find(&self, name: &str) -> Result<&Environment, EvalErr> {
        let mut env = self;
        loop {
            if env.bindings.borrow().contains_key(name) {
                return Ok(env);
            }
            match env.outer {
                Some(ref outer) => env = outer.as_ref(),
                None => return Err(EvalErr::UnboundVariable(name.to_string())),
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, EvalErr> {
        let env = self.find(name)?;
        let value = env.bindings.borrow().get(name).cloned();
        value.ok_or_else(|| EvalErr::UnboundVariable(name.to_string()))
    }

    // Overwrites an existing binding, never creates one
    pub fn set(&self, name: &str, value: Value) -> Result<(), EvalErr> {
        let env = self.find(name)?;
        env.bindings.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    pub fn update(&self, table: HashMap<String, Value>) {
        self.bindings.borrow_mut().extend(table);
    }
}
