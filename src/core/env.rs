use crate::core::interpreter::RuntimeError;
use crate::core::scanner::Token;
use crate::core::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// one scope's bindings, linked to the enclosing scope; environments are
/// shared (`Rc`) because a closure must keep its defining scope alive after
/// the call that created it has returned
#[derive(Debug)]
pub struct Environment<'a> {
    enclosing: Option<Rc<RefCell<Environment<'a>>>>,
    values: HashMap<&'a str, Value<'a>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            enclosing: None,
            values: HashMap::new(),
        }))
    }

    pub fn with_enclosing(enclosing: &Rc<RefCell<Environment<'a>>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            enclosing: Some(Rc::clone(enclosing)),
            values: HashMap::new(),
        }))
    }

    /// introduces or overwrites a binding in this environment only;
    /// redefinition is tolerated (needed for re-entered top-level code)
    pub fn define(&mut self, name: &'a str, value: Value<'a>) {
        self.values.insert(name, value);
    }

    /// searches this environment, then walks the enclosing chain
    pub fn get(&self, name: &Token<'a>) -> Result<Value<'a>, RuntimeError> {
        if let Some(value) = self.values.get(name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }
        Err(RuntimeError::new(
            name,
            format!("Undefined variable '{}'.", name.lexeme),
        ))
    }

    pub fn assign(&mut self, name: &Token<'a>, value: Value<'a>) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(name.lexeme) {
            *slot = value;
            return Ok(());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }
        Err(RuntimeError::new(
            name,
            format!("Undefined variable '{}'.", name.lexeme),
        ))
    }

    /// walks exactly `distance` enclosing links and reads that environment's
    /// map directly; used only for names the resolver proved local, so even
    /// under shadowing the statically-determined binding is the one read
    pub fn get_at(
        env: &Rc<RefCell<Environment<'a>>>,
        distance: usize,
        name: &Token<'a>,
    ) -> Result<Value<'a>, RuntimeError> {
        let target = Self::ancestor(env, distance);
        let value = target.borrow().values.get(name.lexeme).cloned();
        value.ok_or_else(|| {
            RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))
        })
    }

    /// overwrites the binding at the resolved ancestor, same semantics as the
    /// dynamic `assign` path
    pub fn assign_at(
        env: &Rc<RefCell<Environment<'a>>>,
        distance: usize,
        name: &Token<'a>,
        value: Value<'a>,
    ) {
        Self::ancestor(env, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme, value);
    }

    fn ancestor(
        env: &Rc<RefCell<Environment<'a>>>,
        distance: usize,
    ) -> Rc<RefCell<Environment<'a>>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            // the resolver guarantees the chain is at least this deep
            let next = current.borrow().enclosing.as_ref().map(Rc::clone);
            match next {
                Some(enclosing) => current = enclosing,
                None => break,
            }
        }
        current
    }
}
