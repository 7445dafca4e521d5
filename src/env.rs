//! Lexical scope frames.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::eval::RuntimeError;
use crate::value::{NativeFunction, Value};

/// One scope frame.  Frames are shared: a frame lives as long as the closures and
/// child frames that refer to it.
pub struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<HashMap<String, Value>>,
    immutables: RefCell<HashSet<String>>,
}

impl Env {
    pub fn new() -> Rc<Env> {
        Self::with_parent(None)
    }

    pub fn with_parent(parent: Option<Rc<Env>>) -> Rc<Env> {
        Rc::new(Env {
            parent,
            bindings: RefCell::new(HashMap::new()),
            immutables: RefCell::new(HashSet::new()),
        })
    }

    pub fn parent(&self) -> Option<&Rc<Env>> {
        self.parent.as_ref()
    }

    /// Bind `name` in this frame.  Fails if this frame already binds it; shadowing a
    /// binding of an enclosing frame is fine.
    pub fn declare(&self, name: &str, val: Value, immutable: bool) -> Result<Value, RuntimeError> {
        match self.bindings.borrow_mut().entry(name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(val.clone());
            }
            Entry::Occupied(_) => return Err(RuntimeError::RedefinedVar(name.to_string())),
        }
        if immutable {
            self.immutables.borrow_mut().insert(name.to_string());
        }
        Ok(val)
    }

    /// Rebind `name` in the nearest frame that binds it.
    pub fn assign(self: &Rc<Self>, name: &str, val: Value) -> Result<Value, RuntimeError> {
        let owner = self.resolve(name)?;
        if owner.immutables.borrow().contains(name) {
            return Err(RuntimeError::ImmutableVar(name.to_string()));
        }
        owner
            .bindings
            .borrow_mut()
            .insert(name.to_string(), val.clone());
        Ok(val)
    }

    pub fn lookup(self: &Rc<Self>, name: &str) -> Result<Value, RuntimeError> {
        let owner = self.resolve(name)?;
        let val = owner.bindings.borrow().get(name).cloned();
        val.ok_or_else(|| RuntimeError::UnknownVar(name.to_string()))
    }

    /// Return the nearest frame, starting with this one, that binds `name`.
    pub fn resolve(self: &Rc<Self>, name: &str) -> Result<Rc<Env>, RuntimeError> {
        let mut env = self;
        loop {
            if env.bindings.borrow().contains_key(name) {
                return Ok(env.clone());
            }
            match env.parent.as_ref() {
                Some(parent) => env = parent,
                None => return Err(RuntimeError::UnknownVar(name.to_string())),
            }
        }
    }

    pub fn is_immutable(&self, name: &str) -> bool {
        self.immutables.borrow().contains(name)
    }

    pub fn add_native(&self, native: NativeFunction) {
        let name = native.name.clone();
        self.declare(&name, Value::Native(native), true)
            .expect("error when binding native function");
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.bindings.borrow().keys().cloned().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("parent", &self.parent)
            .finish()
    }
}
