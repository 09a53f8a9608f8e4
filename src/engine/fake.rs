//! In-memory engine for exercising lifecycle and dispatch without Lua.
//!
//! Every observable action is appended to a shared journal so tests can
//! assert ordering across boot, calls, release, and close.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::engine::{CallError, CallValue, LoadError, ScriptEngine};

pub type FakeFn = Box<dyn Fn(&[CallValue]) -> Result<Vec<CallValue>, String>>;

/// What `exec_module` should pretend the module file did.
pub enum ModuleScript {
    /// Execution fails outright.
    Fails(&'static str),
    /// Execution succeeds but yields nothing registrable.
    NoObject,
    /// Execution yields an object with the given callables.
    Object(HashMap<String, FakeFn>),
}

/// An object whose entries all echo their arguments back.
pub fn echo_object(names: &[&str]) -> ModuleScript {
    let mut functions: HashMap<String, FakeFn> = HashMap::new();
    for name in names {
        functions.insert(
            name.to_string(),
            Box::new(|args: &[CallValue]| Ok(args.to_vec())),
        );
    }
    ModuleScript::Object(functions)
}

/// Everything observable the engine did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Exec,
    Invoke(String),
    Release,
    Close,
}

pub struct FakeEngine {
    script: RefCell<Option<ModuleScript>>,
    functions: RefCell<HashMap<String, FakeFn>>,
    live: Cell<bool>,
    journal: Rc<RefCell<Vec<Event>>>,
}

impl FakeEngine {
    pub fn new(script: ModuleScript) -> Self {
        Self {
            script: RefCell::new(Some(script)),
            functions: RefCell::new(HashMap::new()),
            live: Cell::new(false),
            journal: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle to the journal, valid after the engine itself is gone.
    pub fn journal(&self) -> Rc<RefCell<Vec<Event>>> {
        Rc::clone(&self.journal)
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.journal.borrow_mut().push(Event::Close);
    }
}

impl ScriptEngine for FakeEngine {
    type Anchor = u32;

    fn exec_module(&self, _path: &Path) -> Result<Option<u32>, LoadError> {
        self.journal.borrow_mut().push(Event::Exec);
        match self.script.borrow_mut().take() {
            None => Err(LoadError::Exec("module executed twice".into())),
            Some(ModuleScript::Fails(msg)) => Err(LoadError::Exec(msg.into())),
            Some(ModuleScript::NoObject) => Ok(None),
            Some(ModuleScript::Object(functions)) => {
                *self.functions.borrow_mut() = functions;
                self.live.set(true);
                Ok(Some(1))
            }
        }
    }

    fn resolve(&self, _anchor: &u32, name: &str) -> Result<bool, CallError> {
        Ok(self.live.get() && self.functions.borrow().contains_key(name))
    }

    fn invoke(
        &self,
        _anchor: &u32,
        name: &str,
        args: &[CallValue],
    ) -> Result<Vec<CallValue>, CallError> {
        self.journal.borrow_mut().push(Event::Invoke(name.to_string()));
        if !self.live.get() {
            return Err(CallError::Engine("anchor released".into()));
        }
        let functions = self.functions.borrow();
        let Some(function) = functions.get(name) else {
            return Err(CallError::NoSuchFunction {
                name: name.to_string(),
            });
        };
        function(args).map_err(|message| CallError::Runtime {
            name: name.to_string(),
            message,
        })
    }

    fn release(&self, _anchor: u32) {
        self.live.set(false);
        self.journal.borrow_mut().push(Event::Release);
    }
}
