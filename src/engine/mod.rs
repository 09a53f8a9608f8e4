//! Embedded engine abstraction
//!
//! Everything engine-specific (executing the module file, anchoring its
//! result, resolving names, invoking callables, converting values) sits
//! behind the narrow [`ScriptEngine`] trait so the lifecycle and dispatch
//! layers never touch interpreter internals. The production backend is
//! [`lua::LuaEngine`]; tests exercise the same contracts against an in-memory
//! fake.

pub mod lua;
pub mod value;

#[cfg(test)]
pub mod fake;

pub use lua::LuaEngine;
pub use value::CallValue;

use std::io;
use std::path::{Path, PathBuf};

/// Module execution failed before an API object could be produced.
///
/// Fatal: the process performs dirty cleanup and exits nonzero.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The module file could not be read at all.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The engine reported a syntax or runtime error while executing it.
    #[error("{0}")]
    Exec(String),
}

/// A dispatched call failed.
///
/// Recoverable: the error is returned to the caller and the engine stays
/// usable for further calls.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("no such function: {name}")]
    NoSuchFunction { name: String },
    /// The handle was never registered or has already been released.
    #[error("api handle is not registered")]
    UnknownHandle,
    /// The callable raised inside the engine.
    #[error("{name} raised: {message}")]
    Runtime { name: String, message: String },
    /// A result value falls outside the closed tag set.
    #[error("cannot marshal {type_name} value across the engine boundary")]
    UnsupportedType { type_name: &'static str },
    /// The engine itself misbehaved (anchor from a foreign state, allocation
    /// failure while converting arguments).
    #[error("engine failure: {0}")]
    Engine(String),
}

/// Narrow interface over an embedded scripting engine.
///
/// Implementations own the interpreter instance exclusively; dropping the
/// engine closes it. `Anchor` is a persistent reference into the engine's
/// object space that stays valid until handed back to
/// [`release`](ScriptEngine::release).
pub trait ScriptEngine {
    /// Persistent reference to an engine-managed object.
    type Anchor;

    /// Execute the module file and anchor its single result value.
    ///
    /// `Ok(None)` means the chunk ran to completion but did not evaluate to a
    /// registrable object. How fatal that is belongs to the caller.
    fn exec_module(&self, path: &Path) -> Result<Option<Self::Anchor>, LoadError>;

    /// Whether `name` is a callable entry of the anchored object.
    fn resolve(&self, anchor: &Self::Anchor, name: &str) -> Result<bool, CallError>;

    /// Invoke `name` on the anchored object, forwarding `args` in order and
    /// returning all results in order.
    fn invoke(
        &self,
        anchor: &Self::Anchor,
        name: &str,
        args: &[CallValue],
    ) -> Result<Vec<CallValue>, CallError>;

    /// Drop the anchor, making the underlying object collectable again.
    fn release(&self, anchor: Self::Anchor);
}
