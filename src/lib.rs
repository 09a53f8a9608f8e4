//! # anidbsh
//!
//! AniDB command interpreter host. Embeds a Lua interpreter, loads a
//! user-supplied API module (a file evaluating to a table with `init`,
//! `exit`, `search`, `info`), and dispatches named calls into it with typed,
//! order-preserving argument marshaling.
//!
//! The module itself is an opaque collaborator that owns all protocol and
//! network behavior. This crate owns the engine lifecycle around it:
//! load-and-validate, handle registration, call dispatch, and deterministic
//! two-path teardown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use anidbsh::{shutdown, CallValue, EngineState, Teardown};
//!
//! fn main() {
//!     let state = match EngineState::initialize("../api/http.lua") {
//!         Ok(state) => state,
//!         Err(failure) => {
//!             eprintln!("{}", failure.error);
//!             std::process::exit(shutdown(Teardown::Dirty(failure.engine), 1));
//!         }
//!     };
//!
//!     match state.call(state.api(), "search", &[CallValue::Str("bob".into())]) {
//!         Ok(results) => println!("{results:?}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//!
//!     std::process::exit(shutdown(Teardown::Graceful(state), 0));
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;

// Re-export commonly used types for convenience
pub use api::{shutdown, ApiHandle, EngineState, HandleRegistry, InitError, InitFailure, Teardown};
pub use engine::{CallError, CallValue, LoadError, LuaEngine, ScriptEngine};
