//! Engine state manager
//!
//! Owns the embedded engine for the lifetime of the process, loads the API
//! module into it, and validates that the module kept its side of the
//! contract: evaluating to exactly one object of callables.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::api::registry::{ApiHandle, HandleRegistry};
use crate::api::API_FUNCTIONS;
use crate::engine::{LoadError, LuaEngine, ScriptEngine};

/// Fatal initialization errors. No retry is attempted for either.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The module file did not execute to completion.
    #[error("failed to load API library from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    /// The module executed but did not evaluate to an API object.
    #[error("API library at {} didn't return an object", path.display())]
    Contract { path: PathBuf },
}

/// A failed boot: the typed error plus the still-open engine.
///
/// The engine comes back to the caller so the cleanup coordinator, not the
/// state manager, closes it via the dirty path. Constructing this type never
/// closes anything.
pub struct InitFailure<E: ScriptEngine> {
    pub error: InitError,
    pub engine: E,
}

impl<E: ScriptEngine> fmt::Debug for InitFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitFailure")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Owns the engine, the resolved module path, the handle registry, and the
/// single registered API handle.
///
/// A value of this type existing means the module loaded and passed
/// validation; failed initialization yields [`InitFailure`] instead. The
/// handle cannot outlive the engine because the registry holding its anchor
/// lives here, and the whole state is consumed exactly once at shutdown.
pub struct EngineState<E: ScriptEngine> {
    engine: E,
    api_path: PathBuf,
    registry: HandleRegistry<E::Anchor>,
    api: ApiHandle,
}

impl<E: ScriptEngine> EngineState<E> {
    /// Execute the module file in `engine` and validate its result.
    pub fn boot(engine: E, api_path: PathBuf) -> Result<Self, InitFailure<E>> {
        let anchor = match engine.exec_module(&api_path) {
            Ok(Some(anchor)) => anchor,
            Ok(None) => {
                return Err(InitFailure {
                    error: InitError::Contract { path: api_path },
                    engine,
                });
            }
            Err(source) => {
                return Err(InitFailure {
                    error: InitError::Load {
                        path: api_path,
                        source,
                    },
                    engine,
                });
            }
        };

        let mut registry = HandleRegistry::new();
        let api = registry.register(anchor);
        let state = Self {
            engine,
            api_path,
            registry,
            api,
        };
        state.probe_surface();
        Ok(state)
    }

    /// The registered API handle. Exactly one exists per state.
    pub fn api(&self) -> ApiHandle {
        self.api
    }

    /// The module path this state was booted from.
    pub fn api_path(&self) -> &Path {
        &self.api_path
    }

    /// Warn about expected entry points the module forgot to export.
    ///
    /// Not fatal: name resolution failure at call time is recoverable, so
    /// enforcement stays there.
    fn probe_surface(&self) {
        for name in API_FUNCTIONS {
            if self.resolve(self.api, name).is_err() {
                warn!(
                    "API library {} does not export {}()",
                    self.api_path.display(),
                    name
                );
            }
        }
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn anchor(&self, handle: ApiHandle) -> Option<&E::Anchor> {
        self.registry.get(handle)
    }

    /// Tear the state apart for shutdown: the engine plus whatever anchor
    /// was still registered.
    pub(crate) fn into_parts(self) -> (E, Option<E::Anchor>) {
        let Self {
            engine,
            mut registry,
            api,
            ..
        } = self;
        let anchor = registry.release(api);
        (engine, anchor)
    }
}

impl EngineState<LuaEngine> {
    /// Boot a fresh Lua interpreter with the module at `api_path`.
    pub fn initialize(api_path: impl Into<PathBuf>) -> Result<Self, InitFailure<LuaEngine>> {
        Self::boot(LuaEngine::new(), api_path.into())
    }
}

impl<E: ScriptEngine> fmt::Debug for EngineState<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineState")
            .field("api_path", &self.api_path)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
