//! Call dispatcher
//!
//! Named, order-preserving calls into the API object. Everything here is
//! safely repeatable: errors come back as values and the engine state stays
//! valid for the next call.

use crate::api::registry::ApiHandle;
use crate::api::state::EngineState;
use crate::engine::{CallError, CallValue, ScriptEngine};

impl<E: ScriptEngine> EngineState<E> {
    /// Check that `name` resolves to a callable entry of the handle's
    /// object.
    pub fn resolve(&self, handle: ApiHandle, name: &str) -> Result<(), CallError> {
        let anchor = self.anchor(handle).ok_or(CallError::UnknownHandle)?;
        if self.engine().resolve(anchor, name)? {
            Ok(())
        } else {
            Err(CallError::NoSuchFunction {
                name: name.to_string(),
            })
        }
    }

    /// Call `name` on the handle's object.
    ///
    /// Arguments are forwarded in order and count; results come back the
    /// same way, or the whole call fails. Partial results are never
    /// exposed.
    pub fn call(
        &self,
        handle: ApiHandle,
        name: &str,
        args: &[CallValue],
    ) -> Result<Vec<CallValue>, CallError> {
        let anchor = self.anchor(handle).ok_or(CallError::UnknownHandle)?;
        self.engine().invoke(anchor, name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::lifecycle::{shutdown, Teardown};
    use crate::engine::fake::{echo_object, FakeEngine, FakeFn, ModuleScript};
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fake_state(script: ModuleScript) -> EngineState<FakeEngine> {
        EngineState::boot(FakeEngine::new(script), PathBuf::from("fake.lua")).unwrap()
    }

    #[test]
    fn test_unknown_handle() {
        let state = fake_state(echo_object(&["search"]));
        let err = state.call(ApiHandle(99), "search", &[]).unwrap_err();
        assert!(matches!(err, CallError::UnknownHandle));
    }

    #[test]
    fn test_missing_name_is_recoverable() {
        let state = fake_state(echo_object(&["search"]));
        let err = state.call(state.api(), "nonexistent", &[]).unwrap_err();
        assert!(matches!(err, CallError::NoSuchFunction { .. }));

        // The state is still usable afterwards.
        let results = state
            .call(state.api(), "search", &[CallValue::Str("bob".into())])
            .unwrap();
        assert_eq!(results, vec![CallValue::Str("bob".into())]);
    }

    #[test]
    fn test_runtime_error_is_returned_as_value() {
        let mut functions: HashMap<String, FakeFn> = HashMap::new();
        functions.insert(
            "search".to_string(),
            Box::new(|_: &[CallValue]| Err("backend unreachable".to_string())),
        );
        let state = fake_state(ModuleScript::Object(functions));

        let err = state.call(state.api(), "search", &[]).unwrap_err();
        let CallError::Runtime { name, message } = err else {
            panic!("expected runtime error");
        };
        assert_eq!(name, "search");
        assert_eq!(message, "backend unreachable");
    }

    #[test]
    fn test_resolve_probes_without_invoking() {
        let state = fake_state(echo_object(&["search"]));
        assert!(state.resolve(state.api(), "search").is_ok());
        assert!(matches!(
            state.resolve(state.api(), "info").unwrap_err(),
            CallError::NoSuchFunction { .. }
        ));
        assert!(matches!(
            state.resolve(ApiHandle(99), "search").unwrap_err(),
            CallError::UnknownHandle
        ));
    }

    #[test]
    fn test_end_to_end_against_lua() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("http.lua");
        fs::write(
            &path,
            r#"
local api = {}
function api.init() end
function api.exit() end
function api.search(term) return term end
function api.info(aid) return aid end
return api
"#,
        )
        .unwrap();

        let state = EngineState::initialize(path).unwrap();

        let results = state
            .call(state.api(), "search", &[CallValue::Str("bob".into())])
            .unwrap();
        assert_eq!(results, vec![CallValue::Str("bob".into())]);

        let err = state.call(state.api(), "nonexistent", &[]).unwrap_err();
        assert!(matches!(err, CallError::NoSuchFunction { .. }));

        // A failed lookup does not poison the state.
        let results = state
            .call(state.api(), "info", &[CallValue::Int(17)])
            .unwrap();
        assert_eq!(results, vec![CallValue::Int(17)]);

        assert_eq!(shutdown(Teardown::Graceful(state), 0), 0);
    }
}
