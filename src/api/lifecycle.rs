// anidbsh - cleanup coordinator
// Copyright (C) 2025 anidbsh contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cleanup coordinator
//!
//! A process run moves `Uninitialized → Loading → {Ready | LoadFailed |
//! ContractFailed} → ShuttingDown → Terminated`. An [`EngineState`] value is
//! the `Ready` state; a failed boot hands the still-open engine back inside
//! an `InitFailure`. Both roads end here, and both close the engine exactly
//! once: each [`Teardown`] variant owns precisely the resources its path is
//! allowed to touch, so releasing a never-registered handle or closing the
//! engine twice is unrepresentable.

use tracing::debug;

use crate::api::state::EngineState;
use crate::api::API_EXIT;
use crate::engine::ScriptEngine;

/// Which teardown path to take, carrying the resources that path owns.
pub enum Teardown<E: ScriptEngine> {
    /// Notify the module, release the registered handle, then close the
    /// engine.
    Graceful(EngineState<E>),
    /// Close the engine without a handle-release step; nothing was ever
    /// registered.
    Dirty(E),
}

/// Run the requested teardown and hand `exitcode` back unchanged.
///
/// Cleanup is never a source of its own exit status.
pub fn shutdown<E: ScriptEngine>(path: Teardown<E>, exitcode: i32) -> i32 {
    match path {
        Teardown::Graceful(state) => {
            // The module gets a chance to say goodbye; one without an exit()
            // or one that raises does not change the outcome.
            if let Err(e) = state.call(state.api(), API_EXIT, &[]) {
                debug!("exit notification skipped: {e}");
            }
            let (engine, anchor) = state.into_parts();
            if let Some(anchor) = anchor {
                engine.release(anchor);
            }
            drop(engine);
        }
        Teardown::Dirty(engine) => drop(engine),
    }
    exitcode
}
