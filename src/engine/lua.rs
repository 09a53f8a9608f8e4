// anidbsh - Lua engine backend
// Copyright (C) 2025 anidbsh contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Lua 5.4 backend for the [`ScriptEngine`] trait.

use std::fs;
use std::path::Path;

use mlua::{Lua, MultiValue, RegistryKey, Table, Value};
use tracing::debug;

use crate::engine::{CallError, CallValue, LoadError, ScriptEngine};

/// [`ScriptEngine`] backed by an embedded Lua 5.4 interpreter.
///
/// The `Lua` state is owned exclusively; dropping the engine closes it.
/// Anchors are Lua registry keys, the engine-side equivalent of a strong
/// reference: the anchored table is not collectable until the key is removed.
pub struct LuaEngine {
    lua: Lua,
}

impl LuaEngine {
    /// Create a fresh interpreter with the standard libraries loaded.
    pub fn new() -> Self {
        Self { lua: Lua::new() }
    }

    fn api_table(&self, anchor: &RegistryKey) -> Result<Table, CallError> {
        self.lua
            .registry_value(anchor)
            .map_err(|e| CallError::Engine(e.to_string()))
    }

    fn to_lua(&self, value: &CallValue) -> mlua::Result<Value> {
        Ok(match value {
            CallValue::Int(i) => Value::Integer(*i),
            CallValue::Float(n) => Value::Number(*n),
            CallValue::Str(s) => Value::String(self.lua.create_string(s)?),
            CallValue::Bool(b) => Value::Boolean(*b),
            CallValue::Seq(items) => {
                let table = self.lua.create_table_with_capacity(items.len(), 0)?;
                for item in items {
                    table.push(self.to_lua(item)?)?;
                }
                Value::Table(table)
            }
        })
    }
}

impl Default for LuaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptEngine for LuaEngine {
    type Anchor = RegistryKey;

    fn exec_module(&self, path: &Path) -> Result<Option<RegistryKey>, LoadError> {
        let source = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let result = self
            .lua
            .load(&source)
            .set_name(format!("@{}", path.display()))
            .eval::<Value>()
            .map_err(|e| LoadError::Exec(e.to_string()))?;

        match result {
            Value::Table(table) => {
                let key = self
                    .lua
                    .create_registry_value(table)
                    .map_err(|e| LoadError::Exec(e.to_string()))?;
                Ok(Some(key))
            }
            // nil, a bare scalar, a function: nothing usable as an API
            // object.
            _ => Ok(None),
        }
    }

    fn resolve(&self, anchor: &RegistryKey, name: &str) -> Result<bool, CallError> {
        let entry: Value = self
            .api_table(anchor)?
            .get(name)
            .map_err(|e| CallError::Engine(e.to_string()))?;
        Ok(matches!(entry, Value::Function(_)))
    }

    fn invoke(
        &self,
        anchor: &RegistryKey,
        name: &str,
        args: &[CallValue],
    ) -> Result<Vec<CallValue>, CallError> {
        let entry: Value = self
            .api_table(anchor)?
            .get(name)
            .map_err(|e| CallError::Engine(e.to_string()))?;
        let Value::Function(func) = entry else {
            return Err(CallError::NoSuchFunction {
                name: name.to_string(),
            });
        };

        let mut lua_args = Vec::with_capacity(args.len());
        for arg in args {
            lua_args.push(
                self.to_lua(arg)
                    .map_err(|e| CallError::Engine(e.to_string()))?,
            );
        }

        // mlua unwinds the interpreter stack on both success and error
        // returns.
        let results = func
            .call::<MultiValue>(MultiValue::from_vec(lua_args))
            .map_err(|e| CallError::Runtime {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        results.into_vec().into_iter().map(from_lua).collect()
    }

    fn release(&self, anchor: RegistryKey) {
        // Failure here means the key belongs to another state; nothing left
        // to do with it either way.
        if let Err(e) = self.lua.remove_registry_value(anchor) {
            debug!("discarding foreign registry key: {e}");
        }
    }
}

fn from_lua(value: Value) -> Result<CallValue, CallError> {
    match value {
        Value::Integer(i) => Ok(CallValue::Int(i)),
        Value::Number(n) => Ok(CallValue::Float(n)),
        Value::String(s) => Ok(CallValue::Str(s.to_string_lossy().into())),
        Value::Boolean(b) => Ok(CallValue::Bool(b)),
        Value::Table(table) => {
            let mut items = Vec::new();
            for entry in table.sequence_values::<Value>() {
                let entry = entry.map_err(|e| CallError::Engine(e.to_string()))?;
                items.push(from_lua(entry)?);
            }
            Ok(CallValue::Seq(items))
        }
        other => Err(CallError::UnsupportedType {
            type_name: other.type_name(),
        }),
    }
}
