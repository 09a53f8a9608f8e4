/*
 * anidbsh - AniDB command interpreter
 * Copyright (C) 2025 anidbsh contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

use std::process;

use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;

use anidbsh::api::{API_INFO, API_INIT, API_SEARCH};
use anidbsh::config::{self, Cli, EXIT_FAILURE, EXIT_SUCCESS};
use anidbsh::{shutdown, CallValue, EngineState, ScriptEngine, Teardown};

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let args = Cli::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let api_path = config::resolve_api_path(args.api_path.as_deref());
    info!("Loading API library from {}", api_path.display());

    let state = match EngineState::initialize(api_path) {
        Ok(state) => state,
        Err(failure) => {
            eprintln!("{}", failure.error);
            return shutdown(Teardown::Dirty(failure.engine), EXIT_FAILURE);
        }
    };

    // The module may want to set itself up before taking queries.
    if let Err(e) = state.call(state.api(), API_INIT, &[]) {
        warn!("API init skipped: {e}");
    }

    let mut exitcode = EXIT_SUCCESS;

    if let Some(term) = &args.search {
        exitcode = dispatch_one(&state, API_SEARCH, &[CallValue::Str(term.clone())]);
    }
    if exitcode == EXIT_SUCCESS {
        if let Some(aid) = args.info {
            exitcode = dispatch_one(&state, API_INFO, &[CallValue::Int(aid)]);
        }
    }

    shutdown(Teardown::Graceful(state), exitcode)
}

/// Run one dispatcher call and print whatever came back, one value per line.
fn dispatch_one<E: ScriptEngine>(state: &EngineState<E>, name: &str, args: &[CallValue]) -> i32 {
    match state.call(state.api(), name, args) {
        Ok(results) => {
            for value in results {
                println!("{value}");
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            EXIT_FAILURE
        }
    }
}
