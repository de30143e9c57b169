// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging bootstrap for binaries and tests.

use env_logger::{Builder, Env};

/// Installs `env_logger` as the `log` backend.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies (for example
/// `"info"` or `"tessera_lanes=debug"`). Calling this more than once is harmless:
/// later calls leave the first logger in place.
pub fn init_logging(default_filter: &str) {
    let installed = Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok();
    if installed {
        log::debug!("Logging initialised with default filter '{default_filter}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logging("warn");
        init_logging("trace");
        log::info!("still logging");
    }
}
