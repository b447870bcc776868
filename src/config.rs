/*
 * ==========================================================================
 * AUTUMN - Reactive Grid Runtime
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the AUTUMN runtime project.
 *
 * AUTUMN is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AutumnError, Result};
use crate::span::Span;

/// Engine tunables. Every field has a default, so a partial JSON document
/// such as `{"verbose": true}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log stdlib loading and initializer failures at `warn`.
    pub verbose: bool,

    /// Lists at least this long may be mapped on the rayon pool.
    pub parallel_map_threshold: usize,

    /// Smallest slice handed to a single parallel task.
    pub parallel_chunk_size: usize,

    /// Grid size reported when a program never binds `GRID_SIZE`.
    pub default_grid_size: i64,

    pub default_frame_rate: i64,

    pub default_background: String,

    /// Prelude file used when `start` gets an empty stdlib override.
    pub stdlib_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            parallel_map_threshold: 10_000,
            parallel_chunk_size: 32,
            default_grid_size: 16,
            default_frame_rate: 16,
            default_background: "black".to_string(),
            stdlib_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| {
            AutumnError::parse_error(
                format!("invalid engine configuration: {}", err),
                Span::new(err.line(), err.column().saturating_sub(1)),
            )
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            AutumnError::runtime_error(
                format!("cannot read configuration {}: {}", path.display(), err),
                Span::synthetic(),
            )
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let config = EngineConfig::from_json_str(r#"{"verbose": true, "parallel_map_threshold": 64}"#)
            .expect("valid config");

        assert_eq!(
            config,
            EngineConfig {
                verbose: true,
                parallel_map_threshold: 64,
                ..EngineConfig::default()
            }
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EngineConfig::from_json_str("{ verbose: ").unwrap_err();
        assert_eq!(err.code(), "E_PARSE");
    }
}
