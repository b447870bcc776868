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

//! Render report generation.
//!
//! Every global binding is flattened into `RenderedElem`s: lists
//! recurse, instances with a `render` method contribute its result and
//! everything else contributes nothing. The textual report groups the
//! elements by binding name:
//!
//! ```text
//! {"light": [{"position": {"x": 0, "y": 0}, "color": "yellow"}], "GRID_SIZE": 16}
//! ```

use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::error::{AutumnError, Result};
use crate::interpreter::calls::{Callable, Method};
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub x: i64,
    pub y: i64,
    pub color: String,
}

/// Typed form of one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFrame {
    pub groups: Vec<(String, Vec<RenderedCell>)>,
    pub grid_size: i64,
}

impl RenderFrame {
    pub fn cell_count(&self) -> usize {
        self.groups.iter().map(|(_, cells)| cells.len()).sum()
    }

    /// The report string handed to renderers.
    pub fn to_report(&self) -> String {
        let mut out = String::from("{");
        for (name, cells) in &self.groups {
            out.push_str(&quote(name));
            out.push_str(": [");
            let cells: Vec<String> = cells
                .iter()
                .map(|c| {
                    format!(
                        "{{\"position\": {{\"x\": {}, \"y\": {}}}, \"color\": {}}}",
                        c.x,
                        c.y,
                        quote(&c.color)
                    )
                })
                .collect();
            out.push_str(&cells.join(", "));
            out.push_str("], ");
        }
        out.push_str(&format!("\"GRID_SIZE\": {}}}", self.grid_size));
        out
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

impl Interpreter {
    /// Renders every binding, records occupied positions and caches the
    /// flat element list in `cacheRendered`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn render_frame(&mut self) -> Result<RenderFrame> {
        let globals = self.globals.clone();
        globals.borrow_mut().clear_occupied();

        let mut groups = Vec::new();
        let mut all = Vec::new();

        for name in self.render_order() {
            let value = match Environment::get(&globals, &name) {
                Some(value) => value,
                None => continue,
            };
            let elems = self
                .render_value(&value, &globals)
                .map_err(|e| e.with_context(format!("rendering {}", name)))?;
            if elems.is_empty() {
                continue;
            }

            let mut cells = Vec::with_capacity(elems.len());
            for elem in &elems {
                let cell = rendered_cell(elem)?;
                globals.borrow_mut().occupy(cell.x, cell.y);
                cells.push(cell);
            }
            all.extend(elems);
            groups.push((name, cells));
        }

        Environment::assign(&globals, "cacheRendered", Value::list(all))?;

        let frame = RenderFrame {
            groups,
            grid_size: self.grid_size(),
        };
        tracing::debug!(cells = frame.cell_count(), "rendered frame");
        Ok(frame)
    }

    pub fn render_all(&mut self) -> Result<String> {
        Ok(self.render_frame()?.to_report())
    }

    /// Reactive bindings in declaration order, then remaining globals in
    /// definition order.
    fn render_order(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.reactive
            .init_order
            .iter()
            .cloned()
            .chain(self.globals.borrow().definition_order())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Flattens a value into its `RenderedElem` instances.
    pub(crate) fn render_value(&mut self, value: &Value, env: &Env) -> Result<Vec<Value>> {
        if let Some(items) = value.as_list() {
            let mut out = Vec::new();
            for item in items {
                out.extend(self.render_value(item, env)?);
            }
            return Ok(out);
        }

        let instance = match value.as_instance() {
            Some(instance) => instance,
            None => return Ok(Vec::new()),
        };
        let render = match instance.class().method("render") {
            Some(render) => render.clone(),
            None => return Ok(Vec::new()),
        };

        let method: Rc<dyn Callable> = Rc::new(Method {
            receiver: value.clone(),
            callable: render,
        });
        let produced = self.invoke(&method, env, Vec::new(), Span::synthetic())?;
        match produced.as_list() {
            Some(items) => Ok(items.to_vec()),
            None => Err(AutumnError::runtime_error(
                format!("render of {} must return a list, got {}", instance.class_name(), produced),
                Span::synthetic(),
            )),
        }
    }
}

/// Reads `RenderedElem{position: Position{x, y}, color}`.
pub(crate) fn rendered_cell(elem: &Value) -> Result<RenderedCell> {
    let malformed = || {
        AutumnError::runtime_error(
            format!("expected a RenderedElem, got {}", elem),
            Span::synthetic(),
        )
    };

    let instance = elem.as_instance().ok_or_else(malformed)?;
    let position = instance.field("position").ok_or_else(malformed)?;
    let position = position.as_instance().ok_or_else(malformed)?;
    let x = position.field("x").and_then(|v| v.as_number()).ok_or_else(malformed)?;
    let y = position.field("y").and_then(|v| v.as_number()).ok_or_else(malformed)?;
    let color = instance
        .field("color")
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(malformed)?;

    Ok(RenderedCell { x, y, color })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_groups_cells_by_name() {
        let frame = RenderFrame {
            groups: vec![
                (
                    "a".to_string(),
                    vec![
                        RenderedCell { x: 0, y: 1, color: "red".to_string() },
                        RenderedCell { x: 2, y: 3, color: "blue".to_string() },
                    ],
                ),
                ("b".to_string(), vec![RenderedCell { x: 5, y: 5, color: "gray".to_string() }]),
            ],
            grid_size: 8,
        };

        assert_eq!(
            frame.to_report(),
            "{\"a\": [{\"position\": {\"x\": 0, \"y\": 1}, \"color\": \"red\"}, \
             {\"position\": {\"x\": 2, \"y\": 3}, \"color\": \"blue\"}], \
             \"b\": [{\"position\": {\"x\": 5, \"y\": 5}, \"color\": \"gray\"}], \
             \"GRID_SIZE\": 8}"
        );
        assert_eq!(frame.cell_count(), 3);
    }

    #[test]
    fn empty_frame_only_reports_grid_size() {
        let frame = RenderFrame {
            groups: Vec::new(),
            grid_size: 16,
        };
        assert_eq!(frame.to_report(), "{\"GRID_SIZE\": 16}");
    }
}
