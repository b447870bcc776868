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

use crate::interpreter::Interpreter;

/// One-shot input flags set by the host between steps and cleared at
/// the end of every `step`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub click: Option<(i64, i64)>,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn reset(&mut self) {
        *self = InputState::default();
    }
}

impl Interpreter {
    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn click(&mut self, x: i64, y: i64) {
        tracing::trace!(x, y, "click");
        self.input.click = Some((x, y));
    }

    pub fn push_left(&mut self) {
        self.input.left = true;
    }

    pub fn push_right(&mut self) {
        self.input.right = true;
    }

    pub fn push_up(&mut self) {
        self.input.up = true;
    }

    pub fn push_down(&mut self) {
        self.input.down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_every_flag() {
        let mut interp = Interpreter::new();
        interp.click(3, 4);
        interp.push_left();
        interp.push_down();
        assert_eq!(interp.input().click, Some((3, 4)));

        interp.input.reset();
        assert_eq!(*interp.input(), InputState::default());
    }
}
