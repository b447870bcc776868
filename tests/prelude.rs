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

use autumn::Interpreter;
use pretty_assertions::assert_eq;

fn started(program: &str) -> Interpreter {
    let mut interp = Interpreter::new();
    interp.start_source(program, "", "", 0).expect("program starts");
    interp
}

#[test]
fn move_right_shifts_the_origin() {
    let mut interp = started(
        r#"
        (object Dot (Cell 0 0 "red"))
        (= d (initnext (Dot (Position 1 1)) (moveRight (prev d))))
        "#,
    );
    interp.step().unwrap();
    assert_eq!(
        interp.render_all().unwrap(),
        r#"{"d": [{"position": {"x": 2, "y": 1}, "color": "red"}], "GRID_SIZE": 16}"#
    );
}

#[test]
fn collisions_block_movement() {
    let mut interp = started(
        r#"
        (object Dot (Cell 0 0 "red"))
        (object Wall (Cell 0 0 "gray"))
        (= wall (Wall (Position 3 1)))
        (= blocked (initnext (Dot (Position 2 1)) (moveRightNoCollision (prev blocked))))
        (= free (initnext (Dot (Position 0 5)) (moveRightNoCollision (prev free))))
        "#,
    );
    interp.step().unwrap();

    assert_eq!(interp.evaluate_to_string("(.. (.. blocked origin) x)").unwrap(), "(2: N)");
    assert_eq!(interp.evaluate_to_string("(.. (.. free origin) x)").unwrap(), "(1: N)");
}

#[test]
fn the_grid_edge_blocks_movement() {
    let mut interp = started(
        r#"
        (object Dot (Cell 0 0 "red"))
        (= d (initnext (Dot (Position 0 0)) (moveLeftNoCollision (prev d))))
        "#,
    );
    interp.step().unwrap();
    assert_eq!(interp.evaluate_to_string("(.. (.. d origin) x)").unwrap(), "(0: N)");
}

#[test]
fn position_helpers() {
    let mut interp = started("");
    assert_eq!(
        interp
            .evaluate_to_string("(.. (addPositions (Position 1 2) (Position 3 4)) y)")
            .unwrap(),
        "(6: N)"
    );
    assert_eq!(
        interp
            .evaluate_to_string("(.. (displacement (Position 1 2) (Position 4 0)) x)")
            .unwrap(),
        "(3: N)"
    );
}

#[test]
fn arrow_keys_drive_on_clauses() {
    let mut interp = started(
        r#"
        (object Dot (Cell 0 0 "blue"))
        (= d (initnext (Dot (Position 5 5)) (prev d)))
        (on left (= d (moveLeft (prev d))))
        (on down (= d (moveDown (prev d))))
        "#,
    );

    interp.push_left();
    interp.step().unwrap();
    interp.push_down();
    interp.step().unwrap();

    assert_eq!(
        interp.render_all().unwrap(),
        r#"{"d": [{"position": {"x": 4, "y": 6}, "color": "blue"}], "GRID_SIZE": 16}"#
    );
    assert_eq!(interp.covered_on_clause_count(), 2);
}
