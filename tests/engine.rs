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

use autumn::{EngineConfig, Interpreter, Value};
use pretty_assertions::assert_eq;

const LIGHT: &str = r#"
(program
  (= GRID_SIZE 16)
  (object Light (: on Bool) (Cell 0 0 (if on then "yellow" else "gray")))
  (= light (initnext (Light true (Position 0 0)) (prev light)))
  (on (clicked light) (= light (updateObj light "on" (! (.. light on)))))
)
"#;

fn started(program: &str) -> Interpreter {
    let mut interp = Interpreter::new();
    interp.start_source(program, "", "", 0).expect("program starts");
    interp
}

#[test]
fn light_renders_in_report_format() {
    let mut interp = started(LIGHT);
    assert_eq!(
        interp.render_all().unwrap(),
        r#"{"light": [{"position": {"x": 0, "y": 0}, "color": "yellow"}], "GRID_SIZE": 16}"#
    );
}

#[test]
fn clicking_the_light_toggles_it() {
    let mut interp = started(LIGHT);

    interp.click(0, 0);
    interp.step().unwrap();
    assert_eq!(
        interp.render_all().unwrap(),
        r#"{"light": [{"position": {"x": 0, "y": 0}, "color": "gray"}], "GRID_SIZE": 16}"#
    );

    // No click: next value is the previous light.
    interp.step().unwrap();
    assert!(interp.render_all().unwrap().contains("gray"));
    assert_eq!(interp.covered_on_clause_count(), 1);
}

#[test]
fn clicks_elsewhere_leave_the_light_alone() {
    let mut interp = started(LIGHT);
    interp.click(5, 5);
    interp.step().unwrap();
    assert!(interp.render_all().unwrap().contains("yellow"));
    assert_eq!(interp.covered_on_clause_count(), 0);
}

#[test]
fn initnext_advances_from_prev() {
    let mut interp = started("(= x (initnext 5 (+ (prev x) 1)))");
    assert_eq!(interp.evaluate_to_string("x").unwrap(), "(5: N)");
    interp.step().unwrap();
    assert_eq!(interp.evaluate_to_string("x").unwrap(), "(6: N)");
    assert_eq!(interp.step_count(), 1);
}

#[test]
fn on_clause_assignment_suppresses_next() {
    let mut interp = started(
        r#"
        (= x (initnext 0 (+ x 1)))
        (on (== x 0) (= x 10))
        "#,
    );

    interp.step().unwrap();
    assert_eq!(interp.evaluate_to_string("x").unwrap(), "(10: N)");

    interp.step().unwrap();
    assert_eq!(interp.evaluate_to_string("x").unwrap(), "(11: N)");
}

#[test]
fn coverage_only_grows() {
    let mut interp = started(
        r#"
        (= t (initnext 0 (+ t 1)))
        (on (== t 1) (= hit true))
        (on (== t 100) (= never true))
        "#,
    );

    let mut last = 0;
    for _ in 0..4 {
        interp.step().unwrap();
        let covered = interp.covered_on_clause_count();
        assert!(covered >= last);
        assert!(covered <= interp.on_clause_count());
        last = covered;
    }
    assert_eq!(last, 1);
    assert_eq!(interp.on_clause_count(), 2);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    let mut interp = started("");
    let err = interp.evaluate_to_string("(/ 1 0)").unwrap_err();
    assert_eq!(err.code(), "E_RUNTIME");
    assert_eq!(err.message, "Division by zero");
}

#[test]
fn prev_before_first_step_is_an_error() {
    let mut interp = started("(= x (initnext 1 x))");
    let err = interp.evaluate_to_string("(prev x)").unwrap_err();
    assert!(err.message.contains("before the first step"));
}

#[test]
fn clone_shares_and_duplicate_copies() {
    let list = Value::list(vec![Value::number(1), Value::number(2)]);

    let shared = list.clone();
    assert_eq!(shared.id(), list.id());

    let copy = list.duplicate();
    assert!(copy.id() != list.id());
    assert!(copy.is_equal(&list));

    let snapshot = list.snapshot();
    assert_eq!(snapshot.id(), list.id());
}

#[test]
fn trigger_flag_follows_the_condition() {
    let mut interp = Interpreter::new();
    interp
        .start_source("(= n (initnext 0 (+ n 1)))", "", "(== n 1)", 0)
        .unwrap();
    assert!(!interp.trigger_state());

    interp.step().unwrap();
    assert!(!interp.trigger_state());

    interp.step().unwrap();
    assert!(interp.trigger_state());
}

#[test]
fn prelude_can_be_overridden() {
    let mut interp = Interpreter::new();
    interp
        .start_source("(= y (twice 4))", "(= twice (--> v (* v 2)))", "", 0)
        .unwrap();
    assert_eq!(interp.evaluate_to_string("y").unwrap(), "(8: N)");
    assert!(interp.evaluate_to_string("moveLeft").is_err());
}

#[test]
fn reload_restarts_from_the_initial_state() {
    let mut interp = started("(= x (initnext 0 (+ x 1)))");
    interp.step().unwrap();
    interp.step().unwrap();

    let program = autumn::parse_program("(= x (initnext 0 (+ x 1)))").unwrap();
    interp.reload_code(&program, "", "").unwrap();
    assert_eq!(interp.evaluate_to_string("x").unwrap(), "(0: N)");
    assert_eq!(interp.step_count(), 0);
}

#[test]
fn configuration_drives_defaults() {
    let config = EngineConfig::from_json_str(r#"{"default_background": "white"}"#).unwrap();
    let mut interp = Interpreter::with_config(config);
    interp.start_source("", "", "", 0).unwrap();
    assert_eq!(interp.background(), "white");

    interp.evaluate_to_string("(= background \"blue\")").unwrap();
    assert_eq!(interp.background(), "blue");
}
