//! Builtin visitors driven through the scenario runner.

use strictpy_harness::{
    Expectation, Mode, Outcome, ScenarioError, ScenarioMatrix, ScenarioRunner, Substitution,
    logging,
};
use strictpy_rules::violations::{complexity, consistency, naming};
use strictpy_rules::visitors::{indentation, module_name, numbers, tuple_unpack};
use strictpy_rules::Settings;
use strictpy_syntax::{PYTHON_GRAMMAR_VERSION, SourceNormalizer};

const WRONG_TUPLE: &str = "
    xy = (1,
          2, 3)
";

const CORRECT_TUPLE: &str = "
    xy = (
        1,
        2,
        3,
    )
";

const CALL_ARGUMENTS: &str = "
    def function():
        print({0},
              {1})
";

#[test]
fn hanging_collections_fail_once() {
    logging::init();
    let runner = ScenarioRunner::default();
    let matrix = ScenarioMatrix::new()
        .template("tuple", WRONG_TUPLE)
        .template("call", CALL_ARGUMENTS)
        .values("names", Substitution::new().arg("first").arg("second"));
    let expectation = Expectation::kinds(&[&consistency::PARAMETERS_INDENTATION]);

    let summary = runner
        .run(&matrix, indentation::build, &expectation)
        .into_result()
        .unwrap();
    assert_eq!(summary.passed(), 2);
}

#[test]
fn correct_collections_pass() {
    let matrix = ScenarioMatrix::new().template("tuple", CORRECT_TUPLE);
    ScenarioRunner::default()
        .run(&matrix, indentation::build, &Expectation::none())
        .into_result()
        .unwrap();
}

#[test]
fn tuple_unpack_in_every_mode() {
    let template = "
        def function(items):
            for {0} in items:
                {0} = items[0]
    ";
    let too_long = ScenarioMatrix::new()
        .template("loop", template)
        .values("five", Substitution::new().arg("a, b, c, d, e"))
        .modes(&[Mode::Regular, Mode::Async]);
    let within = ScenarioMatrix::new()
        .template("loop", template)
        .values("four", Substitution::new().arg("a, b, c, d"))
        .values("one", Substitution::new().arg("a"))
        .modes(&[Mode::Regular, Mode::Async]);

    let settings = Settings::default()
        .with_option("max_tuple_unpack_length", 4)
        .unwrap();
    let runner = ScenarioRunner::new(settings).unwrap();

    let expectation = Expectation::kinds(&[
        &complexity::TOO_LONG_TUPLE_UNPACK,
        &complexity::TOO_LONG_TUPLE_UNPACK,
    ])
    .with_text(5)
    .with_baseline(4)
    .multiple();
    let summary = runner
        .run(&too_long, tuple_unpack::build, &expectation)
        .into_result()
        .unwrap();
    assert_eq!(summary.passed(), 2);

    let summary = runner
        .run_parallel(&within, tuple_unpack::build, &Expectation::none())
        .into_result()
        .unwrap();
    assert_eq!(summary.passed(), 4);
}

#[test]
fn module_names() {
    let runner = ScenarioRunner::default();
    let empty = ScenarioMatrix::new().template("empty", "");

    let short = empty.clone().filename("a.py");
    let expectation = Expectation::kinds(&[&naming::TOO_SHORT_NAME]).with_text("a");
    runner
        .run(&short, module_name::build, &expectation)
        .into_result()
        .unwrap();

    let fine = empty.clone().filename("io.py");
    runner
        .run(&fine, module_name::build, &Expectation::none())
        .into_result()
        .unwrap();

    let stem = "c".repeat(60);
    let long = empty.filename(format!("{stem}.py"));
    let expectation = Expectation::kinds(&[&naming::TOO_LONG_NAME])
        .with_text(&stem)
        .with_baseline(45);
    runner
        .run(&long, module_name::build, &expectation)
        .into_result()
        .unwrap();
}

#[test]
fn every_failing_scenario_is_listed() {
    let matrix = ScenarioMatrix::new()
        .template("number", "x = {0}\n")
        .values("partial", Substitution::new().arg("1."))
        .values("fine", Substitution::new().arg("1.0"))
        .values("upper", Substitution::new().arg("1E5"));
    let summary = ScenarioRunner::default()
        .run_parallel(&matrix, numbers::build, &Expectation::none());

    let failed: Vec<&str> = summary.failed().map(|(id, _)| id).collect();
    assert_eq!(failed, ["number-partial-regular", "number-upper-regular"]);
    assert!(summary.failed().all(|(_, error)| matches!(error, ScenarioError::Assertion(_))));

    let failure = summary.into_result().unwrap_err();
    insta::assert_snapshot!(failure.to_string(), @r#"
    2 of 3 scenarios failed:
      number-partial-regular: expected 0 violations [], found 1 ["PartialFloatViolation"]
      number-upper-regular: expected 0 violations [], found 1 ["BadNumberSuffixViolation"]
    "#);
}

#[test]
fn ignored_kinds_do_not_count() {
    let matrix = ScenarioMatrix::new().template("mixed", "x = 1. + 0XFF\n");
    let expectation = Expectation::kinds(&[&consistency::BAD_NUMBER_SUFFIX])
        .ignoring(&[&consistency::PARTIAL_FLOAT]);
    ScenarioRunner::default()
        .run(&matrix, numbers::build, &expectation)
        .into_result()
        .unwrap();
}

#[test]
fn grammar_quirks_skip_instead_of_passing() {
    let matrix = ScenarioMatrix::new().template("broken", "x = (\n");

    let strict = ScenarioRunner::default()
        .run(&matrix, numbers::build, &Expectation::none());
    assert!(matches!(
        strict.reports[0].outcome,
        Outcome::Failed {
            error: ScenarioError::Syntax(_)
        }
    ));

    let lenient = ScenarioRunner::default()
        .with_normalizer(SourceNormalizer::new().with_quirk(PYTHON_GRAMMAR_VERSION, "known bug"))
        .run(&matrix, numbers::build, &Expectation::none());
    let skipped: Vec<_> = lenient.skipped().map(|(id, _)| id).collect();
    assert_eq!(skipped, ["broken-regular"]);
    assert_eq!(lenient.passed(), 0);
    assert!(lenient.into_result().is_ok());
}

#[test]
fn template_errors_fail_only_their_scenarios() {
    let matrix = ScenarioMatrix::new()
        .template("bad", "x = {missing}\n")
        .template("good", "x = 1\n");
    let summary = ScenarioRunner::default().run(&matrix, numbers::build, &Expectation::none());

    assert_eq!(summary.passed(), 1);
    let failed: Vec<_> = summary.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "bad-regular");
    assert!(matches!(failed[0].1, ScenarioError::Template { .. }));
}

#[test]
fn invalid_settings_are_rejected_before_any_scenario() {
    let settings = Settings {
        max_tuple_unpack_length: 0,
        ..Settings::default()
    };
    let err = ScenarioRunner::new(settings).err().unwrap();
    assert!(matches!(err, ScenarioError::Config(_)), "{err}");
}
