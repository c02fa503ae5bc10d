use super::{match_expr, profile_fields};
use crate::{
    evaluator::Evaluator,
    expr::{
        EvalError, Expr, Limits, MatchOperator, ValidateError, evaluate, validate,
    },
    model::{FieldModel, FieldType},
    scalar::Scalar,
    schema::{FieldConfiguration, FieldConfigurations, field_configurations},
    traits::{Evaluable, Filterable},
    value::Value,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

fn profile_datum() -> Value {
    Value::record([
        ("name", Value::from("alice")),
        ("age", Value::Int32(30)),
        ("tags", Value::from(vec!["red", "green", "blue"])),
        ("meta", Value::map([("env", "prod")])),
        (
            "users",
            Value::List(vec![
                Value::record([("name", "a")]),
                Value::record([("name", "b")]),
            ]),
        ),
    ])
}

fn eval_expr(mut expr: Expr, datum: &Value) -> Result<bool, EvalError> {
    let fields = profile_fields();
    validate(&fields, &mut expr, &Limits::default()).expect("expression should validate");
    evaluate(&expr, &fields, datum)
}

fn assert_matches(expr: Expr, datum: &Value, expected: bool) {
    assert_eq!(eval_expr(expr, datum).unwrap(), expected);
}

#[test]
fn equality_and_conjunction_match() {
    let expr = match_expr(&["name"], MatchOperator::Equal, Some("alice"))
        & match_expr(&["age"], MatchOperator::NotEqual, Some("40"));

    assert_matches(expr, &profile_datum(), true);
}

#[test]
fn equality_observes_the_scalar_kind() {
    assert_matches(
        match_expr(&["age"], MatchOperator::Equal, Some("30")),
        &profile_datum(),
        true,
    );
    assert_matches(
        match_expr(&["age"], MatchOperator::Equal, Some("31")),
        &profile_datum(),
        false,
    );
}

#[test]
fn list_membership_tests_element_equality() {
    assert_matches(
        match_expr(&["tags"], MatchOperator::In, Some("green")),
        &profile_datum(),
        true,
    );
    assert_matches(
        match_expr(&["tags"], MatchOperator::In, Some("yellow")),
        &profile_datum(),
        false,
    );
    assert_matches(
        match_expr(&["tags"], MatchOperator::NotIn, Some("yellow")),
        &profile_datum(),
        true,
    );
}

#[test]
fn text_membership_tests_substring_containment() {
    assert_matches(
        match_expr(&["name"], MatchOperator::In, Some("lic")),
        &profile_datum(),
        true,
    );
    assert_matches(
        match_expr(&["name"], MatchOperator::NotIn, Some("bob")),
        &profile_datum(),
        true,
    );
}

#[test]
fn map_membership_tests_key_presence() {
    assert_matches(
        match_expr(&["meta"], MatchOperator::In, Some("env")),
        &profile_datum(),
        true,
    );
    assert_matches(
        match_expr(&["meta"], MatchOperator::In, Some("region")),
        &profile_datum(),
        false,
    );
}

#[test]
fn map_values_match_through_the_wildcard() {
    assert_matches(
        match_expr(&["meta", "env"], MatchOperator::Equal, Some("prod")),
        &profile_datum(),
        true,
    );
    assert_matches(
        match_expr(&["meta", "env"], MatchOperator::NotEqual, Some("prod")),
        &profile_datum(),
        false,
    );
}

#[test]
fn absent_map_keys_answer_by_the_defaulted_table() {
    let datum = profile_datum();
    let cases = [
        (MatchOperator::Equal, Some("x"), false),
        (MatchOperator::NotEqual, Some("x"), true),
        (MatchOperator::In, Some("x"), false),
        (MatchOperator::NotIn, Some("x"), true),
        (MatchOperator::IsEmpty, None, true),
        (MatchOperator::IsNotEmpty, None, false),
    ];

    for (op, raw, expected) in cases {
        let verdict = eval_expr(match_expr(&["meta", "missing"], op, raw), &datum).unwrap();
        assert_eq!(verdict, expected, "operator {op}");
    }
}

#[test]
fn present_nil_map_values_collapse_into_the_absent_answer() {
    let datum = Value::record([("meta", Value::map([("env", Value::Null)]))]);

    assert_matches(
        match_expr(&["meta", "env"], MatchOperator::Equal, Some("prod")),
        &datum,
        false,
    );
    assert_matches(
        match_expr(&["meta", "env"], MatchOperator::NotEqual, Some("prod")),
        &datum,
        true,
    );
}

#[test]
fn selectors_descend_lists_existentially() {
    assert_matches(
        match_expr(&["users", "name"], MatchOperator::Equal, Some("b")),
        &profile_datum(),
        true,
    );
    assert_matches(
        match_expr(&["users", "name"], MatchOperator::Equal, Some("c")),
        &profile_datum(),
        false,
    );
}

#[test]
fn emptiness_operators_observe_length() {
    let datum = Value::record([
        ("name", Value::from("")),
        ("age", Value::Int32(0)),
        ("tags", Value::List(Vec::new())),
        ("meta", Value::Map(Vec::new())),
        ("users", Value::List(Vec::new())),
    ]);

    assert_matches(
        match_expr(&["tags"], MatchOperator::IsEmpty, None),
        &datum,
        true,
    );
    assert_matches(
        match_expr(&["tags"], MatchOperator::IsNotEmpty, None),
        &datum,
        false,
    );
    assert_matches(
        match_expr(&["meta"], MatchOperator::IsEmpty, None),
        &datum,
        true,
    );
    assert_matches(
        match_expr(&["name"], MatchOperator::IsEmpty, None),
        &datum,
        true,
    );
    assert_matches(
        match_expr(&["tags"], MatchOperator::IsNotEmpty, None),
        &profile_datum(),
        true,
    );
}

#[test]
fn indirection_is_transparent_during_traversal() {
    let datum = Value::record([
        ("name", Value::indirect("alice")),
        ("age", Value::indirect(Value::Int32(30))),
    ]);

    assert_matches(
        match_expr(&["name"], MatchOperator::Equal, Some("alice"))
            & match_expr(&["age"], MatchOperator::Equal, Some("30")),
        &datum,
        true,
    );
}

#[test]
fn null_leaves_answer_by_the_defaulted_table() {
    let datum = Value::record([("name", Value::Null), ("age", Value::Int32(1))]);

    assert_matches(
        match_expr(&["name"], MatchOperator::Equal, Some("alice")),
        &datum,
        false,
    );
    assert_matches(
        match_expr(&["name"], MatchOperator::NotEqual, Some("alice")),
        &datum,
        true,
    );
    assert_matches(
        match_expr(&["name"], MatchOperator::IsEmpty, None),
        &datum,
        true,
    );
}

//
// validation failures
//

#[test]
fn suppressed_fields_do_not_validate() {
    let shape = FieldType::record([
        FieldModel::new("secret", FieldType::Scalar(Scalar::Text)).renamed("-"),
    ]);
    let fields = field_configurations(&shape).unwrap();
    let mut expr = match_expr(&["secret"], MatchOperator::Equal, Some("x"));

    assert!(matches!(
        validate(&fields, &mut expr, &Limits::default()),
        Err(ValidateError::InvalidSelector { .. })
    ));
}

#[test]
fn unknown_selectors_are_rejected() {
    let mut expr = match_expr(&["nope"], MatchOperator::Equal, Some("x"));

    assert!(matches!(
        validate(&profile_fields(), &mut expr, &Limits::default()),
        Err(ValidateError::InvalidSelector { .. })
    ));
}

#[test]
fn unsupported_operators_are_rejected() {
    let mut expr = match_expr(&["age"], MatchOperator::In, Some("4"));

    assert!(matches!(
        validate(&profile_fields(), &mut expr, &Limits::default()),
        Err(ValidateError::InvalidOperator { .. })
    ));
}

#[test]
fn uncoercible_values_are_rejected() {
    let mut expr = match_expr(&["age"], MatchOperator::Equal, Some("forty"));

    assert!(matches!(
        validate(&profile_fields(), &mut expr, &Limits::default()),
        Err(ValidateError::CouldNotCoerce { .. })
    ));
}

#[test]
fn valued_operators_require_a_value() {
    let mut expr = match_expr(&["age"], MatchOperator::Equal, None);

    assert!(matches!(
        validate(&profile_fields(), &mut expr, &Limits::default()),
        Err(ValidateError::MissingValue { .. })
    ));
}

#[test]
fn emptiness_operators_take_no_value() {
    let mut expr = match_expr(&["tags"], MatchOperator::IsEmpty, Some("x"));

    assert!(matches!(
        validate(&profile_fields(), &mut expr, &Limits::default()),
        Err(ValidateError::UnexpectedValue { .. })
    ));
}

#[test]
fn match_count_limit_is_enforced() {
    let limits = Limits {
        max_matches: 1,
        max_raw_value_length: 0,
    };
    let mut single = match_expr(&["name"], MatchOperator::Equal, Some("a"));
    assert!(validate(&profile_fields(), &mut single, &limits).is_ok());

    let mut pair = match_expr(&["name"], MatchOperator::Equal, Some("a"))
        & match_expr(&["age"], MatchOperator::NotEqual, Some("4"));
    assert!(matches!(
        validate(&profile_fields(), &mut pair, &limits),
        Err(ValidateError::TooManyMatches { limit: 1 })
    ));
}

#[test]
fn raw_length_limit_is_enforced() {
    let limits = Limits {
        max_matches: 0,
        max_raw_value_length: 3,
    };
    let mut expr = match_expr(&["name"], MatchOperator::Equal, Some("abcd"));

    assert!(matches!(
        validate(&profile_fields(), &mut expr, &limits),
        Err(ValidateError::RawValueTooLong {
            limit: 3,
            length: 4,
            ..
        })
    ));
}

#[test]
fn coercion_happens_once_into_converted() {
    let fields = profile_fields();
    let mut expr = match_expr(&["age"], MatchOperator::NotEqual, Some("40"));
    validate(&fields, &mut expr, &Limits::default()).unwrap();

    let Expr::Match(matching) = &expr else {
        panic!("expected a match leaf");
    };
    let value = matching.value.as_ref().unwrap();
    assert_eq!(value.raw, "40");
    assert_eq!(value.converted, Some(Value::Int32(40)));
}

#[test]
fn validation_is_idempotent() {
    let fields = profile_fields();
    let mut expr = match_expr(&["name"], MatchOperator::Equal, Some("alice"))
        & match_expr(&["tags"], MatchOperator::In, Some("green"));
    validate(&fields, &mut expr, &Limits::default()).unwrap();
    let snapshot = expr.clone();

    validate(&fields, &mut expr, &Limits::default()).unwrap();
    assert_eq!(expr, snapshot);
}

//
// runtime failures
//

#[test]
fn record_fields_missing_from_data_are_an_error() {
    let datum = Value::record([("name", "alice")]);

    assert!(matches!(
        eval_expr(match_expr(&["age"], MatchOperator::Equal, Some("30")), &datum),
        Err(EvalError::FieldNotPresent { .. })
    ));
}

#[test]
fn non_nested_values_cannot_be_descended() {
    let datum = Value::record([("users", "oops")]);

    assert!(matches!(
        eval_expr(
            match_expr(&["users", "name"], MatchOperator::Equal, Some("b")),
            &datum,
        ),
        Err(EvalError::NotNestable { .. })
    ));
}

#[test]
fn left_side_errors_short_circuit_conjunctions() {
    let datum = Value::record([("name", "alice")]);
    let failing = match_expr(&["age"], MatchOperator::Equal, Some("30"));
    let matching = match_expr(&["name"], MatchOperator::Equal, Some("alice"));

    assert!(eval_expr(failing.clone() & matching.clone(), &datum).is_err());
    // A decided left side never reaches the failing right side.
    assert!(eval_expr(matching | failing, &datum).unwrap());
}

#[test]
fn not_propagates_errors_untouched() {
    let datum = Value::record([("name", "alice")]);
    let failing = match_expr(&["age"], MatchOperator::Equal, Some("30"));

    assert!(eval_expr(!failing, &datum).is_err());
}

//
// self-describing values
//

#[derive(Debug)]
struct ServiceStatus {
    status: String,
}

impl ServiceStatus {
    fn configurations() -> FieldConfigurations {
        FieldConfigurations::new().with(
            "status",
            FieldConfiguration::leaf(
                Scalar::Text,
                vec![MatchOperator::Equal, MatchOperator::NotEqual],
            ),
        )
    }
}

impl Evaluable for ServiceStatus {
    fn field_configurations(&self) -> FieldConfigurations {
        Self::configurations()
    }

    fn evaluate_match(
        &self,
        selector: &[String],
        op: MatchOperator,
        value: Option<&Value>,
    ) -> Result<bool, EvalError> {
        if selector.len() != 1 || selector[0] != "status" {
            return Err(EvalError::delegated(format!(
                "unknown virtual field '{}'",
                selector.join("."),
            )));
        }
        let expected = value.and_then(Value::as_text).unwrap_or_default();

        match op {
            MatchOperator::Equal => Ok(self.status == expected),
            MatchOperator::NotEqual => Ok(self.status != expected),
            _ => Err(EvalError::delegated(format!("unsupported operator '{op}'"))),
        }
    }
}

#[test]
fn self_describing_values_answer_their_own_matches() {
    let fields =
        field_configurations(&FieldType::SelfDescribing(ServiceStatus::configurations()))
            .unwrap();
    let mut expr = match_expr(&["status"], MatchOperator::Equal, Some("live"));
    validate(&fields, &mut expr, &Limits::default()).unwrap();

    let live = Value::evaluable(ServiceStatus {
        status: "live".to_string(),
    });
    let down = Value::evaluable(ServiceStatus {
        status: "down".to_string(),
    });

    assert!(evaluate(&expr, &fields, &live).unwrap());
    assert!(!evaluate(&expr, &fields, &down).unwrap());
}

#[test]
fn nested_self_describing_values_receive_the_tail_selector() {
    let shape = FieldType::record([FieldModel::new(
        "service",
        FieldType::SelfDescribing(ServiceStatus::configurations()),
    )]);
    let fields = field_configurations(&shape).unwrap();
    let mut expr = match_expr(&["service", "status"], MatchOperator::Equal, Some("live"));
    validate(&fields, &mut expr, &Limits::default()).unwrap();

    let datum = Value::record([(
        "service",
        Value::evaluable(ServiceStatus {
            status: "live".to_string(),
        }),
    )]);

    assert!(evaluate(&expr, &fields, &datum).unwrap());
}

//
// short-circuit probe
//

#[derive(Debug)]
struct Probe {
    calls: Arc<AtomicUsize>,
    answer: bool,
}

impl Probe {
    fn configurations() -> FieldConfigurations {
        FieldConfigurations::new().with(
            "hit",
            FieldConfiguration::leaf(Scalar::Text, vec![MatchOperator::Equal]),
        )
    }
}

impl Evaluable for Probe {
    fn field_configurations(&self) -> FieldConfigurations {
        Self::configurations()
    }

    fn evaluate_match(
        &self,
        _selector: &[String],
        _op: MatchOperator,
        _value: Option<&Value>,
    ) -> Result<bool, EvalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

fn probe_setup(answer: bool) -> (FieldConfigurations, Value, Arc<AtomicUsize>) {
    let shape = FieldType::record([
        FieldModel::new("name", FieldType::Scalar(Scalar::Text)),
        FieldModel::new("probe", FieldType::SelfDescribing(Probe::configurations())),
    ]);
    let fields = field_configurations(&shape).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let datum = Value::record([
        ("name", Value::from("alice")),
        (
            "probe",
            Value::evaluable(Probe {
                calls: calls.clone(),
                answer,
            }),
        ),
    ]);

    (fields, datum, calls)
}

#[test]
fn decided_left_sides_never_evaluate_the_right() {
    let (fields, datum, calls) = probe_setup(true);
    let probe = match_expr(&["probe", "hit"], MatchOperator::Equal, Some("x"));
    let miss = match_expr(&["name"], MatchOperator::Equal, Some("bob"));
    let hit = match_expr(&["name"], MatchOperator::Equal, Some("alice"));

    let mut expr = miss & probe.clone();
    validate(&fields, &mut expr, &Limits::default()).unwrap();
    assert!(!evaluate(&expr, &fields, &datum).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let mut expr = hit.clone() | probe.clone();
    validate(&fields, &mut expr, &Limits::default()).unwrap();
    assert!(evaluate(&expr, &fields, &datum).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let mut expr = hit & probe;
    validate(&fields, &mut expr, &Limits::default()).unwrap();
    assert!(evaluate(&expr, &fields, &datum).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

//
// facade
//

#[test]
fn evaluator_prepares_once_and_evaluates_many() {
    let expr = match_expr(&["name"], MatchOperator::Equal, Some("alice"))
        & match_expr(&["tags"], MatchOperator::In, Some("green"));
    let evaluator = Evaluator::new(profile_fields(), expr).unwrap();

    assert!(evaluator.evaluate(&profile_datum()).unwrap());

    let other = Value::record([
        ("name", Value::from("bob")),
        ("age", Value::Int32(4)),
        ("tags", Value::List(Vec::new())),
        ("meta", Value::Map(Vec::new())),
        ("users", Value::List(Vec::new())),
    ]);
    assert!(!evaluator.evaluate(&other).unwrap());
}

struct Session {
    _peer: String,
    _attempts: u32,
}

impl Filterable for Session {
    fn field_type() -> FieldType {
        FieldType::record([
            FieldModel::new("peer", String::field_type()),
            FieldModel::new("attempts", u32::field_type()),
        ])
    }
}

#[test]
fn evaluator_derives_from_filterable_types() {
    let expr = match_expr(&["attempts"], MatchOperator::Equal, Some("3"));
    let evaluator = Evaluator::for_type::<Session>(expr).unwrap();
    let datum = Value::record([("peer", Value::from("10.0.0.1")), ("attempts", Value::Uint32(3))]);

    assert!(evaluator.evaluate(&datum).unwrap());
}

#[test]
fn limits_deserialize_with_defaults() {
    let limits: Limits = serde_json::from_str(r#"{ "max_matches": 2 }"#).unwrap();

    assert_eq!(
        limits,
        Limits {
            max_matches: 2,
            max_raw_value_length: 0,
        }
    );
}

#[test]
fn operators_render_their_surface_tokens() {
    let rendered: Vec<String> = [
        MatchOperator::Equal,
        MatchOperator::NotEqual,
        MatchOperator::In,
        MatchOperator::NotIn,
        MatchOperator::IsEmpty,
        MatchOperator::IsNotEmpty,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    assert_eq!(rendered, ["==", "!=", "in", "not in", "is empty", "is not empty"]);
}
