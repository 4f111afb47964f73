use std::sync::Arc;

use cairn_core::{call, tags, Overload, OverloadSet, Signature, StrMode, TypeSpec, Value};

fn nums(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::number(v)).collect()
}

#[test]
fn addition_folds_and_has_an_identity() {
    assert_eq!(call("+", &nums(&[1, 2, 3])), Value::number(6));
    assert_eq!(call("+", &[]), Value::number(0));
    assert_eq!(call("+", &nums(&[5])), Value::number(5));
}

#[test]
fn addition_dispatches_on_strings_and_lists() {
    let cat = call("+", &[Value::string("ab"), Value::string("cd"), Value::string("e")]);
    assert_eq!(cat, Value::string("abcde"));

    let joined = call(
        "+",
        &[Value::list(nums(&[1, 2])), Value::list(nums(&[3]))],
    );
    assert_eq!(joined, Value::list(nums(&[1, 2, 3])));
}

#[test]
fn mixed_addition_is_a_dispatch_error() {
    let out = call("+", &[Value::number(1), Value::string("x")]);
    let err = out.as_error().expect("error value");
    assert!(err.is_no_match());
}

#[test]
fn subtraction_negation_and_division() {
    assert_eq!(call("-", &nums(&[10, 3, 2])), Value::number(5));
    assert_eq!(call("-", &nums(&[3])), Value::number(-3));
    assert_eq!(call("*", &nums(&[2, 3, 4])), Value::number(24));
    assert_eq!(call("*", &[]), Value::number(1));
    assert_eq!(call("/", &nums(&[1, 3])), Value::rational(1, 3));
    assert_eq!(call("/", &nums(&[2, 4])), Value::rational(1, 2));
}

#[test]
fn division_by_zero_is_not_finite() {
    let out = call("/", &nums(&[1, 0]));
    let n = out.as_number().expect("number");
    assert!(n.is_infinite());
    let nan = call("/", &nums(&[0, 0]));
    assert!(nan.as_number().expect("number").is_nan());
}

#[test]
fn modulo_and_remainder() {
    assert_eq!(call("mod", &nums(&[-7, 3])), Value::number(2));
    assert_eq!(call("rem", &nums(&[-7, 3])), Value::number(-1));
    let out = call("mod", &nums(&[1, 0]));
    assert!(out.is_error());
}

#[test]
fn comparisons_chain() {
    assert_eq!(call("<", &nums(&[1, 2, 3])), Value::boolean(true));
    assert_eq!(call("<", &nums(&[1, 3, 2])), Value::boolean(false));
    assert_eq!(call("<=", &nums(&[2, 2, 3])), Value::boolean(true));
    assert_eq!(call(">", &nums(&[3, 2, 1])), Value::boolean(true));
    assert_eq!(call(">=", &nums(&[3, 3])), Value::boolean(true));
    let nan = call("/", &nums(&[0, 0]));
    assert_eq!(call("<", &[Value::number(1), nan]), Value::boolean(false));
    let inf = call("/", &nums(&[1, 0]));
    let neg_inf = call("/", &nums(&[-1, 0]));
    assert_eq!(
        call("<=", &[inf.clone(), neg_inf.clone()]),
        Value::boolean(false)
    );
    assert_eq!(call(">", &[inf, neg_inf]), Value::boolean(true));
}

#[test]
fn equality_is_structural_and_chained() {
    assert_eq!(
        call("=", &[Value::string("a"), Value::string("a")]),
        Value::boolean(true)
    );
    assert_eq!(
        call("=", &[Value::number(1), Value::number(1), Value::number(2)]),
        Value::boolean(false)
    );
    assert_eq!(
        call("=", &[Value::number(1), Value::string("1")]),
        Value::boolean(false)
    );
}

#[test]
fn list_collects_arguments_of_any_type() {
    let out = call("list", &[Value::number(1), Value::string("x"), Value::nil()]);
    let items = out.as_list().expect("list");
    assert_eq!(items.len(), 3);
    assert_eq!(out.stringify(StrMode::Display), "[1 \"x\" Nil]");
    assert_eq!(call("list", &[]), Value::list([]));
}

#[test]
fn sort_orders_numbers_ascending() {
    let out = call("sort", &[Value::list(nums(&[3, 1, 2, 1]))]);
    assert_eq!(out, Value::list(nums(&[1, 1, 2, 3])));
}

#[test]
fn sort_rejects_non_numeric_elements() {
    let out = call("sort", &[Value::list([Value::number(1), Value::string("x")])]);
    let err = out.as_error().expect("error value");
    assert!(!err.is_no_match());
}

#[test]
fn sort_takes_a_numeric_comparator() {
    let n = || TypeSpec::concrete(tags::NUMBER);
    let descending = Arc::new(OverloadSet::new(
        "descending",
        vec![Overload::new(Signature::new(vec![n(), n()], n()), |args| {
            let a = args[0].as_number().cloned().unwrap_or_default();
            let b = args[1].as_number().cloned().unwrap_or_default();
            Ok(Value::number(b.sub(&a)))
        })],
    ));
    let out = call(
        "sort",
        &[Value::list(nums(&[2, 3, 1])), Value::function(descending)],
    );
    assert_eq!(out, Value::list(nums(&[3, 2, 1])));
}

#[test]
fn sort_rejects_a_boolean_comparator() {
    let n = || TypeSpec::concrete(tags::NUMBER);
    let wrong = Arc::new(OverloadSet::new(
        "less?",
        vec![Overload::new(
            Signature::new(vec![n(), n()], TypeSpec::concrete(tags::BOOLEAN)),
            |_| Ok(Value::boolean(true)),
        )],
    ));
    let out = call("sort", &[Value::list(nums(&[2, 1])), Value::function(wrong)]);
    let err = out.as_error().expect("error value");
    assert!(err.is_no_match());
}

#[test]
fn call_applies_a_function_value_to_the_remaining_arguments() {
    let plus = cairn_core::fn_table::global().lookup("+").expect("+");
    let out = call("call", &[Value::function(plus), Value::number(4), Value::number(5)]);
    assert_eq!(out, Value::number(9));
}

#[test]
fn unknown_symbols_are_error_values() {
    let out = call("no-such-fn", &[]);
    assert!(out.is_error());
}

#[test]
fn print_family_returns_the_argument_list() {
    assert_eq!(
        call("println", &[Value::number(1), Value::number(2)]),
        Value::list(nums(&[1, 2]))
    );
    assert_eq!(call("print", &[]), Value::list([]));
    assert_eq!(call("p", &[Value::string("x")]), Value::list([Value::string("x")]));
}
