use std::sync::Arc;

use cairn_core::{
    tags, ArgType, CoreError, Overload, OverloadSet, Signature, TypeSpec, Value,
};

fn n() -> TypeSpec {
    TypeSpec::concrete(tags::NUMBER)
}

fn s() -> TypeSpec {
    TypeSpec::concrete(tags::STRING)
}

fn b() -> TypeSpec {
    TypeSpec::concrete(tags::BOOLEAN)
}

fn l() -> TypeSpec {
    TypeSpec::concrete(tags::LIST)
}

fn add_numbers(args: &[Value]) -> Result<Value, CoreError> {
    let a = args[0].as_number().cloned().unwrap_or_default();
    let b = args[1].as_number().cloned().unwrap_or_default();
    Ok(Value::number(a.add(&b)))
}

fn concat_strings(args: &[Value]) -> Result<Value, CoreError> {
    let a = args[0].as_string().unwrap_or_default();
    let b = args[1].as_string().unwrap_or_default();
    Ok(Value::string(format!("{}{}", a, b)))
}

#[test]
fn mixed_argument_types_pick_the_matching_overload() {
    let plus = OverloadSet::new(
        "+",
        vec![
            Overload::named("+", Signature::new(vec![n(), n()], n()), add_numbers),
            Overload::named("+", Signature::new(vec![s(), s()], s()), concat_strings),
        ],
    );

    let sum = plus.call(&[Value::number(20), Value::number(22)]);
    assert_eq!(sum, Value::number(42));

    let cat = plus.call(&[Value::string("foo"), Value::string("bar")]);
    assert_eq!(cat, Value::string("foobar"));

    let miss = plus.call(&[Value::number(1), Value::string("x")]);
    let err = miss.as_error().expect("error value");
    assert!(err.is_no_match());
    assert_eq!(err.to_string(), "no matching overload for (+ Number String)");
}

#[test]
fn zero_arguments_pick_the_identity_not_the_variadic() {
    for flip in [false, true] {
        let mut overloads = vec![
            Overload::new(Signature::variadic(vec![n()], n()), |args| {
                let mut acc = cairn_core::Number::from_int(0);
                for v in args {
                    if let Some(x) = v.as_number() {
                        acc = acc.add(x);
                    }
                }
                Ok(Value::number(acc))
            }),
            Overload::new(Signature::new(vec![], n()), |_| Ok(Value::number(0))),
        ];
        if flip {
            overloads.reverse();
        }
        let plus = OverloadSet::new("+", overloads);
        let identity_index = if flip { 0 } else { 1 };
        assert_eq!(plus.resolve(&[]), Some(identity_index));
        let variadic_index = 1 - identity_index;
        assert_eq!(
            plus.resolve(&[ArgType::Concrete(tags::NUMBER), ArgType::Concrete(tags::NUMBER)]),
            Some(variadic_index)
        );
    }
}

#[test]
fn nested_function_signature_rejects_a_return_type_mismatch() {
    let sort = OverloadSet::new(
        "sort",
        vec![Overload::new(
            Signature::new(
                vec![TypeSpec::function(Signature::new(vec![n(), n()], n()))],
                l(),
            ),
            |_| Ok(Value::list([])),
        )],
    );

    let numeric_cmp = Arc::new(OverloadSet::new(
        "cmp",
        vec![Overload::new(Signature::new(vec![n(), n()], n()), |_| {
            Ok(Value::number(0))
        })],
    ));
    let boolean_cmp = Arc::new(OverloadSet::new(
        "cmp?",
        vec![Overload::new(Signature::new(vec![n(), n()], b()), |_| {
            Ok(Value::boolean(true))
        })],
    ));

    assert_eq!(sort.resolve(&[ArgType::Function(numeric_cmp)]), Some(0));
    assert_eq!(sort.resolve(&[ArgType::Function(boolean_cmp)]), None);
}

#[test]
fn too_many_arguments_with_no_variadic_is_no_match() {
    let f = OverloadSet::new(
        "f",
        vec![
            Overload::new(Signature::new(vec![n()], n()), |_| Ok(Value::nil())),
            Overload::new(Signature::new(vec![n(), n()], n()), |_| Ok(Value::nil())),
        ],
    );
    let three = vec![ArgType::Concrete(tags::NUMBER); 3];
    assert_eq!(f.resolve(&three), None);
    let out = f.call(&[Value::number(1), Value::number(2), Value::number(3)]);
    assert!(out.as_error().map(CoreError::is_no_match).unwrap_or(false));
}

#[test]
fn overlapping_overloads_prefer_the_earliest_registered_in_any_permutation() {
    // One wildcard overload overlapping one concrete; for every order the
    // earlier one must win on the overlap, and the non-overlapping call is
    // order-independent.
    let wild = || Overload::new(Signature::new(vec![TypeSpec::Any], n()), |_| Ok(Value::number(1)));
    let conc = || Overload::new(Signature::new(vec![n()], n()), |_| Ok(Value::number(2)));

    let a = OverloadSet::new("f", vec![wild(), conc()]);
    assert_eq!(a.call(&[Value::number(7)]), Value::number(1));
    assert_eq!(a.call(&[Value::string("x")]), Value::number(1));

    let b = OverloadSet::new("f", vec![conc(), wild()]);
    assert_eq!(b.call(&[Value::number(7)]), Value::number(2));
    assert_eq!(b.call(&[Value::string("x")]), Value::number(1));
}

#[test]
fn wildcard_accepts_function_tags_too() {
    let probe = OverloadSet::new(
        "probe",
        vec![Overload::new(Signature::new(vec![TypeSpec::Any], n()), |_| {
            Ok(Value::number(1))
        })],
    );
    let f = Value::function(Arc::new(OverloadSet::new("id", Vec::new())));
    assert_eq!(probe.call(&[f]), Value::number(1));
    assert_eq!(probe.call(&[Value::nil()]), Value::number(1));
}

#[test]
fn overload_errors_pass_through_unchanged() {
    let f = OverloadSet::new(
        "f",
        vec![Overload::new(Signature::new(vec![], n()), |_| {
            Err(CoreError::message("deliberate"))
        })],
    );
    let out = f.call(&[]);
    let err = out.as_error().expect("error value");
    assert!(!err.is_no_match());
    assert_eq!(err.to_string(), "deliberate");
}

#[test]
fn variadic_tail_law_across_lengths() {
    let f = OverloadSet::new(
        "f",
        vec![Overload::new(Signature::variadic(vec![n()], l()), |args| {
            Ok(Value::list(args.iter().cloned()))
        })],
    );
    for len in 0..4 {
        let args: Vec<Value> = (0..len).map(Value::number).collect();
        let out = f.call(&args);
        assert_eq!(out.as_list().map(|l| l.len()), Some(len as usize));
    }
    let out = f.call(&[Value::number(1), Value::string("x")]);
    assert!(out.is_error());
}
