use std::cmp::Ordering;

use crate::builtins::{boolean_type, list_type, num, number_arg, number::Number, string_type};
use crate::def_overload;
use crate::error::CoreError;
use crate::fn_table::{FnTable, OverloadSet};
use crate::signature::Signature;
use crate::value::Value;

pub(crate) fn install(table: &FnTable) {
    table.register(OverloadSet::new(
        "+",
        vec![
            def_overload!("+", Signature::new(vec![], num()), |_args| {
                Ok(Value::number(0))
            }),
            def_overload!("+", Signature::variadic(vec![num()], num()), |args| {
                fold_numbers(args, Number::add)
            }),
            def_overload!(
                "+",
                Signature::variadic(vec![string_type()], string_type()),
                |args| {
                    let mut buf = String::new();
                    for i in 0..args.len() {
                        buf.push_str(crate::builtins::string_arg(args, i)?);
                    }
                    Ok(Value::string(buf))
                }
            ),
            def_overload!(
                "+",
                Signature::variadic(vec![list_type()], list_type()),
                |args| {
                    let mut out = im::Vector::new();
                    for i in 0..args.len() {
                        out.append(crate::builtins::list_arg(args, i)?.clone());
                    }
                    Ok(Value::list(out))
                }
            ),
        ],
    ));

    table.register(OverloadSet::new(
        "-",
        vec![
            def_overload!("-", Signature::new(vec![num()], num()), |args| {
                Ok(Value::number(number_arg(args, 0)?.neg()))
            }),
            def_overload!("-", Signature::variadic(vec![num(), num()], num()), |args| {
                fold_numbers(args, Number::sub)
            }),
        ],
    ));

    table.register(OverloadSet::new(
        "*",
        vec![
            def_overload!("*", Signature::new(vec![], num()), |_args| {
                Ok(Value::number(1))
            }),
            def_overload!("*", Signature::variadic(vec![num()], num()), |args| {
                fold_numbers(args, Number::mul)
            }),
        ],
    ));

    table.register(OverloadSet::new(
        "/",
        vec![def_overload!(
            "/",
            Signature::variadic(vec![num(), num()], num()),
            |args| fold_numbers(args, Number::div)
        )],
    ));

    table.register(OverloadSet::new(
        "mod",
        vec![def_overload!("mod", Signature::new(vec![num(), num()], num()), |args| {
            Ok(Value::number(
                number_arg(args, 0)?.modulo(number_arg(args, 1)?)?,
            ))
        })],
    ));

    table.register(OverloadSet::new(
        "rem",
        vec![def_overload!("rem", Signature::new(vec![num(), num()], num()), |args| {
            Ok(Value::number(
                number_arg(args, 0)?.remainder(number_arg(args, 1)?)?,
            ))
        })],
    ));

    comparison(table, "<", |o| o == Ordering::Less);
    comparison(table, "<=", |o| o != Ordering::Greater);
    comparison(table, ">", |o| o == Ordering::Greater);
    comparison(table, ">=", |o| o != Ordering::Less);
}

/// Left fold over ≥1 numeric arguments, seeded from the first.
fn fold_numbers(args: &[Value], op: fn(&Number, &Number) -> Number) -> Result<Value, CoreError> {
    let mut acc = number_arg(args, 0)?.clone();
    for i in 1..args.len() {
        acc = op(&acc, number_arg(args, i)?);
    }
    Ok(Value::number(acc))
}

/// Chained comparison over ≥1 numbers: every adjacent pair must satisfy the
/// predicate. A NaN anywhere makes the chain false.
fn comparison(table: &FnTable, name: &'static str, pred: fn(Ordering) -> bool) {
    table.register(OverloadSet::new(
        name,
        vec![def_overload!(
            name,
            Signature::variadic(vec![num(), num()], boolean_type()),
            |args| {
                for i in 1..args.len() {
                    let holds = number_arg(args, i - 1)?
                        .partial_cmp(number_arg(args, i)?)
                        .map(pred)
                        .unwrap_or(false);
                    if !holds {
                        return Ok(Value::boolean(false));
                    }
                }
                Ok(Value::boolean(true))
            }
        )],
    ));
}
