use crate::builtins::{any, boolean_type, function_arg, list_arg, list_type, num, number::Number};
use crate::def_overload;
use crate::error::CoreError;
use crate::fn_table::{FnTable, OverloadSet};
use crate::signature::Signature;
use crate::types::TypeSpec;
use crate::value::Value;

pub(crate) fn install(table: &FnTable) {
    table.register(OverloadSet::new(
        "=",
        vec![def_overload!(
            "=",
            Signature::variadic(vec![any(), any()], boolean_type()),
            |args| {
                let all = args.windows(2).all(|w| w[0].equals(&w[1]));
                Ok(Value::boolean(all))
            }
        )],
    ));

    table.register(OverloadSet::new(
        "list",
        vec![def_overload!(
            "list",
            Signature::variadic(vec![any()], list_type()),
            |args| Ok(Value::list(args.iter().cloned()))
        )],
    ));

    table.register(OverloadSet::new(
        "sort",
        vec![
            def_overload!("sort", Signature::new(vec![list_type()], list_type()), |args| {
                let items = list_arg(args, 0)?;
                sort_with(items, |a, b| {
                    let (x, y) = numbers(a, b)?;
                    Ok(x.partial_cmp(y).map_or(false, |o| o.is_lt()))
                })
            }),
            def_overload!(
                "sort",
                Signature::new(
                    vec![
                        list_type(),
                        TypeSpec::function(Signature::new(vec![num(), num()], num())),
                    ],
                    list_type(),
                ),
                |args| {
                    let items = list_arg(args, 0)?;
                    let cmp = function_arg(args, 1)?.clone();
                    sort_with(items, move |a, b| {
                        let out = cmp.call(&[a.clone(), b.clone()]);
                        if let Some(e) = out.as_error() {
                            return Err(e.clone());
                        }
                        let n = out.as_number().ok_or_else(|| {
                            CoreError::type_mismatch("Number", out.type_name())
                        })?;
                        Ok(*n < Number::from_int(0))
                    })
                }
            ),
        ],
    ));

    table.register(OverloadSet::new(
        "call",
        vec![def_overload!(
            "call",
            Signature::variadic(vec![TypeSpec::Function(None), any()], any()),
            |args| {
                let f = function_arg(args, 0)?;
                Ok(f.call(&args[1..]))
            }
        )],
    ));
}

fn numbers<'a>(a: &'a Value, b: &'a Value) -> Result<(&'a Number, &'a Number), CoreError> {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(CoreError::type_mismatch(
            "Number",
            if a.as_number().is_none() {
                a.type_name()
            } else {
                b.type_name()
            },
        )),
    }
}

/// Stable insertion sort threading the comparator's errors out. `before`
/// answers "must a sort before b?".
fn sort_with(
    items: &im::Vector<Value>,
    before: impl Fn(&Value, &Value) -> Result<bool, CoreError>,
) -> Result<Value, CoreError> {
    let mut sorted: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        let mut at = sorted.len();
        while at > 0 && before(item, &sorted[at - 1])? {
            at -= 1;
        }
        sorted.insert(at, item.clone());
    }
    Ok(Value::list(sorted))
}
