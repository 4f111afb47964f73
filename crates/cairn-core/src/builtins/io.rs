use crate::builtins::{any, list_type};
use crate::def_overload;
use crate::fn_table::{FnTable, OverloadSet};
use crate::signature::Signature;
use crate::type_registry::StrMode;
use crate::value::Value;

pub(crate) fn install(table: &FnTable) {
    table.register(OverloadSet::new(
        "print",
        vec![def_overload!(
            "print",
            Signature::variadic(vec![any()], list_type()),
            |args| {
                print!("{}", render(args, StrMode::Output));
                Ok(Value::list(args.iter().cloned()))
            }
        )],
    ));

    table.register(OverloadSet::new(
        "println",
        vec![def_overload!(
            "println",
            Signature::variadic(vec![any()], list_type()),
            |args| {
                println!("{}", render(args, StrMode::Output));
                Ok(Value::list(args.iter().cloned()))
            }
        )],
    ));

    // Echo form: quoted strings, readable lists.
    table.register(OverloadSet::new(
        "p",
        vec![def_overload!("p", Signature::variadic(vec![any()], list_type()), |args| {
            println!("{}", render(args, StrMode::Display));
            Ok(Value::list(args.iter().cloned()))
        })],
    ));
}

fn render(args: &[Value], mode: StrMode) -> String {
    args.iter()
        .map(|v| v.stringify(mode))
        .collect::<Vec<_>>()
        .join(" ")
}
