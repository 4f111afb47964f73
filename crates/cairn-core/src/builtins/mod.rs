use std::sync::Once;

use crate::builtins::number::Number;
use crate::error::{CoreError, ErrorValue};
use crate::fn_table::{FnTable, FunctionValue};
use crate::type_registry::{self, tags, StrMode, TypeDescriptor};
use crate::types::TypeSpec;
use crate::value::{ListValue, Value};

pub mod number;

mod core;
mod io;
mod math;

/// Builds one named overload from a signature and a native body.
#[macro_export]
macro_rules! def_overload {
    ($name:expr, $sig:expr, |$args:ident| $body:block) => {
        $crate::fn_table::Overload::named(
            $name,
            $sig,
            move |$args: &[$crate::value::Value]| -> Result<$crate::value::Value, $crate::error::CoreError> {
                $body
            },
        )
    };
    ($name:expr, $sig:expr, |$args:ident| $body:expr) => {
        $crate::fn_table::Overload::named(
            $name,
            $sig,
            move |$args: &[$crate::value::Value]| -> Result<$crate::value::Value, $crate::error::CoreError> {
                $body
            },
        )
    };
}

pub use def_overload;

static TYPES: Once = Once::new();

/// Registers the descriptors of the built-in types. Idempotent; every value
/// constructor calls it, so no value exists whose tag the registry cannot
/// decode.
pub fn ensure_types() {
    TYPES.call_once(|| {
        type_registry::register(TypeDescriptor::of::<()>(
            tags::NIL,
            "Nil",
            |_| "Nil".to_string(),
            |_| "Nil".to_string(),
            |_| "Nil".to_string(),
        ));
        type_registry::register(TypeDescriptor::of::<bool>(
            tags::BOOLEAN,
            "Boolean",
            |b| b.to_string(),
            |b| b.to_string(),
            |b| b.to_string(),
        ));
        type_registry::register(TypeDescriptor::of::<Number>(
            tags::NUMBER,
            "Number",
            |n| n.to_string(),
            |n| n.to_string(),
            |n| n.to_string(),
        ));
        type_registry::register(TypeDescriptor::of::<String>(
            tags::STRING,
            "String",
            |s| format!("{:?}", s),
            |s| s.clone(),
            |s| format!("{:?}", s),
        ));
        type_registry::register(TypeDescriptor::of::<ListValue>(
            tags::LIST,
            "List",
            |l| stringify_list(l, StrMode::Display),
            |l| stringify_list(l, StrMode::Output),
            |l| stringify_list(l, StrMode::Source),
        ));
        type_registry::register(TypeDescriptor::of::<FunctionValue>(
            tags::FUNCTION,
            "Function",
            |f| format!("{:?}", f),
            |f| format!("{:?}", f),
            |f| format!("{:?}", f),
        ));
        type_registry::register(TypeDescriptor::of::<ErrorValue>(
            tags::ERROR,
            "Error",
            |e| format!("#<error: {}>", e.0),
            |e| format!("#<error: {}>", e.0),
            |e| format!("#<error: {}>", e.0),
        ));
    });
}

fn stringify_list(list: &ListValue, mode: StrMode) -> String {
    let items: Vec<String> = list.0.iter().map(|v| v.stringify(mode)).collect();
    format!("[{}]", items.join(" "))
}

/// Populates a table with the standard library.
pub fn install(table: &FnTable) {
    ensure_types();
    math::install(table);
    core::install(table);
    io::install(table);
}

pub fn err<T>(msg: impl Into<String>) -> Result<T, CoreError> {
    Err(CoreError::message(msg))
}

// Parameter type shorthands for registrations.
pub(crate) fn any() -> TypeSpec {
    TypeSpec::Any
}

pub(crate) fn num() -> TypeSpec {
    TypeSpec::concrete(tags::NUMBER)
}

pub(crate) fn string_type() -> TypeSpec {
    TypeSpec::concrete(tags::STRING)
}

pub(crate) fn boolean_type() -> TypeSpec {
    TypeSpec::concrete(tags::BOOLEAN)
}

pub(crate) fn list_type() -> TypeSpec {
    TypeSpec::concrete(tags::LIST)
}

fn wrong_type(expected: &str, args: &[Value], index: usize) -> CoreError {
    let actual = args
        .get(index)
        .map(Value::type_name)
        .unwrap_or("nothing");
    CoreError::type_mismatch(expected, format!("{} (arg {})", actual, index + 1))
}

pub fn number_arg<'a>(args: &'a [Value], index: usize) -> Result<&'a Number, CoreError> {
    args.get(index)
        .and_then(Value::as_number)
        .ok_or_else(|| wrong_type("Number", args, index))
}

pub fn string_arg<'a>(args: &'a [Value], index: usize) -> Result<&'a str, CoreError> {
    args.get(index)
        .and_then(Value::as_string)
        .ok_or_else(|| wrong_type("String", args, index))
}

pub fn list_arg<'a>(args: &'a [Value], index: usize) -> Result<&'a im::Vector<Value>, CoreError> {
    args.get(index)
        .and_then(Value::as_list)
        .ok_or_else(|| wrong_type("List", args, index))
}

pub fn function_arg<'a>(
    args: &'a [Value],
    index: usize,
) -> Result<&'a std::sync::Arc<crate::fn_table::OverloadSet>, CoreError> {
    args.get(index)
        .and_then(Value::as_function)
        .ok_or_else(|| wrong_type("Function", args, index))
}
