//! Value model and multimethod dispatch core for a small dynamic language.
//!
//! Values are tag + type-erased payload, decoded only through the
//! [`type_registry`]. Functions are sets of typed overloads; calls resolve
//! against a signature prefix trie with backtracking, preferring the
//! earliest registered overload among applicable ones. Dispatch failures
//! come back as Error-tagged values, never as unwinds.

pub mod builtins;
pub mod env;
pub mod error;
pub mod fn_table;
pub mod sign_tree;
pub mod signature;
pub mod type_registry;
pub mod types;
pub mod value;

pub use builtins::number::Number;
pub use env::{Env, SlotRef};
pub use error::CoreError;
pub use fn_table::{FnTable, FunctionValue, NativeFn, Overload, OverloadSet};
pub use sign_tree::SignTree;
pub use signature::Signature;
pub use type_registry::{tags, StrMode, TypeDescriptor, TypeTag};
pub use types::{ArgType, TypeSpec};
pub use value::{ListValue, Value};

/// Calls a symbol from the global table. An unknown symbol and a resolution
/// failure both come back as Error-tagged values.
pub fn call(name: &str, args: &[Value]) -> Value {
    match fn_table::global().lookup(name) {
        Some(set) => set.call(args),
        None => Value::error(CoreError::message(format!("unbound function: {}", name))),
    }
}
