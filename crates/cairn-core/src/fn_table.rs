use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::error::CoreError;
use crate::sign_tree::SignTree;
use crate::signature::Signature;
use crate::types::{self, ArgType};
use crate::value::Value;

/// A native callable paired with an optional name for diagnostics.
pub struct NativeFn {
    func: Box<dyn Fn(&[Value]) -> Result<Value, CoreError> + Send + Sync>,
    debug_name: Option<Arc<str>>,
}

impl NativeFn {
    pub fn new(func: impl Fn(&[Value]) -> Result<Value, CoreError> + Send + Sync + 'static) -> Self {
        Self {
            func: Box::new(func),
            debug_name: None,
        }
    }

    pub fn with_name(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, CoreError> + Send + Sync + 'static,
    ) -> Self {
        let mut nf = Self::new(func);
        nf.debug_name = Some(name.into().into());
        nf
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, CoreError> {
        (self.func)(args)
    }

    pub fn debug_name(&self) -> Option<&str> {
        self.debug_name.as_deref()
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.debug_name {
            Some(name) => write!(f, "#<native fn {}>", name),
            None => write!(f, "#<native fn>"),
        }
    }
}

/// One signature bound to one native callable.
pub struct Overload {
    signature: Signature,
    func: NativeFn,
}

impl Overload {
    pub fn new(
        signature: Signature,
        func: impl Fn(&[Value]) -> Result<Value, CoreError> + Send + Sync + 'static,
    ) -> Self {
        Overload {
            signature,
            func: NativeFn::new(func),
        }
    }

    pub fn named(
        name: impl Into<String>,
        signature: Signature,
        func: impl Fn(&[Value]) -> Result<Value, CoreError> + Send + Sync + 'static,
    ) -> Self {
        Overload {
            signature,
            func: NativeFn::with_name(name, func),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Runs the native callable with the full original argument values.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, CoreError> {
        self.func.call(args)
    }
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} : {}", self.func, self.signature.describe())
    }
}

/// All overloads registered under one symbol, with the lookup trie built up
/// front. The trie is never touched again after construction, so shared
/// read-only handles are safe across threads.
pub struct OverloadSet {
    name: String,
    overloads: Vec<Overload>,
    tree: SignTree,
}

impl OverloadSet {
    pub fn new(name: impl Into<String>, overloads: Vec<Overload>) -> Self {
        let mut tree = SignTree::new();
        for (i, o) in overloads.iter().enumerate() {
            tree.insert(o.signature(), i);
        }
        OverloadSet {
            name: name.into(),
            overloads,
            tree,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    pub fn overload(&self, index: usize) -> &Overload {
        &self.overloads[index]
    }

    /// Picks the overload for the given argument types without invoking it.
    pub fn resolve(&self, args: &[ArgType]) -> Option<usize> {
        self.tree.resolve(args)
    }

    /// Resolves against the arguments' runtime types and invokes the match.
    /// A failed resolution and an error raised by the overload itself both
    /// come back as an error-tagged value, distinguishable by kind.
    pub fn call(&self, args: &[Value]) -> Value {
        let arg_types: Vec<ArgType> = args.iter().map(Value::arg_type).collect();
        match self.resolve(&arg_types) {
            Some(index) => match self.overloads[index].invoke(args) {
                Ok(value) => value,
                Err(e) => Value::error(e),
            },
            None => Value::error(CoreError::no_match(
                &self.name,
                types::describe_args(&arg_types),
            )),
        }
    }
}

impl fmt::Debug for OverloadSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverloadSet")
            .field("name", &self.name)
            .field("overloads", &self.overloads)
            .finish()
    }
}

/// Payload of a function-tagged value: a shared handle on an overload set.
/// A plain single-signature function is a one-overload set.
#[derive(Clone)]
pub struct FunctionValue(pub Arc<OverloadSet>);

impl FunctionValue {
    pub fn set(&self) -> &Arc<OverloadSet> {
        &self.0
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for FunctionValue {
    fn default() -> Self {
        FunctionValue(Arc::new(OverloadSet::new("", Vec::new())))
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn {}>", self.0.name())
    }
}

/// Symbol → overload set table with a two-phase lifecycle: every
/// registration happens during startup, then the table is sealed and serves
/// lookups only. Registering after the seal, or registering a symbol twice,
/// is a startup bug and panics.
pub struct FnTable {
    sets: RwLock<HashMap<String, Arc<OverloadSet>>>,
    sealed: AtomicBool,
}

impl FnTable {
    pub fn new() -> Self {
        FnTable {
            sets: RwLock::new(HashMap::new()),
            sealed: AtomicBool::new(false),
        }
    }

    pub fn register(&self, set: OverloadSet) {
        if self.sealed.load(Ordering::Acquire) {
            panic!("function table sealed; late registration of {}", set.name());
        }
        let mut sets = self.sets.write().unwrap_or_else(|e| e.into_inner());
        let name = set.name().to_string();
        if sets.insert(name.clone(), Arc::new(set)).is_some() {
            panic!("duplicate function registration: {}", name);
        }
    }

    /// Ends the build phase. Idempotent.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<OverloadSet>> {
        let sets = self.sets.read().unwrap_or_else(|e| e.into_inner());
        sets.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let sets = self.sets.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = sets.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FnTable {
    fn default() -> Self {
        FnTable::new()
    }
}

static GLOBAL: Lazy<FnTable> = Lazy::new(|| {
    let table = FnTable::new();
    crate::builtins::install(&table);
    table.seal();
    table
});

/// The process-wide table, populated with the built-in library and sealed on
/// first touch.
pub fn global() -> &'static FnTable {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::type_registry::tags;
    use crate::types::TypeSpec;

    fn n() -> TypeSpec {
        TypeSpec::concrete(tags::NUMBER)
    }

    fn s() -> TypeSpec {
        TypeSpec::concrete(tags::STRING)
    }

    fn plus_set() -> OverloadSet {
        OverloadSet::new(
            "+",
            vec![
                Overload::named("+", Signature::new(vec![n(), n()], n()), |args| {
                    let a = builtins::number_arg(args, 0)?;
                    let b = builtins::number_arg(args, 1)?;
                    Ok(Value::number(a.add(b)))
                }),
                Overload::named("+", Signature::new(vec![s(), s()], s()), |args| {
                    let a = builtins::string_arg(args, 0)?;
                    let b = builtins::string_arg(args, 1)?;
                    Ok(Value::string(format!("{}{}", a, b)))
                }),
            ],
        )
    }

    #[test]
    fn call_dispatches_on_argument_types() {
        builtins::ensure_types();
        let set = plus_set();
        let sum = set.call(&[Value::number(1), Value::number(2)]);
        assert_eq!(sum, Value::number(3));
        let cat = set.call(&[Value::string("ab"), Value::string("cd")]);
        assert_eq!(cat, Value::string("abcd"));
    }

    #[test]
    fn no_match_yields_an_error_value_not_a_panic() {
        builtins::ensure_types();
        let set = plus_set();
        let out = set.call(&[Value::number(1), Value::string("x")]);
        let err = out.as_error().cloned();
        assert!(matches!(err, Some(e) if e.is_no_match()));
    }

    #[test]
    fn overload_error_is_distinguishable_from_no_match() {
        builtins::ensure_types();
        let set = OverloadSet::new(
            "fail",
            vec![Overload::new(Signature::new(vec![], n()), |_| {
                Err(CoreError::message("boom"))
            })],
        );
        let out = set.call(&[]);
        let err = out.as_error().cloned();
        assert!(matches!(err, Some(e) if !e.is_no_match()));
    }

    #[test]
    #[should_panic(expected = "duplicate function registration")]
    fn duplicate_symbol_panics() {
        let table = FnTable::new();
        table.register(OverloadSet::new("f", Vec::new()));
        table.register(OverloadSet::new("f", Vec::new()));
    }

    #[test]
    #[should_panic(expected = "function table sealed")]
    fn late_registration_panics() {
        let table = FnTable::new();
        table.seal();
        table.register(OverloadSet::new("f", Vec::new()));
    }

    #[test]
    fn global_table_is_sealed_and_stocked() {
        let table = global();
        assert!(table.is_sealed());
        assert!(table.lookup("+").is_some());
        assert!(table.lookup("no-such-symbol").is_none());
    }
}
