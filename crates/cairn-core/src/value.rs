use std::any::Any;
use std::fmt;
use std::sync::Arc;

use im::Vector;

use crate::builtins;
use crate::builtins::number::Number;
use crate::error::{CoreError, ErrorValue};
use crate::fn_table::{FunctionValue, OverloadSet};
use crate::type_registry::{self, tags, Payload, StrMode, TypeTag};
use crate::types::ArgType;

/// A dynamically-typed runtime datum: a type tag plus an owned, type-erased
/// payload. All payload operations go through the tag's registered
/// descriptor; `Value` knows nothing about concrete layouts.
///
/// A missing payload is the untyped empty value (the Nil singleton is
/// `Value::nil()`). Values are single-owner: `clone` is a deep copy and the
/// only shared-reference construct is the explicit alias slot in
/// [`crate::env::Env`].
pub struct Value {
    tag: TypeTag,
    payload: Option<Payload>,
}

/// Payload stored under the List type tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue(pub Vector<Value>);

impl Value {
    /// Wraps an already-built payload under a tag. The tag must be registered
    /// and the payload must be the tag's payload type.
    pub fn new(tag: TypeTag, payload: Payload) -> Self {
        Value {
            tag,
            payload: Some(payload),
        }
    }

    /// A payload-less value of the given tag.
    pub fn empty(tag: TypeTag) -> Self {
        Value { tag, payload: None }
    }

    pub fn nil() -> Self {
        builtins::ensure_types();
        Value::empty(tags::NIL)
    }

    pub fn boolean(b: bool) -> Self {
        builtins::ensure_types();
        Value::new(tags::BOOLEAN, Box::new(b))
    }

    pub fn number(n: impl Into<Number>) -> Self {
        builtins::ensure_types();
        let n: Number = n.into();
        Value::new(tags::NUMBER, Box::new(n))
    }

    pub fn rational(num: i64, den: i64) -> Self {
        builtins::ensure_types();
        Value::new(tags::NUMBER, Box::new(Number::ratio(num, den)))
    }

    pub fn string(s: impl Into<String>) -> Self {
        builtins::ensure_types();
        let s: String = s.into();
        Value::new(tags::STRING, Box::new(s))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        builtins::ensure_types();
        let items: Vector<Value> = items.into_iter().collect();
        Value::new(tags::LIST, Box::new(ListValue(items)))
    }

    pub fn error(error: CoreError) -> Self {
        builtins::ensure_types();
        Value::new(tags::ERROR, Box::new(ErrorValue(error)))
    }

    pub fn function(set: Arc<OverloadSet>) -> Self {
        builtins::ensure_types();
        Value::new(tags::FUNCTION, Box::new(FunctionValue(set)))
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn type_name(&self) -> &'static str {
        type_registry::name_of(self.tag)
    }

    pub fn is_nil(&self) -> bool {
        self.tag == tags::NIL
    }

    pub fn is_error(&self) -> bool {
        self.tag == tags::ERROR
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self.payload.as_deref_mut() {
            Some(p) => p.downcast_mut::<T>(),
            None => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if self.tag == tags::BOOLEAN {
            self.downcast_ref::<bool>().copied()
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        if self.tag == tags::NUMBER {
            self.downcast_ref::<Number>()
        } else {
            None
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if self.tag == tags::STRING {
            self.downcast_ref::<String>().map(String::as_str)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&Vector<Value>> {
        if self.tag == tags::LIST {
            self.downcast_ref::<ListValue>().map(|l| &l.0)
        } else {
            None
        }
    }

    pub fn as_function(&self) -> Option<&Arc<OverloadSet>> {
        if self.tag == tags::FUNCTION {
            self.downcast_ref::<FunctionValue>().map(|f| &f.0)
        } else {
            None
        }
    }

    pub fn as_error(&self) -> Option<&CoreError> {
        if self.tag == tags::ERROR {
            self.downcast_ref::<ErrorValue>().map(|e| &e.0)
        } else {
            None
        }
    }

    /// The runtime type of this value as seen by overload resolution.
    /// Function values expose their overload set so nested function-type
    /// parameters can inspect candidate signatures.
    pub fn arg_type(&self) -> ArgType {
        if self.tag == tags::FUNCTION {
            if let Some(f) = self.downcast_ref::<FunctionValue>() {
                return ArgType::Function(f.0.clone());
            }
        }
        ArgType::Concrete(self.tag)
    }

    /// Renders the value in the requested mode via the tag's descriptor.
    /// A payload-less value renders as its type name.
    pub fn stringify(&self, mode: StrMode) -> String {
        let desc = type_registry::descriptor(self.tag);
        match self.payload.as_deref() {
            Some(payload) => desc.stringify(payload, mode),
            None => desc.name.to_string(),
        }
    }

    /// Replaces this value's payload with a deep copy of `other`'s. Both
    /// values must carry the same tag; a mismatch is a construction defect.
    pub fn assign_from(&mut self, other: &Value) {
        if self.tag != other.tag {
            panic!(
                "assign_from across type tags: '{}' <- '{}'",
                self.type_name(),
                other.type_name()
            );
        }
        let desc = type_registry::descriptor(self.tag);
        self.payload = other.payload.as_deref().map(|p| desc.copy(p));
    }

    /// Equality: identity, or same tag plus the tag's equality on payloads.
    /// Two payload-less values of the same tag are equal.
    pub fn equals(&self, other: &Value) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.tag != other.tag {
            return false;
        }
        match (self.payload.as_deref(), other.payload.as_deref()) {
            (None, None) => true,
            (Some(a), Some(b)) => type_registry::descriptor(self.tag).equal(a, b),
            _ => false,
        }
    }
}

impl Clone for Value {
    /// Deep copy via the tag's copy function. A payload-less value clones to
    /// another payload-less value of the same tag.
    fn clone(&self) -> Self {
        let payload = self
            .payload
            .as_deref()
            .map(|p| type_registry::descriptor(self.tag).copy(p));
        Value {
            tag: self.tag,
            payload,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify(StrMode::Display))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            type_registry::name_of(self.tag),
            self.stringify(StrMode::Display)
        )
    }
}
