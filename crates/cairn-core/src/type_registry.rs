use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

/// Type-erased payload owned by a [`crate::value::Value`]. The registry entry
/// for the value's tag is the only decoder.
pub type Payload = Box<dyn Any + Send + Sync>;

/// Runtime type id. Every tag attached to a value must have a registered
/// descriptor before that value is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(pub u16);

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tags of the built-in types. Embedder-defined types start at `USER_BASE`.
pub mod tags {
    use super::TypeTag;

    pub const NIL: TypeTag = TypeTag(1);
    pub const BOOLEAN: TypeTag = TypeTag(2);
    pub const NUMBER: TypeTag = TypeTag(3);
    pub const STRING: TypeTag = TypeTag(4);
    pub const LIST: TypeTag = TypeTag(5);
    pub const FUNCTION: TypeTag = TypeTag(6);
    pub const ERROR: TypeTag = TypeTag(7);

    pub const USER_BASE: TypeTag = TypeTag(32);
}

/// Stringify flavor selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrMode {
    /// Readable form, strings quoted (REPL echo).
    Display,
    /// Raw form for program output.
    Output,
    /// Source form that would read back as the value.
    Source,
}

type PayloadRef = dyn Any + Send + Sync;

type ConstructFn = dyn Fn() -> Payload + Send + Sync;
type CopyFn = dyn Fn(&PayloadRef) -> Payload + Send + Sync;
type EqualFn = dyn Fn(&PayloadRef, &PayloadRef) -> bool + Send + Sync;
type StringifyFn = dyn Fn(&PayloadRef) -> String + Send + Sync;

/// Capability record for one runtime type: how to construct, copy, compare
/// and stringify its payload. Registered once at startup, immutable after.
#[derive(Clone)]
pub struct TypeDescriptor {
    pub tag: TypeTag,
    pub name: &'static str,
    pub size: usize,
    construct: Arc<ConstructFn>,
    copy: Arc<CopyFn>,
    equal: Arc<EqualFn>,
    display: Arc<StringifyFn>,
    output: Arc<StringifyFn>,
    source: Arc<StringifyFn>,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

fn cast<'a, T: Any>(payload: &'a PayloadRef, name: &str) -> &'a T {
    payload.downcast_ref::<T>().unwrap_or_else(|| {
        panic!(
            "payload stored under type '{}' is not a {}",
            name,
            type_name::<T>()
        )
    })
}

impl TypeDescriptor {
    /// Builds the capability record for a concrete payload type. The three
    /// stringify functions correspond to [`StrMode::Display`],
    /// [`StrMode::Output`] and [`StrMode::Source`].
    pub fn of<T>(
        tag: TypeTag,
        name: &'static str,
        display: fn(&T) -> String,
        output: fn(&T) -> String,
        source: fn(&T) -> String,
    ) -> Self
    where
        T: Any + Clone + PartialEq + Default + Send + Sync,
    {
        TypeDescriptor {
            tag,
            name,
            size: mem::size_of::<T>(),
            construct: Arc::new(|| Box::new(T::default()) as Payload),
            copy: Arc::new(move |p| Box::new(cast::<T>(p, name).clone()) as Payload),
            equal: Arc::new(move |a, b| cast::<T>(a, name) == cast::<T>(b, name)),
            display: Arc::new(move |p| display(cast::<T>(p, name))),
            output: Arc::new(move |p| output(cast::<T>(p, name))),
            source: Arc::new(move |p| source(cast::<T>(p, name))),
        }
    }

    pub fn construct(&self) -> Payload {
        (self.construct)()
    }

    pub fn copy(&self, payload: &PayloadRef) -> Payload {
        (self.copy)(payload)
    }

    pub fn equal(&self, a: &PayloadRef, b: &PayloadRef) -> bool {
        (self.equal)(a, b)
    }

    pub fn stringify(&self, payload: &PayloadRef, mode: StrMode) -> String {
        match mode {
            StrMode::Display => (self.display)(payload),
            StrMode::Output => (self.output)(payload),
            StrMode::Source => (self.source)(payload),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<TypeTag, TypeDescriptor>,
}

static REGISTRY: Lazy<RwLock<RegistryState>> =
    Lazy::new(|| RwLock::new(RegistryState::default()));

/// Registers a type descriptor. Duplicate tags are a startup defect.
pub fn register(descriptor: TypeDescriptor) {
    let mut guard = REGISTRY.write().unwrap();
    if let Some(existing) = guard.entries.get(&descriptor.tag) {
        panic!(
            "type tag {} registered twice ('{}' then '{}')",
            descriptor.tag, existing.name, descriptor.name
        );
    }
    guard.entries.insert(descriptor.tag, descriptor);
}

pub fn is_registered(tag: TypeTag) -> bool {
    REGISTRY.read().unwrap().entries.contains_key(&tag)
}

/// Looks up the descriptor for a tag. An unknown tag means a value was
/// constructed before its type was registered, which is fatal.
pub fn descriptor(tag: TypeTag) -> TypeDescriptor {
    REGISTRY
        .read()
        .unwrap()
        .entries
        .get(&tag)
        .cloned()
        .unwrap_or_else(|| panic!("unregistered type tag {} touched", tag))
}

pub fn name_of(tag: TypeTag) -> &'static str {
    descriptor(tag).name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_copy_and_equal_roundtrip() {
        let desc = TypeDescriptor::of::<i64>(
            tags::USER_BASE,
            "Probe",
            |n| n.to_string(),
            |n| n.to_string(),
            |n| n.to_string(),
        );
        let payload: Payload = Box::new(7i64);
        let copy = desc.copy(payload.as_ref());
        assert!(desc.equal(payload.as_ref(), copy.as_ref()));
        assert_eq!(desc.stringify(copy.as_ref(), StrMode::Display), "7");
        assert_eq!(desc.size, std::mem::size_of::<i64>());
    }

    #[test]
    #[should_panic(expected = "is not a")]
    fn descriptor_rejects_foreign_payload() {
        let desc = TypeDescriptor::of::<i64>(
            TypeTag(9999),
            "Probe",
            |n| n.to_string(),
            |n| n.to_string(),
            |n| n.to_string(),
        );
        let wrong: Payload = Box::new(String::from("not an i64"));
        desc.copy(wrong.as_ref());
    }

    #[test]
    #[should_panic(expected = "unregistered type tag")]
    fn unknown_tag_is_fatal() {
        descriptor(TypeTag(u16::MAX));
    }
}
