use std::fmt;
use std::sync::Arc;

use crate::fn_table::OverloadSet;
use crate::signature::Signature;
use crate::type_registry::{self, tags, TypeTag};

/// A declared type constraint: a concrete tag, the wildcard, or a function
/// type optionally carrying a nested signature. Compared structurally.
///
/// The type lattice is deliberately flat: the wildcard accepts everything, a
/// function type accepts functions with a compatible signature, and a
/// concrete tag accepts only itself. There is no numeric widening and no
/// subtype chain.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeSpec {
    Any,
    Concrete(TypeTag),
    Function(Option<Box<Signature>>),
}

impl TypeSpec {
    /// A concrete-tag constraint. The bare function tag normalizes to the
    /// function type so both spellings compare and match identically.
    pub fn concrete(tag: TypeTag) -> Self {
        if tag == tags::FUNCTION {
            TypeSpec::Function(None)
        } else {
            TypeSpec::Concrete(tag)
        }
    }

    /// A function type constrained to the given signature.
    pub fn function(signature: Signature) -> Self {
        TypeSpec::Function(Some(Box::new(signature)))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, TypeSpec::Function(_))
    }

    pub fn describe(&self) -> String {
        match self {
            TypeSpec::Any => "Any".to_string(),
            TypeSpec::Concrete(tag) => type_registry::name_of(*tag).to_string(),
            TypeSpec::Function(None) => "Fn".to_string(),
            TypeSpec::Function(Some(sig)) => format!("Fn<{}>", sig.describe()),
        }
    }

    /// Does this declared constraint accept an actual argument of the given
    /// runtime type? Evaluated top-down:
    /// wildcard accepts anything; a function type accepts only function
    /// values (checking the nested signature when one is declared, and
    /// succeeding for an overloaded candidate when any member signature
    /// satisfies it); otherwise tag equality.
    pub fn accepts(&self, candidate: &ArgType) -> bool {
        match self {
            TypeSpec::Any => true,
            TypeSpec::Function(None) => matches!(candidate, ArgType::Function(_)),
            TypeSpec::Function(Some(sig)) => match candidate {
                ArgType::Function(set) => set
                    .overloads()
                    .iter()
                    .any(|o| sig.accepts_signature(o.signature())),
                ArgType::Concrete(_) => false,
            },
            TypeSpec::Concrete(tag) => match candidate {
                ArgType::Concrete(t) => tag == t,
                ArgType::Function(_) => *tag == tags::FUNCTION,
            },
        }
    }

    /// The same compatibility relation applied between two declared
    /// constraints, used when a signature is checked against another
    /// signature. Asymmetric: `declared.accepts_spec(candidate)`.
    pub fn accepts_spec(&self, candidate: &TypeSpec) -> bool {
        match self {
            TypeSpec::Any => true,
            TypeSpec::Function(None) => candidate.is_function(),
            TypeSpec::Function(Some(sig)) => match candidate {
                TypeSpec::Function(Some(other)) => sig.accepts_signature(other),
                _ => false,
            },
            TypeSpec::Concrete(tag) => match candidate {
                TypeSpec::Concrete(t) => tag == t,
                TypeSpec::Function(_) => *tag == tags::FUNCTION,
                TypeSpec::Any => false,
            },
        }
    }
}

/// The runtime type of one actual argument: a concrete tag, or a function
/// value exposing its overload set. A function value with a single signature
/// is the one-element case of the same shape.
#[derive(Clone)]
pub enum ArgType {
    Concrete(TypeTag),
    Function(Arc<OverloadSet>),
}

impl ArgType {
    pub fn describe(&self) -> String {
        match self {
            ArgType::Concrete(tag) => type_registry::name_of(*tag).to_string(),
            ArgType::Function(set) => {
                let mut sigs: Vec<String> = set
                    .overloads()
                    .iter()
                    .map(|o| o.signature().describe())
                    .collect();
                if sigs.len() == 1 {
                    format!("Fn<{}>", sigs.remove(0))
                } else {
                    "Fn".to_string()
                }
            }
        }
    }
}

impl fmt::Debug for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Renders an argument type list for diagnostics: `Number Number`.
pub fn describe_args(args: &[ArgType]) -> String {
    args.iter()
        .map(ArgType::describe)
        .collect::<Vec<_>>()
        .join(" ")
}
