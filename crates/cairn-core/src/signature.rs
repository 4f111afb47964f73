use crate::types::{ArgType, TypeSpec};

/// A fixed parameter list, a return type, and a variadic flag. When the flag
/// is set the last parameter's type absorbs zero or more trailing arguments,
/// so `(Number, String...)` takes one Number and then any count of Strings
/// including none.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    params: Vec<TypeSpec>,
    ret: TypeSpec,
    variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<TypeSpec>, ret: TypeSpec) -> Self {
        Signature {
            params,
            ret,
            variadic: false,
        }
    }

    /// A signature whose last declared parameter absorbs the tail. Panics if
    /// there is no parameter to carry the tail type.
    pub fn variadic(params: Vec<TypeSpec>, ret: TypeSpec) -> Self {
        if params.is_empty() {
            panic!("variadic signature needs at least one parameter");
        }
        Signature {
            params,
            ret,
            variadic: true,
        }
    }

    pub fn params(&self) -> &[TypeSpec] {
        &self.params
    }

    pub fn ret(&self) -> &TypeSpec {
        &self.ret
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Arity check plus per-position type check against actual argument
    /// types. For a variadic signature the fixed prefix matches positionally
    /// and the tail type must accept every remaining argument; the tail may
    /// be empty.
    pub fn accepts_args(&self, args: &[ArgType]) -> bool {
        if self.variadic {
            let fixed = self.params.len() - 1;
            if args.len() < fixed {
                return false;
            }
            let tail = &self.params[fixed];
            self.params[..fixed]
                .iter()
                .zip(&args[..fixed])
                .all(|(p, a)| p.accepts(a))
                && args[fixed..].iter().all(|a| tail.accepts(a))
        } else {
            self.params.len() == args.len()
                && self
                    .params
                    .iter()
                    .zip(args)
                    .all(|(p, a)| p.accepts(a))
        }
    }

    /// Is a candidate function with signature `other` usable where this
    /// signature is declared? Every call shape this signature admits must be
    /// admitted by the candidate, so a variadic candidate cannot stand in
    /// for a fixed declaration's wider obligations and vice versa is checked
    /// shape-wise; parameter types check contravariant-free, positionally,
    /// and the return type covariantly.
    pub fn accepts_signature(&self, other: &Signature) -> bool {
        if other.variadic != self.variadic || other.params.len() != self.params.len() {
            return false;
        }
        self.params
            .iter()
            .zip(&other.params)
            .all(|(p, o)| p.accepts_spec(o))
            && self.ret.accepts_spec(&other.ret)
    }

    /// `Number Number -> Number`, with `...` marking a variadic tail.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self.params.iter().map(TypeSpec::describe).collect();
        if self.variadic {
            if let Some(last) = parts.last_mut() {
                last.push_str("...");
            }
        }
        if parts.is_empty() {
            format!("-> {}", self.ret.describe())
        } else {
            format!("{} -> {}", parts.join(" "), self.ret.describe())
        }
    }
}
