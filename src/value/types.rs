// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declared-type lattice for validated elements.
//!
//! Every constrained element (property, parameter, container element,
//! return value) carries a declared type. Validator resolution walks the
//! supertype lattice of that declared type to find the most specific
//! validator, so the lattice is part of the engine's observable contract:
//!
//! * scalar types sit under `Any`, with `Integer` and `Decimal` sharing the
//!   abstract `Number` supertype,
//! * machine scalars (`PrimitiveInt`, `PrimitiveBool`, `PrimitiveDecimal`)
//!   box to their nullable forms before any hierarchy walk,
//! * entity types contribute their declared supertype edges from the
//!   [`TypeRegistry`], terminating at `Any`,
//! * container types (`Sequence`, `Mapping`, `Optional`) are erased: type
//!   arguments appear only as [`TypeArg`] uses and validators may only bind
//!   to the erased container with wildcard arguments.

use std::fmt;

use indexmap::IndexMap;

/// Identity of a declared type in the validated universe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Top of the lattice; every type is assignable to it.
    Any,
    Bool,
    Integer,
    Decimal,
    Text,
    /// Abstract supertype of `Integer` and `Decimal`.
    Number,
    Sequence,
    Mapping,
    Optional,
    /// A user-declared entity type, keyed by its registered name.
    Entity(String),
    /// The parameter array of an executable, for cross-parameter validators.
    ParameterArray,
    /// Non-nullable machine scalars; box to the nullable forms on resolution.
    PrimitiveBool,
    PrimitiveInt,
    PrimitiveDecimal,
}

impl ValueType {
    /// Whether this is a machine scalar that promotes to a nullable form.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueType::PrimitiveBool | ValueType::PrimitiveInt | ValueType::PrimitiveDecimal
        )
    }

    /// The boxed form of this type. Identity for everything non-primitive.
    pub fn boxed(&self) -> ValueType {
        match self {
            ValueType::PrimitiveBool => ValueType::Bool,
            ValueType::PrimitiveInt => ValueType::Integer,
            ValueType::PrimitiveDecimal => ValueType::Decimal,
            other => other.clone(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Any => write!(f, "Any"),
            ValueType::Bool => write!(f, "Bool"),
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Decimal => write!(f, "Decimal"),
            ValueType::Text => write!(f, "Text"),
            ValueType::Number => write!(f, "Number"),
            ValueType::Sequence => write!(f, "Sequence"),
            ValueType::Mapping => write!(f, "Mapping"),
            ValueType::Optional => write!(f, "Optional"),
            ValueType::Entity(name) => write!(f, "{}", name),
            ValueType::ParameterArray => write!(f, "ParameterArray"),
            ValueType::PrimitiveBool => write!(f, "bool"),
            ValueType::PrimitiveInt => write!(f, "int"),
            ValueType::PrimitiveDecimal => write!(f, "decimal"),
        }
    }
}

/// A type argument in a parameterised type use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    /// Unbounded wildcard; the only argument shape validators may declare.
    Wildcard,
    /// A concrete argument; legal on element declarations, rejected on
    /// validator declarations at resolution time.
    Exact(TypeUse),
}

/// A use of a type at a declaration site: the erased base plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeUse {
    pub base: ValueType,
    pub args: Vec<TypeArg>,
}

impl TypeUse {
    /// A raw (non-parameterised) type use.
    pub fn raw(base: ValueType) -> Self {
        TypeUse { base, args: Vec::new() }
    }

    /// A parameterised type use.
    pub fn parameterised(base: ValueType, args: Vec<TypeArg>) -> Self {
        TypeUse { base, args }
    }

    /// Whether every type argument is an unbounded wildcard (or there are none).
    pub fn is_raw_or_wildcarded(&self) -> bool {
        self.args.iter().all(|a| matches!(a, TypeArg::Wildcard))
    }

    /// The declared type of the argument at `index`, when it is concrete.
    pub fn arg_type(&self, index: usize) -> Option<&TypeUse> {
        match self.args.get(index) {
            Some(TypeArg::Exact(inner)) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for TypeUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match arg {
                    TypeArg::Wildcard => write!(f, "?")?,
                    TypeArg::Exact(inner) => write!(f, "{}", inner)?,
                }
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Shape of a parameter of a declared executable.
#[derive(Debug, Clone)]
pub struct ParameterShape {
    /// Declared parameter name, when the metadata carries one. The
    /// `ParameterNameProvider` collaborator fills the gap otherwise.
    pub name: Option<String>,
    pub declared: TypeUse,
}

/// Shape of a declared method or constructor, keyed by caller-chosen signature.
#[derive(Debug, Clone)]
pub struct ExecutableShape {
    pub name: String,
    pub parameters: Vec<ParameterShape>,
    pub return_type: Option<TypeUse>,
}

/// Structural shape of a registered entity type.
///
/// The shape is the class model of the validated universe: property names
/// with their declared types, executables by signature, and supertype
/// edges. Constraint metadata attaches to shapes through the metadata
/// sources; the shape itself carries no constraints.
#[derive(Debug, Clone, Default)]
pub struct EntityShape {
    pub supertypes: Vec<String>,
    pub properties: IndexMap<String, TypeUse>,
    pub methods: IndexMap<String, ExecutableShape>,
    pub constructors: IndexMap<String, ExecutableShape>,
}

impl EntityShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, declared: TypeUse) -> Self {
        self.properties.insert(name.into(), declared);
        self
    }

    pub fn with_method(mut self, signature: impl Into<String>, shape: ExecutableShape) -> Self {
        self.methods.insert(signature.into(), shape);
        self
    }

    pub fn with_constructor(mut self, signature: impl Into<String>, shape: ExecutableShape) -> Self {
        self.constructors.insert(signature.into(), shape);
        self
    }
}

/// Registry of entity shapes, keyed by type name.
///
/// Registration order is preserved; lookups during descriptor builds and
/// validator resolution borrow the registered shape.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entities: IndexMap<String, EntityShape>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, shape: EntityShape) {
        self.entities.insert(name.into(), shape);
    }

    pub fn shape(&self, name: &str) -> Option<&EntityShape> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Direct supertypes of a type, in declaration order.
    ///
    /// Scalar edges are fixed; entity edges come from the registered shape.
    /// Every chain that declares no supertype of its own falls through to
    /// `Any`, so ascending walks always terminate.
    pub fn direct_supertypes(&self, value_type: &ValueType) -> Vec<ValueType> {
        match value_type {
            ValueType::Any => vec![],
            ValueType::Integer | ValueType::Decimal => vec![ValueType::Number],
            ValueType::Entity(name) => {
                let declared: Vec<ValueType> = self
                    .shape(name)
                    .map(|s| {
                        s.supertypes
                            .iter()
                            .map(|n| ValueType::Entity(n.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                if declared.is_empty() {
                    vec![ValueType::Any]
                } else {
                    declared
                }
            }
            // Primitives box before any walk; treat their supers as the boxed form's.
            prim if prim.is_primitive() => vec![prim.boxed()],
            _ => vec![ValueType::Any],
        }
    }

    /// Whether `sub` is assignable to `sup` (reflexive, ascending walk).
    pub fn is_assignable(&self, sub: &ValueType, sup: &ValueType) -> bool {
        if sup == &ValueType::Any || sub == sup {
            return true;
        }
        // Guard against cyclic supertype declarations; the walk must
        // terminate even over malformed registrations.
        let mut visited: Vec<ValueType> = Vec::new();
        let mut frontier = self.direct_supertypes(sub);
        while let Some(t) = frontier.pop() {
            if &t == sup {
                return true;
            }
            if visited.contains(&t) {
                continue;
            }
            visited.push(t.clone());
            frontier.extend(self.direct_supertypes(&t));
        }
        false
    }
}
