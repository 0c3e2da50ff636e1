//! Type descriptors
//!
//! The engine can't inspect Rust types at runtime, so every request names its
//! type explicitly: a raw class plus, for generic classes, the ordered list of
//! type arguments. Arguments may still be symbolic (a formal parameter of some
//! enclosing class) or unknown (`Star`) until the resolver replaces them.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

pub type ClassName = Arc<str>;

/// The raw classifier of a type, without its type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawClass {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,

    BooleanArray,
    ByteArray,
    CharArray,
    ShortArray,
    IntArray,
    LongArray,
    FloatArray,
    DoubleArray,

    /// `Array<T>`, elements typed by the declared argument
    Array,
    List,
    Collection,
    Set,
    Map,

    Instant,
    LocalDate,
    LocalDateTime,
    ZonedDateTime,
    ZoneOffset,

    /// A class registered in the [`Catalog`](crate::catalog::Catalog)
    Named(ClassName),
}

impl RawClass {
    pub fn named(name: &str) -> RawClass {
        RawClass::Named(Arc::from(name))
    }

    /// Formal parameter names declared by the built-in generic kinds.
    pub fn builtin_params(&self) -> &'static [&'static str] {
        match self {
            RawClass::Array => &["T"],
            RawClass::List | RawClass::Collection | RawClass::Set => &["E"],
            RawClass::Map => &["K", "V"],
            _ => &[],
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, RawClass::Named(_))
    }

    pub fn name(&self) -> &str {
        match self {
            RawClass::Boolean => "Boolean",
            RawClass::Byte => "Byte",
            RawClass::Short => "Short",
            RawClass::Int => "Int",
            RawClass::Long => "Long",
            RawClass::Float => "Float",
            RawClass::Double => "Double",
            RawClass::Char => "Char",
            RawClass::String => "String",
            RawClass::BooleanArray => "BooleanArray",
            RawClass::ByteArray => "ByteArray",
            RawClass::CharArray => "CharArray",
            RawClass::ShortArray => "ShortArray",
            RawClass::IntArray => "IntArray",
            RawClass::LongArray => "LongArray",
            RawClass::FloatArray => "FloatArray",
            RawClass::DoubleArray => "DoubleArray",
            RawClass::Array => "Array",
            RawClass::List => "List",
            RawClass::Collection => "Collection",
            RawClass::Set => "Set",
            RawClass::Map => "Map",
            RawClass::Instant => "Instant",
            RawClass::LocalDate => "LocalDate",
            RawClass::LocalDateTime => "LocalDateTime",
            RawClass::ZonedDateTime => "ZonedDateTime",
            RawClass::ZoneOffset => "ZoneOffset",
            RawClass::Named(name) => &**name,
        }
    }
}

impl fmt::Display for RawClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A formal type parameter, unique per declaring class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub owner: RawClass,
    pub name: Arc<str>,
}

impl TypeParam {
    pub fn new(owner: RawClass, name: &str) -> Self {
        TypeParam {
            owner,
            name: Arc::from(name),
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Class { raw: RawClass, args: Vec<TypeDescriptor> },
    /// Still symbolic: a formal parameter of an enclosing class
    Param(TypeParam),
    /// Star projection, the argument is unknown
    Star,
}

impl TypeDescriptor {
    pub fn of(raw: RawClass) -> Self {
        TypeDescriptor::Class {
            raw,
            args: Vec::new(),
        }
    }

    pub fn generic(raw: RawClass, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Class { raw, args }
    }

    pub fn named(name: &str) -> Self {
        TypeDescriptor::of(RawClass::named(name))
    }

    pub fn named_generic(name: &str, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::generic(RawClass::named(name), args)
    }

    /// Reference to the formal parameter `name` declared by class `owner`.
    pub fn param(owner: &str, name: &str) -> Self {
        TypeDescriptor::Param(TypeParam::new(RawClass::named(owner), name))
    }

    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::generic(RawClass::Array, vec![element])
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::generic(RawClass::List, vec![element])
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::generic(RawClass::Set, vec![element])
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::generic(RawClass::Map, vec![key, value])
    }

    pub fn raw_class(&self) -> Option<&RawClass> {
        match self {
            TypeDescriptor::Class { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// True if no `Param` or `Star` occurs anywhere in the descriptor.
    pub fn is_concrete(&self) -> bool {
        match self {
            TypeDescriptor::Class { args, .. } => args.iter().all(TypeDescriptor::is_concrete),
            _ => false,
        }
    }
}

impl From<RawClass> for TypeDescriptor {
    fn from(raw: RawClass) -> Self {
        TypeDescriptor::of(raw)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Class { raw, args } => {
                write!(f, "{}", raw)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeDescriptor::Param(param) => write!(f, "{}", param),
            TypeDescriptor::Star => f.write_str("*"),
        }
    }
}

/// Formal parameter bindings visible at one level of the recursion.
///
/// Never mutated in place once handed to the engine: the resolver builds a
/// fresh binding per level by merging over the caller's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeBinding {
    entries: IndexMap<TypeParam, TypeDescriptor>,
}

impl TypeBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, param: &TypeParam) -> Option<&TypeDescriptor> {
        self.entries.get(param)
    }

    /// Copy of this binding with `param` bound to `ty`, replacing any
    /// previous entry for `param`.
    pub fn with(&self, param: TypeParam, ty: TypeDescriptor) -> TypeBinding {
        let mut next = self.clone();
        next.entries.insert(param, ty);
        next
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, param: TypeParam, ty: TypeDescriptor) {
        self.entries.insert(param, ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested_generic() {
        let ty = TypeDescriptor::map(
            TypeDescriptor::of(RawClass::String),
            TypeDescriptor::list(TypeDescriptor::param("Box", "T")),
        );
        assert_eq!(ty.to_string(), "Map<String, List<Box.T>>");
    }

    #[test]
    fn test_concreteness() {
        assert!(TypeDescriptor::list(RawClass::Int.into()).is_concrete());
        assert!(!TypeDescriptor::list(TypeDescriptor::Star).is_concrete());
        assert!(!TypeDescriptor::param("Box", "T").is_concrete());
    }

    #[test]
    fn test_binding_with_leaves_base_untouched() {
        let param = TypeParam::new(RawClass::named("Box"), "T");
        let base = TypeBinding::new();
        let next = base.with(param.clone(), RawClass::Int.into());

        assert!(base.is_empty());
        assert_eq!(next.get(&param), Some(&TypeDescriptor::of(RawClass::Int)));
    }
}
