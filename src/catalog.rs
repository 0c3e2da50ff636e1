//! Class catalog
//!
//! The engine has no reflection to fall back on, so every user class it can
//! build is described here: its formal type parameters, its constructors
//! (or enumeration constants), whether it is abstract, what it extends and
//! which markers it carries. Built-in kinds never appear in the catalog.

use crate::error::FixtureError;
use crate::types::{ClassName, RawClass, TypeDescriptor, TypeParam};
use crate::value::{Record, Value};
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

pub type ConstructorFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, FixtureError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Option<Arc<str>>,
    /// Declared type, may mention the owning class's formal parameters
    pub ty: TypeDescriptor,
}

impl Parameter {
    pub fn named(name: &str, ty: TypeDescriptor) -> Self {
        Parameter {
            name: Some(Arc::from(name)),
            ty,
        }
    }

    pub fn positional(ty: TypeDescriptor) -> Self {
        Parameter { name: None, ty }
    }
}

#[derive(Clone)]
pub struct Constructor {
    params: Vec<Parameter>,
    body: ConstructorFn,
}

impl Constructor {
    pub fn new<F>(params: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, FixtureError> + Send + Sync + 'static,
    {
        Constructor {
            params,
            body: Arc::new(body),
        }
    }

    /// Constructor returning a [`Record`] of `class` whose fields are the
    /// arguments, named after the parameters.
    pub fn record(class: &str, params: Vec<Parameter>) -> Self {
        let class: ClassName = Arc::from(class);
        let names: Vec<Option<Arc<str>>> = params.iter().map(|p| p.name.clone()).collect();
        Constructor::new(params, move |args| {
            Ok(Value::Record(Record {
                class: class.clone(),
                fields: names.iter().cloned().zip(args).collect(),
            }))
        })
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, FixtureError> {
        if args.len() != self.params.len() {
            return Err(FixtureError::construction(format!(
                "expected {} arguments, got {}",
                self.params.len(),
                args.len()
            )));
        }
        (self.body)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum ClassKind {
    Enumeration(Vec<Arc<str>>),
    Constructible(Vec<Constructor>),
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    name: ClassName,
    type_params: Vec<Arc<str>>,
    kind: ClassKind,
    is_abstract: bool,
    supertypes: Vec<ClassName>,
    markers: Vec<Arc<str>>,
}

impl ClassDef {
    /// A constructible class, initially without constructors.
    pub fn class(name: &str) -> Self {
        ClassDef {
            name: Arc::from(name),
            type_params: Vec::new(),
            kind: ClassKind::Constructible(Vec::new()),
            is_abstract: false,
            supertypes: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn enumeration(name: &str, constants: &[&str]) -> Self {
        ClassDef {
            kind: ClassKind::Enumeration(constants.iter().map(|c| Arc::from(*c)).collect()),
            ..ClassDef::class(name)
        }
    }

    /// Shorthand for a class with a single record constructor.
    pub fn record(name: &str, fields: Vec<Parameter>) -> Self {
        let constructor = Constructor::record(name, fields);
        ClassDef::class(name).constructor(constructor)
    }

    pub fn type_param(mut self, name: &str) -> Self {
        self.type_params.push(Arc::from(name));
        self
    }

    /// Adds a constructor. Enumerations have none, so it is dropped for them.
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        match &mut self.kind {
            ClassKind::Constructible(constructors) => constructors.push(constructor),
            ClassKind::Enumeration(_) => {
                log::warn!("ignoring constructor added to enumeration {}", self.name)
            }
        }
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, supertype: &str) -> Self {
        self.supertypes.push(Arc::from(supertype));
        self
    }

    pub fn marked(mut self, marker: &str) -> Self {
        self.markers.push(Arc::from(marker));
        self
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn raw_class(&self) -> RawClass {
        RawClass::Named(self.name.clone())
    }

    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn supertypes(&self) -> &[ClassName] {
        &self.supertypes
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| &**m == marker)
    }

    pub fn formal_params(&self) -> Vec<TypeParam> {
        self.type_params
            .iter()
            .map(|name| TypeParam {
                owner: self.raw_class(),
                name: name.clone(),
            })
            .collect()
    }

    /// Descriptor with every type argument unknown.
    pub fn star_projected(&self) -> TypeDescriptor {
        TypeDescriptor::generic(
            self.raw_class(),
            vec![TypeDescriptor::Star; self.type_params.len()],
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: IndexMap<ClassName, ClassDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def`, replacing an earlier class of the same name.
    pub fn define(&mut self, def: ClassDef) -> &mut Self {
        self.classes.insert(def.name.clone(), def);
        self
    }

    pub fn with(mut self, def: ClassDef) -> Self {
        self.define(def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn lookup(&self, raw: &RawClass) -> Option<&ClassDef> {
        match raw {
            RawClass::Named(name) => self.get(name),
            _ => None,
        }
    }

    /// Formal parameters declared by `raw`, built-in or catalogued.
    pub fn formal_params(&self, raw: &RawClass) -> Vec<TypeParam> {
        if raw.is_builtin() {
            return raw
                .builtin_params()
                .iter()
                .map(|name| TypeParam::new(raw.clone(), name))
                .collect();
        }
        self.lookup(raw)
            .map(ClassDef::formal_params)
            .unwrap_or_default()
    }

    /// Every class extending `supertype`, directly or transitively.
    pub fn subtypes_of(&self, supertype: &str) -> Vec<&ClassDef> {
        let mut found: Vec<&ClassDef> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::from([supertype]);

        while let Some(current) = queue.pop_front() {
            for def in self.classes.values() {
                let extends = def.supertypes.iter().any(|s| &**s == current);
                let seen = found.iter().any(|f| f.name == def.name);
                if extends && !seen && &*def.name != supertype {
                    found.push(def);
                    queue.push_back(&def.name);
                }
            }
        }
        found
    }

    /// Every class carrying `marker`, together with all of their subtypes.
    pub fn marked_with(&self, marker: &str) -> Vec<&ClassDef> {
        let mut found: Vec<&ClassDef> = Vec::new();
        for def in self.classes.values().filter(|def| def.has_marker(marker)) {
            for candidate in std::iter::once(def).chain(self.subtypes_of(&def.name)) {
                if !found.iter().any(|f| f.name == candidate.name) {
                    found.push(candidate);
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapes() -> Catalog {
        Catalog::new()
            .with(ClassDef::class("Shape").abstract_class())
            .with(ClassDef::record("Circle", vec![]).extends("Shape"))
            .with(ClassDef::class("Polygon").abstract_class().extends("Shape"))
            .with(ClassDef::record("Square", vec![]).extends("Polygon").marked("Serializable"))
            .with(ClassDef::enumeration("Color", &["RED", "GREEN"]).marked("Serializable"))
    }

    #[test]
    fn test_subtypes_are_transitive() {
        let catalog = shapes();
        let names: Vec<&str> = catalog
            .subtypes_of("Shape")
            .iter()
            .map(|def| &**def.name())
            .collect();
        assert_eq!(names, vec!["Circle", "Polygon", "Square"]);
        assert!(catalog.subtypes_of("Square").is_empty());
    }

    #[test]
    fn test_marked_with() {
        let catalog = shapes();
        let names: Vec<&str> = catalog
            .marked_with("Serializable")
            .iter()
            .map(|def| &**def.name())
            .collect();
        assert_eq!(names, vec!["Square", "Color"]);
    }

    #[test]
    fn test_marker_extends_to_subtypes() {
        let catalog = shapes().with(ClassDef::record("Cube", vec![]).extends("Square"));
        let names: Vec<&str> = catalog
            .marked_with("Serializable")
            .iter()
            .map(|def| &**def.name())
            .collect();
        assert_eq!(names, vec!["Square", "Cube", "Color"]);
    }

    #[test]
    fn test_record_constructor_names_fields() {
        let ctor = Constructor::record(
            "Point",
            vec![
                Parameter::named("x", RawClass::Int.into()),
                Parameter::named("y", RawClass::Int.into()),
            ],
        );
        let value = ctor.invoke(vec![Value::Int(1), Value::Int(2)]).unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.field("y"), Some(&Value::Int(2)));
        assert!(ctor.invoke(vec![Value::Int(1)]).is_err());
    }

    #[test]
    fn test_formal_params_of_builtin_and_named() {
        let catalog = Catalog::new().with(ClassDef::class("Pair").type_param("A").type_param("B"));

        let map = catalog.formal_params(&RawClass::Map);
        assert_eq!(map, vec![TypeParam::new(RawClass::Map, "K"), TypeParam::new(RawClass::Map, "V")]);

        let pair = catalog.formal_params(&RawClass::named("Pair"));
        assert_eq!(pair.len(), 2);
        assert_eq!(&*pair[1].name, "B");
        assert!(catalog.formal_params(&RawClass::named("Unknown")).is_empty());
    }

    #[test]
    fn test_star_projection() {
        let def = ClassDef::class("Pair").type_param("A").type_param("B");
        assert_eq!(def.star_projected().to_string(), "Pair<*, *>");
    }

    #[test]
    fn test_define_replaces_same_name() {
        let mut catalog = Catalog::new();
        catalog.define(ClassDef::class("A"));
        catalog.define(ClassDef::class("A").abstract_class());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("A").unwrap().is_abstract());
    }
}
