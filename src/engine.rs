//! FixtureFactory - the instance synthesis engine
//!
//! For a requested type the engine tries, in order and first match wins:
//!
//! 1. a registered custom creator supporting the raw class,
//! 2. a random constant if the class is an enumeration,
//! 3. the built-in scalars, arrays, containers and date/time values,
//! 4. constructor probing: catalogued constructors sorted by ascending
//!    arity, each parameter synthesized recursively, until one succeeds.
//!
//! Before dispatching, the type's formal parameters are bound to its
//! arguments and merged over the caller's binding (see [`crate::resolver`]).

use crate::builtins;
use crate::bulk::BulkFixtureFactory;
use crate::catalog::{Catalog, ClassKind, Constructor};
use crate::config::FixtureConfig;
use crate::error::FixtureError;
use crate::fixture::Fixture;
use crate::random::RandomSource;
use crate::resolver;
use crate::types::{RawClass, TypeBinding, TypeDescriptor};
use crate::value::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

/// Creates random instances of arbitrary catalogued and built-in types.
///
/// The factory is read-only once built. Every top-level call opens its own
/// [`Synthesis`] with a private random source, so a factory can be shared
/// between threads.
#[derive(Debug)]
pub struct FixtureFactory {
    config: FixtureConfig,
    catalog: Catalog,
    calls: AtomicU64,
}

impl FixtureFactory {
    pub fn new(config: FixtureConfig, catalog: Catalog) -> Self {
        FixtureFactory {
            config,
            catalog,
            calls: AtomicU64::new(0),
        }
    }

    /// Factory with the default configuration.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::new(FixtureConfig::default(), catalog)
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Opens a synthesis call tree with its own random source.
    ///
    /// With a configured seed the n-th session is seeded with `seed + n`,
    /// which keeps a sequence of calls reproducible.
    pub fn session(&self) -> Synthesis<'_> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let random = match self.config.seed() {
            Some(seed) => RandomSource::from_seed(seed.wrapping_add(call)),
            None => RandomSource::from_entropy(),
        };
        Synthesis {
            factory: self,
            random,
        }
    }

    /// Random instance of `T`, described by its [`Fixture`] impl.
    pub fn synthesize<T: Fixture>(&self) -> Result<T, FixtureError> {
        self.session().synthesize_as::<T>()
    }

    /// Random value of the type described by `ty`.
    pub fn synthesize_type(&self, ty: &TypeDescriptor) -> Result<Value, FixtureError> {
        self.session().synthesize(ty, None, None)
    }

    /// Bulk operations over the catalogued classes whose name starts with
    /// `base_scope`.
    pub fn bulk_operations(&self, base_scope: &str) -> BulkFixtureFactory<'_> {
        BulkFixtureFactory::new(self, base_scope)
    }
}

/// One top-level synthesis call and the handle custom creators recurse with.
pub struct Synthesis<'a> {
    factory: &'a FixtureFactory,
    random: RandomSource,
}

impl<'a> Synthesis<'a> {
    pub fn config(&self) -> &'a FixtureConfig {
        &self.factory.config
    }

    pub fn random(&mut self) -> &mut RandomSource {
        &mut self.random
    }

    pub fn synthesize_as<T: Fixture>(&mut self) -> Result<T, FixtureError> {
        let value = self.synthesize(&T::type_descriptor(), None, None)?;
        T::from_value(value)
    }

    /// Synthesizes a value of `ty`.
    ///
    /// `binding` carries the type parameters of the enclosing generic
    /// context and `param_name` the constructor parameter being filled.
    pub fn synthesize(
        &mut self,
        ty: &TypeDescriptor,
        binding: Option<&TypeBinding>,
        param_name: Option<&str>,
    ) -> Result<Value, FixtureError> {
        let raw = resolver::require_class(ty)?;
        let factory = self.factory;

        let formals = factory.catalog.formal_params(raw);
        let binding = resolver::resolve_binding(ty, &formals, binding);

        if let Some(creator) = factory.config.creators().find_match(raw) {
            log::trace!("custom creator takes over {}", ty);
            return creator.create(self, &binding, param_name);
        }

        if let Some(constant) = self.select_enum_constant(raw)? {
            return Ok(constant);
        }

        if let Some(value) = builtins::synthesize_builtin(self, raw, &binding, param_name)? {
            log::trace!("built-in {} for {}", value.kind(), ty);
            return Ok(value);
        }

        log::trace!("probing constructors of {}", ty);
        self.construct(raw, &binding)
    }

    fn select_enum_constant(&mut self, raw: &RawClass) -> Result<Option<Value>, FixtureError> {
        let def = match self.factory.catalog.lookup(raw) {
            Some(def) => def,
            None => return Ok(None),
        };
        let constants = match def.kind() {
            ClassKind::Enumeration(constants) => constants,
            ClassKind::Constructible(_) => return Ok(None),
        };
        if constants.is_empty() {
            return Err(FixtureError::NoUsableConstructor {
                class: raw.to_string(),
                source: Some(Box::new(FixtureError::construction(
                    "enumeration declares no constants",
                ))),
            });
        }

        let picked = constants[self.random.index(constants.len())].clone();
        log::trace!("picked {}.{}", raw, picked);
        Ok(Some(Value::Enum {
            class: def.name().clone(),
            constant: picked,
        }))
    }

    fn construct(&mut self, raw: &RawClass, binding: &TypeBinding) -> Result<Value, FixtureError> {
        let factory = self.factory;
        let mut candidates: Vec<&Constructor> = match factory.catalog.lookup(raw) {
            Some(def) if def.is_abstract() => {
                log::debug!("{} is abstract, not probing its constructors", raw);
                Vec::new()
            }
            Some(def) => match def.kind() {
                ClassKind::Constructible(constructors) => constructors.iter().collect(),
                ClassKind::Enumeration(_) => Vec::new(),
            },
            None => Vec::new(),
        };
        candidates.sort_by_key(|constructor| constructor.arity());

        let mut last_failure = None;
        for constructor in candidates {
            match self.try_constructor(constructor, binding) {
                Ok(instance) => return Ok(instance),
                Err(err) => {
                    log::debug!(
                        "Couldn't create instance of {} with {}-arg constructor: {}",
                        raw,
                        constructor.arity(),
                        err
                    );
                    last_failure = Some(err);
                }
            }
        }

        Err(FixtureError::NoUsableConstructor {
            class: raw.to_string(),
            source: last_failure.map(Box::new),
        })
    }

    fn try_constructor(
        &mut self,
        constructor: &Constructor,
        binding: &TypeBinding,
    ) -> Result<Value, FixtureError> {
        let mut args = Vec::with_capacity(constructor.arity());
        for param in constructor.params() {
            let ty = resolver::substitute(&param.ty, binding);
            args.push(self.synthesize(&ty, Some(binding), param.name.as_deref())?);
        }

        match catch_unwind(AssertUnwindSafe(|| constructor.invoke(args))) {
            Ok(result) => result,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(FixtureError::construction(format!(
                    "constructor panicked: {}",
                    message
                )))
            }
        }
    }
}
