//! Custom creators
//!
//! A custom creator takes over construction of every class it supports,
//! including classes the engine already knows how to build. Creators are
//! scanned in registration order and the first one that supports a class
//! wins, so narrower creators have to be registered before broader ones.

use crate::engine::Synthesis;
use crate::error::FixtureError;
use crate::types::{RawClass, TypeBinding};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

pub trait CustomCreator: Send + Sync {
    fn supports(&self, class: &RawClass) -> bool;

    /// Builds a value for a supported class.
    ///
    /// `synthesis` can be used to request random sub-values, `binding` holds
    /// the type parameters visible at this point and `param_name` is the
    /// constructor parameter being filled, if any.
    fn create(
        &self,
        synthesis: &mut Synthesis<'_>,
        binding: &TypeBinding,
        param_name: Option<&str>,
    ) -> Result<Value, FixtureError>;
}

/// Creator assembled from a predicate and a factory closure.
pub struct FnCreator<S, C> {
    supports: S,
    create: C,
}

impl<S, C> CustomCreator for FnCreator<S, C>
where
    S: Fn(&RawClass) -> bool + Send + Sync,
    C: Fn(&mut Synthesis<'_>, &TypeBinding, Option<&str>) -> Result<Value, FixtureError>
        + Send
        + Sync,
{
    fn supports(&self, class: &RawClass) -> bool {
        (self.supports)(class)
    }

    fn create(
        &self,
        synthesis: &mut Synthesis<'_>,
        binding: &TypeBinding,
        param_name: Option<&str>,
    ) -> Result<Value, FixtureError> {
        (self.create)(synthesis, binding, param_name)
    }
}

pub fn creator<S, C>(supports: S, create: C) -> FnCreator<S, C>
where
    S: Fn(&RawClass) -> bool + Send + Sync,
    C: Fn(&mut Synthesis<'_>, &TypeBinding, Option<&str>) -> Result<Value, FixtureError>
        + Send
        + Sync,
{
    FnCreator { supports, create }
}

/// Creator that always answers `value` for exactly `class`.
pub fn fixed(class: RawClass, value: Value) -> impl CustomCreator {
    creator(
        move |candidate: &RawClass| *candidate == class,
        move |_: &mut Synthesis<'_>, _: &TypeBinding, _: Option<&str>| Ok(value.clone()),
    )
}

/// Ordered list of registered creators.
#[derive(Clone, Default)]
pub struct CreatorRegistry {
    creators: Vec<Arc<dyn CustomCreator>>,
}

impl CreatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: CustomCreator + 'static>(&mut self, creator: C) {
        self.creators.push(Arc::new(creator));
    }

    /// First registered creator supporting `class`.
    pub fn find_match(&self, class: &RawClass) -> Option<&dyn CustomCreator> {
        self.creators
            .iter()
            .find(|creator| creator.supports(class))
            .map(|creator| creator.as_ref())
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

impl fmt::Debug for CreatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatorRegistry")
            .field("creators", &self.creators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::FixtureConfig;
    use crate::engine::FixtureFactory;

    fn answer(synthesis: &mut Synthesis<'_>, creator: &dyn CustomCreator) -> Value {
        creator
            .create(synthesis, &TypeBinding::new(), None)
            .expect("creator failed")
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut registry = CreatorRegistry::new();
        registry.register(fixed(RawClass::Int, Value::Int(1)));
        registry.register(creator(
            |_: &RawClass| true,
            |_: &mut Synthesis<'_>, _: &TypeBinding, _: Option<&str>| Ok(Value::Int(2)),
        ));

        let factory = FixtureFactory::new(FixtureConfig::default(), Catalog::new());
        let mut synthesis = factory.session();

        let for_int = registry.find_match(&RawClass::Int).expect("no creator for Int");
        assert_eq!(answer(&mut synthesis, for_int), Value::Int(1));

        let for_long = registry.find_match(&RawClass::Long).expect("no creator for Long");
        assert_eq!(answer(&mut synthesis, for_long), Value::Int(2));
    }

    #[test]
    fn test_no_match_when_nothing_supports_class() {
        let mut registry = CreatorRegistry::new();
        registry.register(fixed(RawClass::Int, Value::Int(1)));

        assert!(registry.find_match(&RawClass::String).is_none());
        assert!(CreatorRegistry::new().find_match(&RawClass::Int).is_none());
        assert_eq!(registry.len(), 1);
    }
}
