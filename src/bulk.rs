//! Bulk fixture creation
//!
//! Discovers catalogued classes by supertype or by marker and synthesizes
//! one instance of each concrete class found. Discovered classes are
//! requested star-projected, since discovery knows nothing about their type
//! arguments.

use crate::catalog::ClassDef;
use crate::engine::FixtureFactory;
use crate::error::FixtureError;
use crate::fixture::Fixture;
use crate::value::Value;

pub struct BulkFixtureFactory<'a> {
    factory: &'a FixtureFactory,
    base_scope: String,
}

impl<'a> BulkFixtureFactory<'a> {
    pub fn new(factory: &'a FixtureFactory, base_scope: &str) -> Self {
        BulkFixtureFactory {
            factory,
            base_scope: base_scope.to_string(),
        }
    }

    /// Class name prefix limiting discovery
    pub fn base_scope(&self) -> &str {
        &self.base_scope
    }

    /// One instance of every concrete class extending `supertype`.
    pub fn instances_of_subtypes(&self, supertype: &str) -> Result<Vec<Value>, FixtureError> {
        let found = self.factory.catalog().subtypes_of(supertype);
        self.instantiate(found)
    }

    pub fn instances_of_subtypes_as<T: Fixture>(&self, supertype: &str) -> Result<Vec<T>, FixtureError> {
        self.instances_of_subtypes(supertype)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    /// One instance of every concrete class carrying `marker`.
    pub fn instances_by_marker(&self, marker: &str) -> Result<Vec<Value>, FixtureError> {
        let found = self.factory.catalog().marked_with(marker);
        self.instantiate(found)
    }

    fn instantiate(&self, found: Vec<&ClassDef>) -> Result<Vec<Value>, FixtureError> {
        found
            .into_iter()
            .filter(|def| !def.is_abstract() && def.name().starts_with(self.base_scope.as_str()))
            .map(|def| {
                log::debug!("bulk synthesis of {}", def.name());
                self.factory.synthesize_type(&def.star_projected())
            })
            .collect()
    }
}
