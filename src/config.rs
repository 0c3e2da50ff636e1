//! Fixture configuration
//!
//! Bounds and sizes the engine draws within, plus the registered custom
//! creators. Built once through [`FixtureConfigBuilder`] and read-only
//! afterwards.

use crate::creator::{CreatorRegistry, CustomCreator};
use crate::error::FixtureError;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct FixtureConfig {
    int_range: Range<i32>,
    string_length: usize,
    array_length: usize,
    collection_size: usize,
    creators: CreatorRegistry,
    seed: Option<u64>,
}

impl FixtureConfig {
    pub fn builder() -> FixtureConfigBuilder {
        FixtureConfigBuilder::default()
    }

    /// Range for `Int` values, lower bound inclusive, upper bound exclusive
    pub fn int_range(&self) -> Range<i32> {
        self.int_range.clone()
    }

    /// Target length of random strings, parameter name prefix excluded
    pub fn string_length(&self) -> usize {
        self.string_length
    }

    pub fn array_length(&self) -> usize {
        self.array_length
    }

    /// Number of elements drawn for lists, sets and maps
    pub fn collection_size(&self) -> usize {
        self.collection_size
    }

    pub fn creators(&self) -> &CreatorRegistry {
        &self.creators
    }

    /// Base seed for reproducible runs, `None` draws from OS entropy
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            int_range: 0..i32::MAX,
            string_length: 10,
            array_length: 10,
            collection_size: 10,
            creators: CreatorRegistry::new(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureConfigBuilder {
    config: FixtureConfig,
}

impl FixtureConfigBuilder {
    pub fn int_range(mut self, range: Range<i32>) -> Self {
        self.config.int_range = range;
        self
    }

    pub fn string_length(mut self, length: usize) -> Self {
        self.config.string_length = length;
        self
    }

    pub fn array_length(mut self, length: usize) -> Self {
        self.config.array_length = length;
        self
    }

    pub fn collection_size(mut self, size: usize) -> Self {
        self.config.collection_size = size;
        self
    }

    /// Appends a creator. Creators registered earlier take precedence.
    pub fn custom_creator<C: CustomCreator + 'static>(mut self, creator: C) -> Self {
        self.config.creators.register(creator);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<FixtureConfig, FixtureError> {
        let range = &self.config.int_range;
        if range.start >= range.end {
            return Err(FixtureError::InvalidConfiguration(format!(
                "int range {}..{} is empty",
                range.start, range.end
            )));
        }
        Ok(self.config)
    }
}
