//! # Fixture Magic
//!
//! Random, structurally valid instances of arbitrary types for tests.
//!
//! Types are described by [`TypeDescriptor`]s. Built-in scalars, arrays,
//! containers and date/time values are synthesized directly; user classes are
//! registered in a [`Catalog`] with their constructors, which the engine
//! probes recursively. Generic arguments are propagated through any depth of
//! nesting, and [`CustomCreator`]s can take over any class.
//!
//! ```ignore
//! let catalog = Catalog::new().with(ClassDef::record(
//!     "Point",
//!     vec![
//!         Parameter::named("x", RawClass::Int.into()),
//!         Parameter::named("y", RawClass::Int.into()),
//!     ],
//! ));
//! let factory = FixtureFactory::with_catalog(catalog);
//! let point = factory.synthesize_type(&TypeDescriptor::named("Point"))?;
//! ```

pub mod bulk;
pub mod catalog;
pub mod config;
pub mod creator;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod random;
pub mod resolver;
pub mod types;
pub mod value;

mod builtins;

pub use bulk::BulkFixtureFactory;
pub use catalog::{Catalog, ClassDef, ClassKind, Constructor, Parameter};
pub use config::{FixtureConfig, FixtureConfigBuilder};
pub use creator::{creator, fixed, CreatorRegistry, CustomCreator, FnCreator};
pub use engine::{FixtureFactory, Synthesis};
pub use error::FixtureError;
pub use fixture::{field, native_of, record_of, Fixture};
pub use random::RandomSource;
pub use types::{ClassName, RawClass, TypeBinding, TypeDescriptor, TypeParam};
pub use value::{NativeValue, Record, Value};
