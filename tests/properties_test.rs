//! # Property Tests
//!
//! Bounds that must hold for any configuration and any seed.

use fixture_magic::{
    Catalog, ClassDef, FixtureConfig, FixtureFactory, Parameter, RawClass, TypeDescriptor, Value,
};
use proptest::prelude::*;

fn seeded(config: fixture_magic::FixtureConfigBuilder, seed: u64) -> FixtureFactory {
    let config = config.seed(seed).build().unwrap();
    let catalog = Catalog::new()
        .with(ClassDef::enumeration("Suit", &["CLUBS", "DIAMONDS", "HEARTS", "SPADES"]))
        .with(ClassDef::record(
            "Named",
            vec![Parameter::named("label", RawClass::String.into())],
        ));
    FixtureFactory::new(config, catalog)
}

proptest! {
    #[test]
    fn int_stays_in_configured_range(lo in -1000i32..1000, width in 1i32..500, seed in any::<u64>()) {
        let factory = seeded(FixtureConfig::builder().int_range(lo..lo + width), seed);
        for _ in 0..20 {
            let i: i32 = factory.synthesize().unwrap();
            prop_assert!(i >= lo && i < lo + width);
        }
    }

    #[test]
    fn chars_are_printable_ascii(seed in any::<u64>()) {
        let factory = seeded(FixtureConfig::builder(), seed);
        let s: String = factory.synthesize().unwrap();
        prop_assert!(s.chars().all(|c| (32..=126).contains(&(c as u32))));
        let c: char = factory.synthesize().unwrap();
        prop_assert!((32..=126).contains(&(c as u32)));
    }

    #[test]
    fn unnamed_string_has_configured_length(len in 1usize..64, seed in any::<u64>()) {
        let factory = seeded(FixtureConfig::builder().string_length(len), seed);
        let s: String = factory.synthesize().unwrap();
        prop_assert_eq!(s.chars().count(), len);
    }

    #[test]
    fn named_string_is_prefixed(len in 6usize..64, seed in any::<u64>()) {
        let factory = seeded(FixtureConfig::builder().string_length(len), seed);
        let value = factory.synthesize_type(&TypeDescriptor::named("Named")).unwrap();
        let label = value.as_record().and_then(|r| r.field("label")).and_then(Value::as_str).unwrap();
        prop_assert!(label.starts_with("label_"));
        prop_assert_eq!(label.chars().count(), "label_".len() + len - "label".len());
    }

    #[test]
    fn container_sizes_are_bounded(size in 0usize..20, seed in any::<u64>()) {
        let factory = seeded(FixtureConfig::builder().collection_size(size).array_length(size), seed);

        let list = factory.synthesize_type(&TypeDescriptor::list(RawClass::Byte.into())).unwrap();
        prop_assert_eq!(list.len(), Some(size));

        let array = factory.synthesize_type(&RawClass::DoubleArray.into()).unwrap();
        prop_assert_eq!(array.len(), Some(size));

        let set = factory.synthesize_type(&TypeDescriptor::set(RawClass::Byte.into())).unwrap();
        prop_assert!(set.len().unwrap_or(usize::MAX) <= size);

        let map_ty = TypeDescriptor::map(RawClass::Boolean.into(), RawClass::Long.into());
        let map = factory.synthesize_type(&map_ty).unwrap();
        prop_assert!(map.len().unwrap_or(usize::MAX) <= size.min(2));
    }

    #[test]
    fn enum_picks_declared_constant(seed in any::<u64>()) {
        let factory = seeded(FixtureConfig::builder(), seed);
        match factory.synthesize_type(&TypeDescriptor::named("Suit")).unwrap() {
            Value::Enum { constant, .. } => {
                prop_assert!(["CLUBS", "DIAMONDS", "HEARTS", "SPADES"].contains(&&*constant));
            }
            other => prop_assert!(false, "expected an enum constant, got {:?}", other),
        }
    }

    #[test]
    fn same_seed_same_values(seed in any::<u64>()) {
        let ty = TypeDescriptor::map(RawClass::String.into(), RawClass::Int.into());
        let a = seeded(FixtureConfig::builder(), seed);
        let b = seeded(FixtureConfig::builder(), seed);
        prop_assert_eq!(a.synthesize_type(&ty).unwrap(), b.synthesize_type(&ty).unwrap());
    }
}
