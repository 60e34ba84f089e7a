/// Unit tests for TypeKey

use sky_resolver::{key_of_type, TypeKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

trait Service {}

#[test]
fn test_same_type_same_key() {
    assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
    assert_eq!(key_of_type::<Vec<u8>>(), TypeKey::of::<Vec<u8>>());
}

#[test]
fn test_different_types_different_keys() {
    let keys = [
        TypeKey::of::<u32>(),
        TypeKey::of::<i32>(),
        TypeKey::of::<Arc<dyn Service>>(),
        TypeKey::of::<Box<dyn Service>>(),
        TypeKey::of::<dyn Service>(),
    ];
    let unique: HashSet<_> = keys.iter().copied().collect();
    assert_eq!(unique.len(), keys.len());
}

#[test]
fn test_display_name() {
    assert_eq!(TypeKey::of::<u32>().display_name(), "u32");
    assert_eq!(TypeKey::of::<String>().to_string(), "alloc::string::String");
    assert_eq!(format!("{:?}", TypeKey::of::<u8>()), "TypeKey(\"u8\")");
}

#[test]
fn test_type_id_matches_std() {
    assert_eq!(TypeKey::of::<u64>().type_id(), std::any::TypeId::of::<u64>());
}

#[test]
fn test_key_usable_in_maps() {
    let mut map = HashMap::new();
    map.insert(TypeKey::of::<u8>(), "byte");
    map.insert(TypeKey::of::<u16>(), "short");
    map.insert(TypeKey::of::<u8>(), "octet");

    assert_eq!(map.len(), 2);
    assert_eq!(map[&TypeKey::of::<u8>()], "octet");
}

#[test]
fn test_ordering_is_consistent_with_equality() {
    let a = TypeKey::of::<u8>();
    let b = TypeKey::of::<u16>();

    assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    assert_ne!(a.cmp(&b), std::cmp::Ordering::Equal);
    assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
}
