use keel_orm::{Model, registry};
use keel_orm_tests::{LineItem, Order, Tag};

#[test]
fn test_entity_is_derived_once() {
    let first = Order::entity().expect("Failed to derive descriptor");
    let second = registry::describe::<Order>().expect("Failed to derive descriptor");

    assert!(std::ptr::eq(first, second));
    assert!(registry::is_described::<Order>());
}

#[test]
fn test_concurrent_first_use() {
    let entities = std::thread::scope(|s| {
        (0..16)
            .map(|_| s.spawn(|| Tag::entity().map(|e| e.table_name().as_ptr() as usize)))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|e| e.join().expect("Thread panicked"))
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to derive descriptor")
    });

    assert_eq!(entities.len(), 16);
    assert!(entities.windows(2).all(|e| e[0] == e[1]));
}

#[test]
fn test_fresh_derivation_is_independent() {
    let cached = LineItem::entity().expect("Failed to derive descriptor");
    let fresh = keel_orm::EntityDescriptor::<LineItem>::new().expect("Failed to derive descriptor");

    assert!(!std::ptr::eq(cached, &fresh));
    assert_eq!(cached.table_name(), fresh.table_name());
    assert_eq!(cached.schema(), fresh.schema());
}
