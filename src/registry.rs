//! Process-wide cache of entity descriptors, one per model type.
//!
//! Descriptors are derived lazily on first request and live for the rest of the process.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{OnceLock, PoisonError, RwLock},
};

use tracing::debug;

use crate::{
    entity::{EntityDescriptor, Model},
    error::Error,
};

type Descriptors = HashMap<TypeId, &'static (dyn Any + Send + Sync)>;

fn descriptors() -> &'static RwLock<Descriptors> {
    static DESCRIPTORS: OnceLock<RwLock<Descriptors>> = OnceLock::new();
    DESCRIPTORS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn cached<T: Model>(map: &Descriptors) -> Option<&'static EntityDescriptor<T>> {
    map.get(&TypeId::of::<T>())
        .copied()
        .and_then(|e| e.downcast_ref::<EntityDescriptor<T>>())
}

/// Return the descriptor of `T`, deriving it if this is the first request for `T`.
///
/// No lock is held while deriving, so a model's marker source may itself request other
/// descriptors. Concurrent first requests may derive more than once, but only the first
/// registered instance is kept and every caller receives that one. Failed derivations are not
/// cached.
///
/// # Errors
///
/// If deriving the descriptor fails, see [`EntityDescriptor::new`].
pub fn describe<T: Model>() -> Result<&'static EntityDescriptor<T>, Error> {
    // Entries are never removed or mutated, so a poisoned lock still guards a consistent map.
    if let Some(entity) = cached::<T>(
        &descriptors()
            .read()
            .unwrap_or_else(PoisonError::into_inner),
    ) {
        return Ok(entity);
    }

    let derived: &'static EntityDescriptor<T> = Box::leak(Box::new(EntityDescriptor::<T>::new()?));

    let mut map = descriptors()
        .write()
        .unwrap_or_else(PoisonError::into_inner);

    map.entry(TypeId::of::<T>()).or_insert(derived);
    let entity = cached::<T>(&map).unwrap_or(derived);

    if std::ptr::eq(entity, derived) {
        debug!(
            model = T::NAME,
            table = entity.table_name(),
            "registered entity descriptor"
        );
    }

    Ok(entity)
}

/// Whether the descriptor of `T` has already been derived and cached.
#[must_use]
pub fn is_described<T: Model>() -> bool {
    cached::<T>(
        &descriptors()
            .read()
            .unwrap_or_else(PoisonError::into_inner),
    )
    .is_some()
}

#[cfg(test)]
mod test {
    use crate::{
        Error, Model, ValueType,
        entity::{
            marker::{EntityMarker, FieldMarker, ForeignKeyMarker, Markers},
            member::{Member, MemberHandle},
        },
    };

    use super::{describe, is_described};

    struct Invoice {
        number: u64,
    }

    impl Model for Invoice {
        const NAME: &'static str = "Invoice";

        fn entity_marker() -> Option<EntityMarker> {
            Some(EntityMarker::table("invoices"))
        }

        fn members() -> Vec<Member<Self>> {
            vec![
                Member::new(
                    "number",
                    ValueType::of::<u64>(),
                    MemberHandle::new(
                        |m: &Self| &m.number,
                        |m: &mut Self, v| {
                            m.number = *v.downcast::<u64>()?;
                            Ok(())
                        },
                    ),
                )
                .markers(Markers::field(FieldMarker::primary_key())),
            ]
        }
    }

    struct Broken {
        lines: Vec<u64>,
    }

    impl Model for Broken {
        const NAME: &'static str = "Broken";

        fn members() -> Vec<Member<Self>> {
            vec![
                Member::new(
                    "lines",
                    ValueType::of::<Vec<u64>>(),
                    MemberHandle::new(
                        |m: &Self| &m.lines,
                        |m: &mut Self, v| {
                            m.lines = *v.downcast::<Vec<u64>>()?;
                            Ok(())
                        },
                    ),
                )
                .collection(true)
                .markers(Markers::field(FieldMarker::foreign_key(
                    ForeignKeyMarker::default(),
                ))),
            ]
        }
    }

    struct Room {
        code: String,
    }

    impl Model for Room {
        const NAME: &'static str = "Room";

        fn members() -> Vec<Member<Self>> {
            vec![
                Member::new(
                    "code",
                    ValueType::of::<String>(),
                    MemberHandle::new(
                        |m: &Self| &m.code,
                        |m: &mut Self, v| {
                            m.code = *v.downcast::<String>()?;
                            Ok(())
                        },
                    ),
                )
                .markers(Markers::field(FieldMarker::primary_key())),
            ]
        }
    }

    /// Derives its room column from the descriptor of [`Room`].
    struct Seminar {
        room: String,
    }

    impl Model for Seminar {
        const NAME: &'static str = "Seminar";

        fn members() -> Vec<Member<Self>> {
            let room = Room::entity()
                .ok()
                .and_then(|e| e.primary_keys().next().map(|e| e.column_name().to_owned()))
                .unwrap_or_default();

            vec![
                Member::new(
                    "room",
                    ValueType::of::<String>(),
                    MemberHandle::new(
                        |m: &Self| &m.room,
                        |m: &mut Self, v| {
                            m.room = *v.downcast::<String>()?;
                            Ok(())
                        },
                    ),
                )
                .markers(Markers::field(
                    FieldMarker::foreign_key(ForeignKeyMarker::default())
                        .column(format!("ROOM_{room}")),
                )),
            ]
        }
    }

    #[test]
    fn test_marker_source_may_describe_other_models() {
        let entity = describe::<Seminar>().expect("Failed to describe Seminar");

        assert_eq!(entity.select_sql(None), "SELECT ROOM_code FROM SEMINAR");
        assert!(is_described::<Room>());
        assert!(is_described::<Seminar>());
    }

    #[test]
    fn test_describe_returns_same_instance() {
        let first = describe::<Invoice>().expect("Failed to describe Invoice");
        let second = Invoice::entity().expect("Failed to describe Invoice");

        assert!(std::ptr::eq(first, second));
        assert!(is_described::<Invoice>());
        assert_eq!(first.table_name(), "invoices");
    }

    #[test]
    fn test_describe_concurrently() {
        let addresses = std::thread::scope(|s| {
            let handles = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        describe::<Invoice>().map(|e| std::ptr::from_ref(e) as usize)
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|e| e.join().expect("Thread panicked"))
                .collect::<Result<Vec<_>, _>>()
                .expect("Failed to describe Invoice")
        });

        assert!(addresses.windows(2).all(|e| e[0] == e[1]));
    }

    #[test]
    fn test_failures_are_not_cached() {
        assert!(matches!(
            describe::<Broken>(),
            Err(Error::MissingLinkage {
                member: "lines",
                ..
            })
        ));
        assert!(!is_described::<Broken>());
        assert!(describe::<Broken>().is_err());
    }
}
