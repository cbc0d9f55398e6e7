use sovran_mapper::{
    from_fn, populate_fn, try_from_fn, CollectionChange, Mapper, MapperRegistry, MappingError,
    ObservableCollection, RegistryError, TypeMapper,
};
use std::collections::{LinkedList, VecDeque};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, PartialEq)]
struct Source {
    property: i32,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Destination {
    property: i32,
}

struct CopyProperty;

impl TypeMapper<Source, Destination> for CopyProperty {
    type Error = Infallible;

    fn map(&self, source: &Source) -> Result<Destination, Self::Error> {
        Ok(Destination {
            property: source.property,
        })
    }
}

fn two_sources() -> Vec<Source> {
    vec![Source { property: 1 }, Source { property: 2 }]
}

fn two_destinations() -> Vec<Destination> {
    vec![Destination { property: 1 }, Destination { property: 2 }]
}

#[test]
fn test_property_scenario_array() {
    let mapper = Mapper::new(CopyProperty);
    let array = mapper.map_array(&two_sources()).unwrap();
    assert_eq!(array.to_vec(), two_destinations());
}

#[test]
fn test_property_scenario_ordered_list() {
    let mapper = Mapper::new(CopyProperty);
    let list: Vec<Destination> = mapper.map_into_new(&two_sources()).unwrap();
    assert_eq!(list, two_destinations());
}

#[test]
fn test_property_scenario_other_collections() {
    let mapper = Mapper::new(CopyProperty);
    let source = two_sources();

    let deque: VecDeque<Destination> = mapper.map_into_new(&source).unwrap();
    assert_eq!(Vec::from(deque), two_destinations());

    let list: LinkedList<Destination> = mapper.map_into_new(&source).unwrap();
    assert_eq!(list.into_iter().collect::<Vec<_>>(), two_destinations());

    let observed = mapper.map_into_observable(&source).unwrap();
    assert_eq!(observed.into_vec(), two_destinations());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_property_scenario_stream() {
    use futures::{stream, StreamExt};

    let mapper = Mapper::new(CopyProperty);
    let mapped = mapper.map_stream(stream::iter(two_sources()));
    let out: Vec<Destination> = mapped.map(Result::unwrap).collect().await;
    assert_eq!(out, two_destinations());
}

#[test]
fn test_empty_source_gives_empty_output_everywhere() {
    let mapper = Mapper::new(CopyProperty);
    let empty: Vec<Source> = Vec::new();

    assert!(mapper.map_array(&empty).unwrap().is_empty());
    let list: Vec<Destination> = mapper.map_into_new(&empty).unwrap();
    assert!(list.is_empty());
    assert!(mapper.map_into_observable(&empty).unwrap().is_empty());

    let mut existing = vec![Destination { property: 9 }];
    mapper.map_into_existing(&empty, &mut existing).unwrap();
    assert_eq!(existing, vec![Destination { property: 9 }]);
}

#[test]
fn test_map_into_existing_appends_after_existing_items() {
    let mapper = Mapper::new(CopyProperty);
    let mut destination = vec![Destination { property: -1 }];

    let len = mapper
        .map_into_existing(&two_sources(), &mut destination)
        .map(|d| d.len())
        .unwrap();

    assert_eq!(len, 3);
    assert_eq!(destination[0], Destination { property: -1 });
    assert_eq!(&destination[1..], &two_destinations()[..]);
}

#[test]
fn test_map_into_new_twice_gives_independent_collections() {
    let mapper = Mapper::new(CopyProperty);
    let source = two_sources();

    let mut first: Vec<Destination> = mapper.map_into_new(&source).unwrap();
    let second: Vec<Destination> = mapper.map_into_new(&source).unwrap();
    assert_eq!(first, second);

    first.push(Destination { property: 3 });
    first[0].property = 100;
    assert_eq!(second, two_destinations());
}

#[test]
fn test_rule_sees_elements_strictly_in_order() {
    let counter = AtomicUsize::new(0);
    let mapper = Mapper::new(from_fn(|s: &Source| {
        let sequence = counter.fetch_add(1, Ordering::SeqCst);
        (sequence, s.property)
    }));
    let source: Vec<Source> = (10..15).map(|property| Source { property }).collect();

    let numbered = mapper.map_array(&source).unwrap();

    let expected: Vec<(usize, i32)> = (0..5).zip(10..15).collect();
    assert_eq!(numbered.to_vec(), expected);
}

#[test]
fn test_rule_error_is_returned_unmodified() {
    #[derive(Debug, PartialEq)]
    struct Rejected {
        property: i32,
    }

    let mapper = Mapper::new(try_from_fn(|s: &Source| {
        if s.property % 2 == 0 {
            Err(Rejected {
                property: s.property,
            })
        } else {
            Ok(Destination {
                property: s.property,
            })
        }
    }));
    let source = two_sources();

    assert_eq!(
        mapper.map_array(&source).unwrap_err(),
        Rejected { property: 2 }
    );
    assert_eq!(
        mapper
            .map_into_new::<_, _, _, Vec<Destination>>(&source)
            .unwrap_err(),
        Rejected { property: 2 }
    );

    let mut existing = vec![Destination { property: 0 }];
    assert!(mapper.map_into_existing(&source, &mut existing).is_err());
    assert_eq!(existing, vec![Destination { property: 0 }]);
}

#[test]
fn test_checked_null_source_maps_nothing() {
    let calls = AtomicUsize::new(0);
    let mapper = Mapper::new(from_fn(|s: &Source| {
        calls.fetch_add(1, Ordering::SeqCst);
        Destination {
            property: s.property,
        }
    }));
    let none: Option<&Vec<Source>> = None;

    let err = mapper.checked().map_array(none).unwrap_err();
    assert_eq!(
        err,
        MappingError::NullArgument {
            parameter: "source"
        }
    );
    assert_eq!(err.to_string(), "argument `source` must not be null");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[cfg(feature = "async")]
#[test]
fn test_checked_stream_fails_eagerly() {
    let mapper = Mapper::new(CopyProperty);
    let missing: Option<futures::stream::Iter<std::vec::IntoIter<Source>>> = None;

    match mapper.checked().map_stream(missing) {
        Err(err) => assert_eq!(err.null_parameter(), Some("source")),
        Ok(_) => panic!("missing stream source must be rejected at call time"),
    };
}

#[test]
fn test_populate_array_through_mapper() {
    let mapper = Mapper::new(populate_fn(|s: &Source, d: &mut Destination| {
        d.property = s.property + 1;
    }));

    let array = mapper.populate_array(&two_sources()).unwrap();

    assert_eq!(
        array.to_vec(),
        vec![Destination { property: 2 }, Destination { property: 3 }]
    );
}

#[test]
fn test_observer_sees_each_appended_element() {
    let mapper = Mapper::new(CopyProperty);
    let added = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&added);

    let mut observed = ObservableCollection::new();
    observed.subscribe(move |change: &CollectionChange<'_, Destination>| {
        if let CollectionChange::Added { index, item } = change {
            sink.lock().unwrap().push((*index, item.property));
        }
    });

    mapper
        .map_into_existing(&two_sources(), &mut observed)
        .unwrap();

    assert_eq!(*added.lock().unwrap(), vec![(0, 1), (1, 2)]);
}

#[test]
fn test_registry_rule_shared_across_threads() -> Result<(), RegistryError> {
    let registry = MapperRegistry::new();
    registry.register::<Source, Destination, _>(CopyProperty)?;

    let mut handles = vec![];
    for offset in 0..8 {
        let registry = registry.clone();
        handles.push(thread::spawn(move || {
            let mapper = registry
                .resolve::<Source, Destination, Infallible>()
                .unwrap();
            let source: Vec<Source> = (0..100)
                .map(|i| Source {
                    property: offset * 1000 + i,
                })
                .collect();
            let mapped = mapper.map_array(&source).unwrap();
            mapped
                .iter()
                .zip(&source)
                .all(|(d, s)| d.property == s.property)
        }));
    }

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    Ok(())
}
