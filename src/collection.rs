//! Mapping into growable collections.
//!
//! The destination is either supplied by the caller or created by the engine
//! through `Default` or a factory closure. Mapped elements are appended in
//! source order.

use crate::rule::TypeMapper;
use std::collections::{LinkedList, VecDeque};
use tracing::trace;

/// A collection that mapped elements can be appended to.
///
/// Implement this for your own container to use it as a mapping target.
pub trait GrowableCollection<T> {
    /// Appends `item` after every element already in the collection.
    fn add_item(&mut self, item: T);

    /// Reserves room for `additional` more items, if the collection can.
    ///
    /// This is only a hint. The default does nothing.
    fn reserve_hint(&mut self, additional: usize) {
        let _ = additional;
    }
}

impl<T> GrowableCollection<T> for Vec<T> {
    fn add_item(&mut self, item: T) {
        self.push(item);
    }

    fn reserve_hint(&mut self, additional: usize) {
        self.reserve(additional);
    }
}

impl<T> GrowableCollection<T> for VecDeque<T> {
    fn add_item(&mut self, item: T) {
        self.push_back(item);
    }

    fn reserve_hint(&mut self, additional: usize) {
        self.reserve(additional);
    }
}

impl<T> GrowableCollection<T> for LinkedList<T> {
    fn add_item(&mut self, item: T) {
        self.push_back(item);
    }
}

/// Appends the image of every `source` element to `destination`.
///
/// Elements already in `destination` are left in place, ahead of the new
/// ones. The same destination is handed back for chaining.
///
/// Every element is mapped before anything is appended, so when the rule
/// fails the destination is left exactly as it was.
///
/// ```
/// use sovran_mapper::{collection, from_fn};
///
/// let rule = from_fn(|n: &i32| n * 10);
/// let mut out = vec![0];
/// collection::map_into_existing(&rule, &[1, 2], &mut out).unwrap();
/// assert_eq!(out, [0, 10, 20]);
/// ```
pub fn map_into_existing<'a, 'c, S, D, R, I, C>(
    rule: &R,
    source: I,
    destination: &'c mut C,
) -> Result<&'c mut C, R::Error>
where
    S: 'a,
    R: TypeMapper<S, D> + ?Sized,
    I: IntoIterator<Item = &'a S>,
    C: GrowableCollection<D> + ?Sized,
{
    let source = source.into_iter();
    let (lower, _) = source.size_hint();

    let mut staged = Vec::with_capacity(lower);
    for item in source {
        staged.push(rule.map(item)?);
    }

    trace!(len = staged.len(), "appending mapped elements to existing collection");
    destination.reserve_hint(staged.len());
    for mapped in staged {
        destination.add_item(mapped);
    }
    Ok(destination)
}

/// Maps `source` into a new, default-constructed `C`.
///
/// ```
/// use sovran_mapper::{collection, from_fn};
/// use std::collections::VecDeque;
///
/// let rule = from_fn(|s: &&str| s.len());
/// let lens: VecDeque<usize> = collection::map_into_new(&rule, &["a", "bcd"]).unwrap();
/// assert_eq!(lens, [1, 3]);
/// ```
pub fn map_into_new<'a, S, D, R, I, C>(rule: &R, source: I) -> Result<C, R::Error>
where
    S: 'a,
    R: TypeMapper<S, D> + ?Sized,
    I: IntoIterator<Item = &'a S>,
    C: GrowableCollection<D> + Default,
{
    map_into_new_with(rule, source, C::default)
}

/// Maps `source` into a new collection built by `factory`.
///
/// Use this when the collection has no `Default`, or needs constructor
/// arguments such as a capacity or an observer.
pub fn map_into_new_with<'a, S, D, R, I, C, F>(
    rule: &R,
    source: I,
    factory: F,
) -> Result<C, R::Error>
where
    S: 'a,
    R: TypeMapper<S, D> + ?Sized,
    I: IntoIterator<Item = &'a S>,
    C: GrowableCollection<D>,
    F: FnOnce() -> C,
{
    let source = source.into_iter();
    let mut destination = factory();
    destination.reserve_hint(source.size_hint().0);

    // A fresh collection is simply dropped on failure, so no staging here
    let mut count = 0usize;
    for item in source {
        destination.add_item(rule.map(item)?);
        count += 1;
    }
    trace!(len = count, "mapped into new collection");
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{from_fn, try_from_fn};

    #[derive(Debug, Clone, PartialEq)]
    struct Source {
        property: i32,
    }

    #[derive(Debug, PartialEq)]
    struct Destination {
        property: i32,
    }

    fn copy_property(source: &Source) -> Destination {
        Destination {
            property: source.property,
        }
    }

    fn sample() -> Vec<Source> {
        vec![Source { property: 1 }, Source { property: 2 }]
    }

    #[test]
    fn test_map_into_existing_returns_same_destination() {
        let rule = from_fn(copy_property);
        let mut destination = vec![Destination { property: 0 }];
        let before = &destination as *const Vec<Destination>;

        let returned = map_into_existing(&rule, &sample(), &mut destination).unwrap();
        assert!(std::ptr::eq(returned as *const Vec<Destination>, before));

        assert_eq!(
            destination,
            vec![
                Destination { property: 0 },
                Destination { property: 1 },
                Destination { property: 2 },
            ]
        );
    }

    #[test]
    fn test_map_into_existing_leaves_destination_untouched_on_failure() {
        let rule = try_from_fn(|s: &Source| {
            if s.property == 2 {
                Err("nope")
            } else {
                Ok(copy_property(s))
            }
        });
        let mut destination = vec![Destination { property: 0 }];

        let result = map_into_existing(&rule, &sample(), &mut destination);

        assert_eq!(result.unwrap_err(), "nope");
        assert_eq!(destination, vec![Destination { property: 0 }]);
    }

    #[test]
    fn test_map_into_new_builds_independent_instances() {
        let rule = from_fn(copy_property);
        let source = sample();

        let first: Vec<Destination> = map_into_new(&rule, &source).unwrap();
        let mut second: Vec<Destination> = map_into_new(&rule, &source).unwrap();
        assert_eq!(first, second);

        second[0].property = 99;
        assert_eq!(first[0].property, 1);
    }

    #[test]
    fn test_map_into_new_supports_other_collections() {
        let rule = from_fn(copy_property);

        let deque: VecDeque<Destination> = map_into_new(&rule, &sample()).unwrap();
        assert_eq!(deque.len(), 2);
        assert_eq!(deque.back(), Some(&Destination { property: 2 }));

        let list: LinkedList<Destination> = map_into_new(&rule, &sample()).unwrap();
        let values: Vec<i32> = list.iter().map(|d| d.property).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_map_into_new_with_uses_factory() {
        let rule = from_fn(copy_property);
        let out = map_into_new_with(&rule, &sample(), || Vec::with_capacity(16)).unwrap();
        assert!(out.capacity() >= 16);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_map_into_new_empty_source() {
        let rule = from_fn(copy_property);
        let out: Vec<Destination> = map_into_new(&rule, &Vec::<Source>::new()).unwrap();
        assert!(out.is_empty());
    }

    struct Counted {
        items: Vec<i32>,
    }

    impl GrowableCollection<i32> for Counted {
        fn add_item(&mut self, item: i32) {
            self.items.push(item);
        }
    }

    #[test]
    fn test_custom_collection_without_reserve() {
        let rule = from_fn(|n: &i32| n + 1);
        let mut target = Counted { items: Vec::new() };
        map_into_existing(&rule, &[1, 2, 3], &mut target).unwrap();
        assert_eq!(target.items, vec![2, 3, 4]);
    }
}
