//! A growable collection that notifies observers on every mutation.
//!
//! [`map_into_observable`] is the mapping entry point; the rest of this module
//! is the collection itself.

use crate::collection::{map_into_new_with, GrowableCollection};
use crate::rule::TypeMapper;
use std::fmt;
use std::ops::Index;
use tracing::trace;

/// Describes a single mutation of an [`ObservableCollection`].
///
/// Borrowed items are only valid for the duration of the notification.
#[derive(Debug, PartialEq)]
pub enum CollectionChange<'a, T> {
    /// `item` was inserted at `index`
    Added { index: usize, item: &'a T },
    /// `item` was removed from `index`
    Removed { index: usize, item: &'a T },
    /// The element at `index` changed from `old` to `new`
    Replaced { index: usize, old: &'a T, new: &'a T },
    /// Every element was removed
    Cleared,
}

/// Handle returned by [`ObservableCollection::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn Fn(&CollectionChange<'_, T>) + Send + Sync>;

/// An ordered, `Vec`-backed collection that reports every mutation to its
/// observers.
///
/// Observers are called synchronously, in subscription order, after the
/// mutation has been applied.
///
/// # Examples
///
/// ```
/// use sovran_mapper::{CollectionChange, ObservableCollection};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let log = Arc::clone(&seen);
///
/// let mut names = ObservableCollection::new();
/// names.subscribe(move |change: &CollectionChange<'_, String>| {
///     if let CollectionChange::Added { index, item } = change {
///         log.lock().unwrap().push(format!("{}:{}", index, item));
///     }
/// });
///
/// names.push("ada".to_string());
/// names.push("grace".to_string());
///
/// assert_eq!(*seen.lock().unwrap(), ["0:ada", "1:grace"]);
/// ```
pub struct ObservableCollection<T> {
    items: Vec<T>,
    observers: Vec<(SubscriptionId, Observer<T>)>,
    next_id: u64,
}

impl<T> ObservableCollection<T> {
    /// Creates a new, empty collection with no observers.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers an observer and returns a handle for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&CollectionChange<'_, T>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        trace!(id = id.0, observers = self.observers.len(), "observer subscribed");
        id
    }

    /// Removes an observer.
    ///
    /// Returns `true` if the observer was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Appends an item and notifies observers.
    pub fn push(&mut self, item: T) {
        let index = self.items.len();
        self.items.push(item);
        self.notify(&CollectionChange::Added {
            index,
            item: &self.items[index],
        });
    }

    /// Inserts an item at `index` and notifies observers.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
        self.notify(&CollectionChange::Added {
            index,
            item: &self.items[index],
        });
    }

    /// Removes and returns the item at `index`, or `None` if out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.notify(&CollectionChange::Removed { index, item: &item });
        Some(item)
    }

    /// Replaces the item at `index`, returning the previous one.
    ///
    /// Returns `Err(item)` if `index` is out of bounds.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, T> {
        let Some(slot) = self.items.get_mut(index) else {
            return Err(item);
        };
        let old = std::mem::replace(slot, item);
        self.notify(&CollectionChange::Replaced {
            index,
            old: &old,
            new: &self.items[index],
        });
        Ok(old)
    }

    /// Removes every item and notifies observers once.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(&CollectionChange::Cleared);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consumes the collection, dropping its observers.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn notify(&self, change: &CollectionChange<'_, T>) {
        for (_, observer) in &self.observers {
            observer(change);
        }
    }
}

impl<T> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T> Index<usize> for ObservableCollection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a ObservableCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> GrowableCollection<T> for ObservableCollection<T> {
    fn add_item(&mut self, item: T) {
        self.push(item);
    }

    fn reserve_hint(&mut self, additional: usize) {
        self.items.reserve(additional);
    }
}

/// Maps `source` into a new [`ObservableCollection`].
///
/// The result has no observers yet; each element is appended the same way
/// [`map_into_new`](crate::collection::map_into_new) appends into any other
/// collection.
pub fn map_into_observable<'a, S, D, R, I>(
    rule: &R,
    source: I,
) -> Result<ObservableCollection<D>, R::Error>
where
    S: 'a,
    R: TypeMapper<S, D> + ?Sized,
    I: IntoIterator<Item = &'a S>,
{
    map_into_new_with(rule, source, ObservableCollection::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::map_into_existing;
    use crate::rule::{from_fn, try_from_fn};
    use std::sync::{Arc, Mutex};

    fn recorder<T: fmt::Debug + 'static>(
        collection: &mut ObservableCollection<T>,
    ) -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        collection.subscribe(move |change: &CollectionChange<'_, T>| {
            sink.lock().unwrap().push(format!("{:?}", change));
        });
        events
    }

    #[test]
    fn test_mutations_notify_in_order() {
        let mut numbers = ObservableCollection::new();
        let events = recorder(&mut numbers);

        numbers.push(1);
        numbers.push(3);
        numbers.insert(1, 2);
        assert_eq!(numbers.replace(0, 10), Ok(1));
        assert_eq!(numbers.remove(2), Some(3));
        numbers.clear();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "Added { index: 0, item: 1 }",
                "Added { index: 1, item: 3 }",
                "Added { index: 1, item: 2 }",
                "Replaced { index: 0, old: 1, new: 10 }",
                "Removed { index: 2, item: 3 }",
                "Cleared",
            ]
        );
        assert!(numbers.is_empty());
    }

    #[test]
    fn test_out_of_bounds_mutations_do_not_notify() {
        let mut numbers = ObservableCollection::new();
        numbers.push(1);
        let events = recorder(&mut numbers);

        assert_eq!(numbers.remove(5), None);
        assert_eq!(numbers.replace(5, 9), Err(9));
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(numbers.as_slice(), &[1]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut numbers = ObservableCollection::new();
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        let id = numbers.subscribe(move |_: &CollectionChange<'_, i32>| {
            *counter.lock().unwrap() += 1;
        });

        numbers.push(1);
        assert!(numbers.unsubscribe(id));
        assert!(!numbers.unsubscribe(id));
        numbers.push(2);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(numbers.observer_count(), 0);
    }

    #[test]
    fn test_map_into_observable_preserves_order() {
        let rule = from_fn(|n: &i32| n * 2);
        let out = map_into_observable(&rule, &[1, 2, 3]).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out.as_slice(), &[2, 4, 6]);
        assert_eq!(out[1], 4);
        assert_eq!(out.observer_count(), 0);
    }

    #[test]
    fn test_appending_into_observed_collection_notifies_per_element() {
        let rule = from_fn(|s: &&str| s.to_uppercase());
        let mut names = ObservableCollection::new();
        names.push("ZERO".to_string());
        let events = recorder(&mut names);

        map_into_existing(&rule, &["a", "b"], &mut names).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "Added { index: 1, item: \"A\" }",
                "Added { index: 2, item: \"B\" }",
            ]
        );
        let collected: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(collected, vec!["ZERO", "A", "B"]);
    }

    #[test]
    fn test_failed_batch_leaves_observed_collection_silent() {
        let rule = try_from_fn(|s: &&str| {
            if s.is_empty() {
                Err("empty name")
            } else {
                Ok(s.to_uppercase())
            }
        });
        let mut names = ObservableCollection::new();
        names.push("ZERO".to_string());
        let events = recorder(&mut names);

        let result = map_into_existing(&rule, &["a", "b", "", "c"], &mut names).map(|_| ());

        assert_eq!(result, Err("empty name"));
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(names.len(), 1);
        assert_eq!(names[0], "ZERO");
    }

    #[test]
    fn test_debug_hides_observers() {
        let mut numbers = ObservableCollection::new();
        numbers.push(7);
        numbers.subscribe(|_: &CollectionChange<'_, i32>| {});
        assert_eq!(
            format!("{:?}", numbers),
            "ObservableCollection { items: [7], observers: 1 }"
        );
    }
}
