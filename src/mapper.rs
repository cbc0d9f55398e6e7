use crate::array;
use crate::collection::{self, GrowableCollection};
use crate::error::MappingError;
use crate::observable::{self, ObservableCollection};
use crate::rule::{PopulateMapper, TypeMapper};

#[cfg(feature = "async")]
use crate::stream;
#[cfg(feature = "async")]
use futures::Stream;

/// Applies one conversion rule across every supported container shape.
///
/// `Mapper` holds nothing but its rule. It can be shared freely; each call
/// works on its own source and destination.
///
/// # Examples
///
/// ```
/// use sovran_mapper::{Mapper, TypeMapper};
/// use std::collections::VecDeque;
/// use std::convert::Infallible;
///
/// #[derive(Debug)]
/// struct User { id: u32, name: String }
///
/// #[derive(Debug, PartialEq)]
/// struct UserView { label: String }
///
/// struct UserToView;
///
/// impl TypeMapper<User, UserView> for UserToView {
///     type Error = Infallible;
///
///     fn map(&self, user: &User) -> Result<UserView, Infallible> {
///         Ok(UserView { label: format!("#{} {}", user.id, user.name) })
///     }
/// }
///
/// let mapper = Mapper::new(UserToView);
/// let users = vec![
///     User { id: 1, name: "alice".into() },
///     User { id: 2, name: "bob".into() },
/// ];
///
/// let views = mapper.map_array(&users).unwrap();
/// assert_eq!(views[1].label, "#2 bob");
///
/// let queue: VecDeque<UserView> = mapper.map_into_new(&users).unwrap();
/// assert_eq!(queue.len(), 2);
///
/// let mut existing = vec![UserView { label: "header".into() }];
/// mapper.map_into_existing(&users, &mut existing).unwrap();
/// assert_eq!(existing.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper<R> {
    rule: R,
}

impl<R> Mapper<R> {
    pub fn new(rule: R) -> Self {
        Self { rule }
    }

    /// Returns the underlying rule.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn into_rule(self) -> R {
        self.rule
    }

    /// Maps a single object.
    pub fn map<S, D>(&self, source: &S) -> Result<D, R::Error>
    where
        R: TypeMapper<S, D>,
    {
        self.rule.map(source)
    }

    /// Maps into a new exact-length array. See [`array::map_array`].
    pub fn map_array<'a, S, D, I>(&self, source: I) -> Result<Box<[D]>, R::Error>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        I::IntoIter: ExactSizeIterator,
    {
        array::map_array(&self.rule, source)
    }

    /// Maps into a new exact-length array of populated defaults. See
    /// [`array::populate_array`].
    pub fn populate_array<'a, S, D, I>(
        &self,
        source: I,
    ) -> Result<Box<[D]>, <R as PopulateMapper<S, D>>::Error>
    where
        S: 'a,
        D: Default,
        R: PopulateMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        I::IntoIter: ExactSizeIterator,
    {
        array::populate_array(&self.rule, source)
    }

    /// Appends to a caller-owned collection. See
    /// [`collection::map_into_existing`].
    pub fn map_into_existing<'a, 'c, S, D, I, C>(
        &self,
        source: I,
        destination: &'c mut C,
    ) -> Result<&'c mut C, R::Error>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        C: GrowableCollection<D> + ?Sized,
    {
        collection::map_into_existing(&self.rule, source, destination)
    }

    /// Maps into a new `C`. See [`collection::map_into_new`].
    pub fn map_into_new<'a, S, D, I, C>(&self, source: I) -> Result<C, R::Error>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        C: GrowableCollection<D> + Default,
    {
        collection::map_into_new(&self.rule, source)
    }

    /// Maps into a collection built by `factory`. See
    /// [`collection::map_into_new_with`].
    pub fn map_into_new_with<'a, S, D, I, C, F>(
        &self,
        source: I,
        factory: F,
    ) -> Result<C, R::Error>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        C: GrowableCollection<D>,
        F: FnOnce() -> C,
    {
        collection::map_into_new_with(&self.rule, source, factory)
    }

    /// Maps into a new [`ObservableCollection`].
    pub fn map_into_observable<'a, S, D, I>(
        &self,
        source: I,
    ) -> Result<ObservableCollection<D>, R::Error>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
    {
        observable::map_into_observable(&self.rule, source)
    }

    /// Lazily maps an asynchronous stream. See [`stream::map_stream`].
    #[cfg(feature = "async")]
    pub fn map_stream<'r, S, D, St>(
        &'r self,
        source: St,
    ) -> impl Stream<Item = Result<D, R::Error>> + 'r
    where
        R: TypeMapper<S, D> + 'r,
        S: 'r,
        D: 'r,
        St: Stream<Item = S> + 'r,
    {
        stream::map_stream(&self.rule, source)
    }

    /// Lazily maps a fallible asynchronous stream. See
    /// [`stream::try_map_stream`].
    #[cfg(feature = "async")]
    pub fn try_map_stream<'r, S, D, E, St>(
        &'r self,
        source: St,
    ) -> impl Stream<Item = Result<D, E>> + 'r
    where
        R: TypeMapper<S, D> + 'r,
        E: From<R::Error> + 'r,
        S: 'r,
        D: 'r,
        St: Stream<Item = Result<S, E>> + 'r,
    {
        stream::try_map_stream(&self.rule, source)
    }

    /// Returns a view whose operations accept optional arguments and reject
    /// missing ones.
    pub fn checked(&self) -> Checked<'_, R> {
        Checked { mapper: self }
    }
}

/// Argument-checking view over a [`Mapper`].
///
/// Use this at boundaries where the source or destination may legitimately be
/// absent, such as optional fields of deserialized data. A `None` argument is
/// rejected with [`MappingError::NullArgument`] before any element is mapped.
/// Rule failures are reported as [`MappingError::Conversion`].
///
/// ```
/// use sovran_mapper::{from_fn, Mapper, MappingError};
///
/// let mapper = Mapper::new(from_fn(|n: &i32| n * 2));
/// let missing: Option<&Vec<i32>> = None;
///
/// let err = mapper.checked().map_array(missing).unwrap_err();
/// assert_eq!(err.null_parameter(), Some("source"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Checked<'m, R> {
    mapper: &'m Mapper<R>,
}

fn require<T, E>(argument: Option<T>, parameter: &'static str) -> Result<T, MappingError<E>> {
    argument.ok_or(MappingError::NullArgument { parameter })
}

impl<'m, R> Checked<'m, R> {
    pub fn map<S, D>(&self, source: Option<&S>) -> Result<D, MappingError<R::Error>>
    where
        R: TypeMapper<S, D>,
    {
        let source = require(source, "source")?;
        self.mapper.map(source).map_err(MappingError::Conversion)
    }

    pub fn map_array<'a, S, D, I>(
        &self,
        source: Option<I>,
    ) -> Result<Box<[D]>, MappingError<R::Error>>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        I::IntoIter: ExactSizeIterator,
    {
        let source = require(source, "source")?;
        self.mapper
            .map_array(source)
            .map_err(MappingError::Conversion)
    }

    pub fn populate_array<'a, S, D, I>(
        &self,
        source: Option<I>,
    ) -> Result<Box<[D]>, MappingError<<R as PopulateMapper<S, D>>::Error>>
    where
        S: 'a,
        D: Default,
        R: PopulateMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        I::IntoIter: ExactSizeIterator,
    {
        let source = require(source, "source")?;
        self.mapper
            .populate_array(source)
            .map_err(MappingError::Conversion)
    }

    pub fn map_into_existing<'a, 'c, S, D, I, C>(
        &self,
        source: Option<I>,
        destination: Option<&'c mut C>,
    ) -> Result<&'c mut C, MappingError<R::Error>>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        C: GrowableCollection<D> + ?Sized,
    {
        let source = require(source, "source")?;
        let destination = require(destination, "destination")?;
        self.mapper
            .map_into_existing(source, destination)
            .map_err(MappingError::Conversion)
    }

    pub fn map_into_new<'a, S, D, I, C>(
        &self,
        source: Option<I>,
    ) -> Result<C, MappingError<R::Error>>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        C: GrowableCollection<D> + Default,
    {
        let source = require(source, "source")?;
        self.mapper
            .map_into_new(source)
            .map_err(MappingError::Conversion)
    }

    /// The factory is only called once the source is known to be present.
    pub fn map_into_new_with<'a, S, D, I, C, F>(
        &self,
        source: Option<I>,
        factory: F,
    ) -> Result<C, MappingError<R::Error>>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
        C: GrowableCollection<D>,
        F: FnOnce() -> C,
    {
        let source = require(source, "source")?;
        self.mapper
            .map_into_new_with(source, factory)
            .map_err(MappingError::Conversion)
    }

    pub fn map_into_observable<'a, S, D, I>(
        &self,
        source: Option<I>,
    ) -> Result<ObservableCollection<D>, MappingError<R::Error>>
    where
        S: 'a,
        R: TypeMapper<S, D>,
        I: IntoIterator<Item = &'a S>,
    {
        let source = require(source, "source")?;
        self.mapper
            .map_into_observable(source)
            .map_err(MappingError::Conversion)
    }

    /// Checks the source eagerly, then maps lazily.
    ///
    /// The argument check happens at call time, before the returned stream is
    /// ever polled. Rule errors are still reported per item, unwrapped.
    #[cfg(feature = "async")]
    pub fn map_stream<S, D, St>(
        &self,
        source: Option<St>,
    ) -> Result<impl Stream<Item = Result<D, R::Error>> + 'm, MappingError<R::Error>>
    where
        R: TypeMapper<S, D> + 'm,
        S: 'm,
        D: 'm,
        St: Stream<Item = S> + 'm,
    {
        let source = require(source, "source")?;
        Ok(self.mapper.map_stream(source))
    }

    /// Like [`Checked::map_stream`] for a fallible source.
    ///
    /// A missing source is reported as `MappingError<E>`, the same error type
    /// the stream's items carry.
    #[cfg(feature = "async")]
    pub fn try_map_stream<S, D, E, St>(
        &self,
        source: Option<St>,
    ) -> Result<impl Stream<Item = Result<D, E>> + 'm, MappingError<E>>
    where
        R: TypeMapper<S, D> + 'm,
        E: From<R::Error> + 'm,
        S: 'm,
        D: 'm,
        St: Stream<Item = Result<S, E>> + 'm,
    {
        let source = require(source, "source")?;
        Ok(self.mapper.try_map_stream(source))
    }
}
