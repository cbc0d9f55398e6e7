use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Converts one source instance into one new destination instance.
///
/// This is the single-object capability every container shape builds on.
/// Implementations are constructed once and reused for every call, so they
/// should not depend on per-call state. A rule shared between threads (for
/// example through [`MapperRegistry`](crate::MapperRegistry)) must be safe to
/// invoke concurrently; the engine does not lock around it.
///
/// The engine trusts the rule: it never inspects the result, and whatever
/// error the rule returns is handed back to the caller as-is.
///
/// # Examples
///
/// ```
/// use sovran_mapper::TypeMapper;
/// use std::convert::Infallible;
///
/// struct Celsius(f64);
/// struct Fahrenheit(f64);
///
/// struct ToFahrenheit;
///
/// impl TypeMapper<Celsius, Fahrenheit> for ToFahrenheit {
///     type Error = Infallible;
///
///     fn map(&self, source: &Celsius) -> Result<Fahrenheit, Self::Error> {
///         Ok(Fahrenheit(source.0 * 9.0 / 5.0 + 32.0))
///     }
/// }
///
/// let f = ToFahrenheit.map(&Celsius(100.0)).unwrap();
/// assert_eq!(f.0, 212.0);
/// ```
pub trait TypeMapper<S, D> {
    /// Error raised by the rule. Use [`Infallible`] for rules that cannot fail.
    type Error;

    /// Produces a new destination reflecting `source`.
    fn map(&self, source: &S) -> Result<D, Self::Error>;
}

/// Populates an already constructed destination from a source.
///
/// Some destinations have to exist before their fields can be filled in, for
/// instance when the destination container pre-allocates its elements. Wrap a
/// populate rule in [`Populating`] to use it wherever a [`TypeMapper`] is
/// expected.
pub trait PopulateMapper<S, D> {
    type Error;

    fn populate(&self, source: &S, destination: &mut D) -> Result<(), Self::Error>;
}

impl<S, D, R> TypeMapper<S, D> for &R
where
    R: TypeMapper<S, D> + ?Sized,
{
    type Error = R::Error;

    fn map(&self, source: &S) -> Result<D, Self::Error> {
        (**self).map(source)
    }
}

impl<S, D, R> TypeMapper<S, D> for Box<R>
where
    R: TypeMapper<S, D> + ?Sized,
{
    type Error = R::Error;

    fn map(&self, source: &S) -> Result<D, Self::Error> {
        (**self).map(source)
    }
}

impl<S, D, R> TypeMapper<S, D> for Arc<R>
where
    R: TypeMapper<S, D> + ?Sized,
{
    type Error = R::Error;

    fn map(&self, source: &S) -> Result<D, Self::Error> {
        (**self).map(source)
    }
}

impl<S, D, P> PopulateMapper<S, D> for &P
where
    P: PopulateMapper<S, D> + ?Sized,
{
    type Error = P::Error;

    fn populate(&self, source: &S, destination: &mut D) -> Result<(), Self::Error> {
        (**self).populate(source, destination)
    }
}

/// A [`TypeMapper`] backed by an infallible closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnMapper<F> {
    f: F,
}

/// Wraps a closure `Fn(&S) -> D` as a rule that cannot fail.
///
/// ```
/// use sovran_mapper::{from_fn, TypeMapper};
///
/// let rule = from_fn(|n: &u8| u16::from(*n) * 2);
/// assert_eq!(rule.map(&21), Ok(42));
/// ```
pub fn from_fn<S, D, F>(f: F) -> FnMapper<F>
where
    F: Fn(&S) -> D,
{
    FnMapper { f }
}

impl<S, D, F> TypeMapper<S, D> for FnMapper<F>
where
    F: Fn(&S) -> D,
{
    type Error = Infallible;

    fn map(&self, source: &S) -> Result<D, Self::Error> {
        Ok((self.f)(source))
    }
}

impl<F> fmt::Debug for FnMapper<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMapper").finish_non_exhaustive()
    }
}

/// A [`TypeMapper`] backed by a fallible closure. See [`try_from_fn`].
pub struct TryFnMapper<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

/// Wraps a closure `Fn(&S) -> Result<D, E>` as a rule that may fail with `E`.
///
/// ```
/// use sovran_mapper::{try_from_fn, TypeMapper};
///
/// let rule = try_from_fn(|n: &i32| u8::try_from(*n));
/// assert_eq!(rule.map(&7), Ok(7u8));
/// assert!(rule.map(&-1).is_err());
/// ```
pub fn try_from_fn<S, D, E, F>(f: F) -> TryFnMapper<F, E>
where
    F: Fn(&S) -> Result<D, E>,
{
    TryFnMapper {
        f,
        _error: PhantomData,
    }
}

impl<S, D, E, F> TypeMapper<S, D> for TryFnMapper<F, E>
where
    F: Fn(&S) -> Result<D, E>,
{
    type Error = E;

    fn map(&self, source: &S) -> Result<D, Self::Error> {
        (self.f)(source)
    }
}

impl<F: Clone, E> Clone for TryFnMapper<F, E> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _error: PhantomData,
        }
    }
}

impl<F, E> fmt::Debug for TryFnMapper<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFnMapper").finish_non_exhaustive()
    }
}

/// A [`PopulateMapper`] backed by an infallible closure. See [`populate_fn`].
#[derive(Clone, Copy)]
pub struct PopulateFn<F> {
    f: F,
}

/// Wraps a closure `Fn(&S, &mut D)` as a populate rule that cannot fail.
pub fn populate_fn<S, D, F>(f: F) -> PopulateFn<F>
where
    F: Fn(&S, &mut D),
{
    PopulateFn { f }
}

impl<S, D, F> PopulateMapper<S, D> for PopulateFn<F>
where
    F: Fn(&S, &mut D),
{
    type Error = Infallible;

    fn populate(&self, source: &S, destination: &mut D) -> Result<(), Self::Error> {
        (self.f)(source, destination);
        Ok(())
    }
}

impl<F> fmt::Debug for PopulateFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulateFn").finish_non_exhaustive()
    }
}

/// Turns a [`PopulateMapper`] into a [`TypeMapper`] by default-constructing
/// each destination before populating it.
///
/// ```
/// use sovran_mapper::{populate_fn, Populating, TypeMapper};
///
/// #[derive(Default)]
/// struct Row {
///     id: u32,
///     label: String,
/// }
///
/// let rule = Populating::new(populate_fn(|id: &u32, row: &mut Row| {
///     row.id = *id;
///     row.label = format!("row-{}", id);
/// }));
///
/// let row: Row = rule.map(&3).unwrap();
/// assert_eq!(row.label, "row-3");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Populating<P> {
    inner: P,
}

impl<P> Populating<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<S, D, P> TypeMapper<S, D> for Populating<P>
where
    D: Default,
    P: PopulateMapper<S, D>,
{
    type Error = P::Error;

    fn map(&self, source: &S) -> Result<D, Self::Error> {
        let mut destination = D::default();
        self.inner.populate(source, &mut destination)?;
        Ok(destination)
    }
}
