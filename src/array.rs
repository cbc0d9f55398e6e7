//! Mapping into fixed-length arrays.
//!
//! The source length is read once, up front, and the destination is allocated
//! at exactly that length. Nothing is resized while mapping.

use crate::rule::{PopulateMapper, TypeMapper};
use tracing::trace;

/// Maps every element of `source` into a newly allocated boxed slice of the
/// same length.
///
/// `result[i]` is the image of the `i`-th source element. An empty source
/// yields an empty slice. If the rule fails, its error is returned and the
/// partially filled allocation is dropped.
///
/// ```
/// use sovran_mapper::{array, from_fn};
///
/// let rule = from_fn(|n: &u32| n.to_string());
/// let out = array::map_array(&rule, &[1, 2, 3]).unwrap();
/// assert_eq!(&*out, ["1", "2", "3"]);
/// ```
pub fn map_array<'a, S, D, R, I>(rule: &R, source: I) -> Result<Box<[D]>, R::Error>
where
    S: 'a,
    R: TypeMapper<S, D> + ?Sized,
    I: IntoIterator<Item = &'a S>,
    I::IntoIter: ExactSizeIterator,
{
    let source = source.into_iter();
    let len = source.len();
    trace!(len, "mapping into fixed array");

    let mut destination = Vec::with_capacity(len);
    for item in source {
        destination.push(rule.map(item)?);
    }
    Ok(destination.into_boxed_slice())
}

/// Maps `source` into a fixed array using a populate rule.
///
/// Every destination element is default-constructed first, then element `i`
/// is populated from source element `i`.
///
/// The result always holds one element per item the source actually yielded,
/// even if the iterator misreports its length.
pub fn populate_array<'a, S, D, P, I>(rule: &P, source: I) -> Result<Box<[D]>, P::Error>
where
    S: 'a,
    D: Default,
    P: PopulateMapper<S, D> + ?Sized,
    I: IntoIterator<Item = &'a S>,
    I::IntoIter: ExactSizeIterator,
{
    let source = source.into_iter();
    let len = source.len();
    trace!(len, "populating fixed array");

    let mut destination: Vec<D> = std::iter::repeat_with(D::default).take(len).collect();
    let mut filled = 0;
    for item in source {
        if filled == destination.len() {
            destination.push(D::default());
        }
        rule.populate(item, &mut destination[filled])?;
        filled += 1;
    }
    if filled != len {
        trace!(len, filled, "source length differed from its reported len");
        destination.truncate(filled);
    }
    Ok(destination.into_boxed_slice())
}
