//! Lazy mapping over asynchronous streams.
//!
//! The mapped stream pulls from its source only when it is itself polled, one
//! element at a time: each item it yields costs exactly one source pull and one
//! rule invocation. Nothing is read ahead or buffered, so the source may be
//! unbounded or expensive to page through.
//!
//! Errors surface on the pull that produced them and end the stream. Items
//! yielded earlier stay valid.
//!
//! Cancellation is cooperative: wrap the mapped stream with [`cancellable`]
//! and call [`AbortHandle::abort`]. The stream then stops pulling and ends
//! without yielding a partial element. `is_aborted()` on the returned
//! [`Abortable`] tells a cancelled stream apart from an exhausted one.
//! Dropping the stream stops it as well.

use crate::rule::TypeMapper;
use futures::future::{AbortHandle, Abortable};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use tracing::trace;

struct Pull<St, R> {
    source: Pin<Box<St>>,
    rule: R,
    index: usize,
}

impl<St, R> Pull<St, R> {
    fn new(source: St, rule: R) -> Self {
        Self {
            source: Box::pin(source),
            rule,
            index: 0,
        }
    }
}

/// Maps an infallible source stream through `rule`.
///
/// The output yields `Ok(mapped)` for each source item, or the rule's error
/// once, after which it ends.
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use sovran_mapper::{from_fn, stream::map_stream};
///
/// let rule = from_fn(|n: &i32| n + 1);
/// let mapped = map_stream(rule, stream::iter(vec![1, 2, 3]));
/// let out: Vec<_> = block_on(mapped.map(Result::unwrap).collect());
/// assert_eq!(out, [2, 3, 4]);
/// ```
pub fn map_stream<S, D, R, St>(rule: R, source: St) -> impl Stream<Item = Result<D, R::Error>>
where
    R: TypeMapper<S, D>,
    St: Stream<Item = S>,
{
    stream::unfold(Some(Pull::new(source, rule)), |state| async move {
        let Some(mut pull) = state else {
            return None;
        };
        let item = pull.source.next().await?;
        let index = pull.index;
        pull.index += 1;
        match pull.rule.map(&item) {
            Ok(mapped) => {
                trace!(index, "mapped stream element");
                Some((Ok(mapped), Some(pull)))
            }
            Err(error) => {
                trace!(index, "conversion rule failed, ending stream");
                Some((Err(error), None))
            }
        }
    })
}

/// Maps a fallible source stream through `rule`.
///
/// Source errors are yielded as-is. Rule errors are converted with `From`,
/// which is the identity when both sides share an error type. Either kind of
/// error ends the stream.
pub fn try_map_stream<S, D, E, R, St>(rule: R, source: St) -> impl Stream<Item = Result<D, E>>
where
    R: TypeMapper<S, D>,
    E: From<R::Error>,
    St: Stream<Item = Result<S, E>>,
{
    stream::unfold(Some(Pull::new(source, rule)), |state| async move {
        let Some(mut pull) = state else {
            return None;
        };
        let index = pull.index;
        pull.index += 1;
        match pull.source.next().await? {
            Ok(item) => match pull.rule.map(&item) {
                Ok(mapped) => {
                    trace!(index, "mapped stream element");
                    Some((Ok(mapped), Some(pull)))
                }
                Err(error) => {
                    trace!(index, "conversion rule failed, ending stream");
                    Some((Err(E::from(error)), None))
                }
            },
            Err(error) => {
                trace!(index, "source stream failed, ending stream");
                Some((Err(error), None))
            }
        }
    })
}

/// Makes a stream cancellable from the outside.
///
/// After [`AbortHandle::abort`] the stream ends at its next poll, without
/// pulling from its source again.
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use sovran_mapper::{from_fn, stream::{cancellable, map_stream}};
///
/// let rule = from_fn(|n: &u64| n * 2);
/// let (doubled, handle) = cancellable(map_stream(rule, stream::iter(0u64..)));
/// let mut doubled = Box::pin(doubled);
///
/// block_on(async {
///     assert_eq!(doubled.next().await.unwrap(), Ok(0));
///     assert_eq!(doubled.next().await.unwrap(), Ok(2));
///     handle.abort();
///     assert!(doubled.next().await.is_none());
/// });
/// assert!(doubled.is_aborted());
/// ```
pub fn cancellable<St: Stream>(stream: St) -> (Abortable<St>, AbortHandle) {
    let (handle, registration) = AbortHandle::new_pair();
    (Abortable::new(stream, registration), handle)
}
