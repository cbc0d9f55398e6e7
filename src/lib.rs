//! # sovran-mapper
//!
//! Fan a single type-to-type mapping rule out across whole containers.
//!
//! `sovran-mapper` takes one explicit conversion rule, "how to turn an `S` into
//! a `D`", and applies it to arrays, growable collections, observable
//! collections and asynchronous streams. You write the rule once; the engine
//! takes care of allocation, ordering and error propagation for every shape.
//!
//! ## Key Features
//!
//! - **Explicit**: Rules are plain trait implementations or closures, never discovered at runtime
//! - **Order-preserving**: `destination[i]` is always the image of `source[i]`
//! - **Pre-sized**: Fixed arrays are allocated once at their exact length
//! - **All-or-nothing**: A failing rule never leaves partial output behind
//! - **Lazy streams**: Async sources are mapped one pull at a time, with no buffering
//! - **Shared rules**: A thread-safe registry resolves rules by type pair
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_mapper::{from_fn, Mapper};
//!
//! #[derive(Debug)]
//! struct Source { property: i32 }
//!
//! #[derive(Debug, PartialEq)]
//! struct Destination { property: i32 }
//!
//! let mapper = Mapper::new(from_fn(|s: &Source| Destination { property: s.property }));
//! let source = vec![Source { property: 1 }, Source { property: 2 }];
//!
//! // Fixed array of exactly source.len() elements
//! let array = mapper.map_array(&source).unwrap();
//! assert_eq!(&*array, [Destination { property: 1 }, Destination { property: 2 }]);
//!
//! // Any collection with a Default constructor
//! let list: Vec<Destination> = mapper.map_into_new(&source).unwrap();
//! assert_eq!(list.len(), 2);
//!
//! // A collection that reports every change
//! let observed = mapper.map_into_observable(&source).unwrap();
//! assert_eq!(observed[1], Destination { property: 2 });
//! ```
//!
//! ### Rules That Can Fail
//!
//! The rule's error is handed back exactly as the rule produced it.
//!
//! ```rust
//! use sovran_mapper::{try_from_fn, Mapper};
//!
//! let mapper = Mapper::new(try_from_fn(|raw: &&str| raw.parse::<u16>()));
//!
//! let ports = mapper.map_array(&["80", "443"]).unwrap();
//! assert_eq!(&*ports, [80, 443]);
//!
//! match mapper.map_array(&["80", "http"]) {
//!     Ok(_) => unreachable!(),
//!     Err(e) => println!("bad port: {}", e),
//! }
//! ```
//!
//! ### Mapping an Async Stream
//!
//! Requires the `async` feature (enabled by default).
//!
//! ```rust
//! # #[cfg(feature = "async")]
//! # fn main() {
//! use futures::{executor::block_on, stream, StreamExt};
//! use sovran_mapper::{from_fn, Mapper};
//!
//! let mapper = Mapper::new(from_fn(|n: &u32| n * n));
//! let squares = mapper.map_stream(stream::iter(1..=3));
//!
//! let out: Vec<u32> = block_on(squares.map(Result::unwrap).collect());
//! assert_eq!(out, [1, 4, 9]);
//! # }
//! # #[cfg(not(feature = "async"))]
//! # fn main() {}
//! ```
//!
//! ### Sharing Rules Between Components
//!
//! ```rust
//! use sovran_mapper::{from_fn, MapperRegistry, RegistryError};
//! use std::convert::Infallible;
//! use std::thread;
//!
//! struct Reading { millivolts: u32 }
//! struct Volts(f64);
//!
//! fn main() -> Result<(), RegistryError> {
//!     let registry = MapperRegistry::new();
//!     registry.register::<Reading, Volts, _>(from_fn(|r: &Reading| {
//!         Volts(f64::from(r.millivolts) / 1000.0)
//!     }))?;
//!
//!     let worker = {
//!         let registry = registry.clone();
//!         thread::spawn(move || -> Result<f64, RegistryError> {
//!             let mapper = registry.resolve::<Reading, Volts, Infallible>()?;
//!             let volts = mapper.map_array(&[Reading { millivolts: 1500 }]).unwrap();
//!             Ok(volts[0].0)
//!         })
//!     };
//!
//!     assert_eq!(worker.join().unwrap()?, 1.5);
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! Plain operations cannot be handed a missing source. When arguments come from
//! somewhere they may be absent, go through [`Mapper::checked`]:
//!
//! ```rust
//! use sovran_mapper::{from_fn, Mapper, MappingError};
//!
//! let mapper = Mapper::new(from_fn(|n: &i32| n + 1));
//! let maybe: Option<&Vec<i32>> = None;
//!
//! match mapper.checked().map_into_new::<_, _, _, Vec<i32>>(maybe) {
//!     Ok(values) => println!("mapped {} values", values.len()),
//!     Err(MappingError::NullArgument { parameter }) => println!("{} was missing", parameter),
//!     Err(MappingError::Conversion(e)) => println!("rule failed: {}", e),
//! }
//! ```

mod any_value;
mod error;
mod mapper;
mod registry;
mod rule;

pub mod array;
pub mod collection;
pub mod observable;
#[cfg(feature = "async")]
pub mod stream;

pub use collection::GrowableCollection;
pub use error::{MappingError, RegistryError};
pub use mapper::{Checked, Mapper};
pub use observable::{CollectionChange, ObservableCollection, SubscriptionId};
pub use registry::{MapperRegistry, SharedRule};
pub use rule::{
    from_fn, populate_fn, try_from_fn, FnMapper, PopulateFn, PopulateMapper, Populating,
    TryFnMapper, TypeMapper,
};
