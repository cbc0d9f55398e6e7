use crate::any_value::AnyRule;
use crate::error::RegistryError;
use crate::mapper::Mapper;
use crate::rule::TypeMapper;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A registered rule, shareable across threads.
pub type SharedRule<S, D, E> = Arc<dyn TypeMapper<S, D, Error = E> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RuleKey {
    source: TypeId,
    destination: TypeId,
}

impl RuleKey {
    fn of<S: 'static, D: 'static>() -> Self {
        Self {
            source: TypeId::of::<S>(),
            destination: TypeId::of::<D>(),
        }
    }
}

/// A thread-safe store of mapping rules, one per source/destination type pair.
///
/// Rules are registered once, typically at startup, and resolved into a
/// [`Mapper`] wherever a conversion is needed. Cloning the registry is cheap
/// and every clone sees the same rules.
///
/// Resolved rules are invoked without any locking, so a registered rule must
/// be safe to call from several threads at once.
///
/// # Examples
///
/// ```
/// use sovran_mapper::{from_fn, MapperRegistry, RegistryError};
/// use std::convert::Infallible;
///
/// struct Order { cents: u64 }
/// struct Invoice { total: String }
///
/// let registry = MapperRegistry::new();
/// registry.register::<Order, Invoice, _>(from_fn(|o: &Order| Invoice {
///     total: format!("${}.{:02}", o.cents / 100, o.cents % 100),
/// }))?;
///
/// let mapper = registry.resolve::<Order, Invoice, Infallible>()?;
/// let invoices = mapper.map_array(&[Order { cents: 1999 }]).unwrap();
/// assert_eq!(invoices[0].total, "$19.99");
///
/// match registry.resolve::<Invoice, Order, Infallible>() {
///     Err(RegistryError::RuleNotRegistered { .. }) => {}
///     _ => panic!("no rule goes from Invoice to Order"),
/// }
/// # Ok::<(), RegistryError>(())
/// ```
#[derive(Clone, Default)]
pub struct MapperRegistry {
    rules: Arc<RwLock<HashMap<RuleKey, AnyRule>>>,
}

impl MapperRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule mapping `S` to `D`.
    ///
    /// Returns `Ok(true)` if this replaced a previously registered rule for the
    /// same pair.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockError` if the internal lock cannot be acquired.
    pub fn register<S, D, R>(&self, rule: R) -> Result<bool, RegistryError>
    where
        S: 'static,
        D: 'static,
        R: TypeMapper<S, D> + Send + Sync + 'static,
        R::Error: 'static,
    {
        let shared: SharedRule<S, D, R::Error> = Arc::new(rule);
        let mut rules = self.rules.write().map_err(|_| RegistryError::LockError)?;
        let replaced = rules
            .insert(RuleKey::of::<S, D>(), AnyRule::new(shared))
            .is_some();

        debug!(
            source = type_name::<S>(),
            destination = type_name::<D>(),
            replaced,
            "registered mapping rule"
        );
        Ok(replaced)
    }

    /// Resolves the rule mapping `S` to `D` into a [`Mapper`].
    ///
    /// `E` must be the error type of the registered rule; use
    /// [`Infallible`](std::convert::Infallible) for rules built with
    /// [`from_fn`](crate::from_fn).
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::LockError` if the internal lock cannot be acquired
    /// - Returns `RegistryError::RuleNotRegistered` if no rule maps `S` to `D`
    /// - Returns `RegistryError::ErrorTypeMismatch` if the rule's error type is not `E`
    pub fn resolve<S, D, E>(&self) -> Result<Mapper<SharedRule<S, D, E>>, RegistryError>
    where
        S: 'static,
        D: 'static,
        E: 'static,
    {
        let rules = self.rules.read().map_err(|_| RegistryError::LockError)?;
        let entry = rules.get(&RuleKey::of::<S, D>()).ok_or_else(|| {
            debug!(
                source = type_name::<S>(),
                destination = type_name::<D>(),
                "no mapping rule registered"
            );
            RegistryError::RuleNotRegistered {
                source_type: type_name::<S>(),
                destination_type: type_name::<D>(),
            }
        })?;

        match entry.downcast::<S, D, E>() {
            Some(rule) => Ok(Mapper::new(rule)),
            None => {
                debug!(
                    requested = type_name::<E>(),
                    registered = entry.error_type_name(),
                    "mapping rule error type mismatch"
                );
                Err(RegistryError::ErrorTypeMismatch {
                    source_type: type_name::<S>(),
                    destination_type: type_name::<D>(),
                })
            }
        }
    }

    /// Checks whether a rule maps `S` to `D`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockError` if the internal lock cannot be acquired.
    pub fn contains<S: 'static, D: 'static>(&self) -> Result<bool, RegistryError> {
        let rules = self.rules.read().map_err(|_| RegistryError::LockError)?;
        Ok(rules.contains_key(&RuleKey::of::<S, D>()))
    }

    /// Removes the rule mapping `S` to `D`.
    ///
    /// Mappers already resolved from it keep working.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockError` if the internal lock cannot be acquired.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if a rule was removed, `Ok(false)` otherwise.
    pub fn remove<S: 'static, D: 'static>(&self) -> Result<bool, RegistryError> {
        let mut rules = self.rules.write().map_err(|_| RegistryError::LockError)?;
        let removed = rules.remove(&RuleKey::of::<S, D>()).is_some();
        debug!(
            source = type_name::<S>(),
            destination = type_name::<D>(),
            removed,
            "removed mapping rule"
        );
        Ok(removed)
    }

    /// Returns the number of registered rules.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockError` if the internal lock cannot be acquired.
    pub fn len(&self) -> Result<usize, RegistryError> {
        let rules = self.rules.read().map_err(|_| RegistryError::LockError)?;
        Ok(rules.len())
    }

    /// Returns true if no rules are registered.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LockError` if the internal lock cannot be acquired.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        let rules = self.rules.read().map_err(|_| RegistryError::LockError)?;
        Ok(rules.is_empty())
    }
}

impl fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("MapperRegistry");
        match self.rules.read() {
            Ok(rules) => out.field("rules", &rules.len()),
            Err(_) => out.field("rules", &"<poisoned>"),
        };
        out.finish()
    }
}
