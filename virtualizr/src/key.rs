#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Identity → position lookup used by the differ.
#[cfg(feature = "std")]
pub(crate) type KeyIndexMap<K> = HashMap<K, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyIndexMap<K> = BTreeMap<K, usize>;

/// Bound for item identities produced by an identity function.
///
/// With `std` this is `Hash + Eq`; without it, keys must be `Ord`.
#[cfg(feature = "std")]
pub trait IdentityKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> IdentityKey for K {}

#[cfg(not(feature = "std"))]
pub trait IdentityKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> IdentityKey for K {}
