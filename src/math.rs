use std::collections::BTreeMap;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// Map with a deterministic iteration order, used wherever the order in which entries are
/// visited is observable (e.g. which error is reported first).
pub type OrderedMap<K, V> = BTreeMap<K, V>;
/// Insertion ordered set, states and groups keep the order in which they were declared.
pub type IndexedSet<S> = indexmap::IndexSet<S, fxhash::FxBuildHasher>;
/// Insertion ordered map, see [`IndexedSet`].
pub type IndexedMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;
