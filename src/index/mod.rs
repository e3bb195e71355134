use std::collections::HashMap;
use std::hash::Hash;

/// Key → record lookup over a borrowed record set.
///
/// Keys are expected to be unique. When they are not, the last record with a
/// given key wins and the key is remembered in [`PrimaryIndex::duplicate_keys`]
/// so callers can report it as a data-quality issue.
#[derive(Clone, Debug)]
pub struct PrimaryIndex<'a, K, R> {
    by_key: HashMap<K, &'a R>,
    order: Vec<K>,
    duplicates: Vec<K>,
}

impl<'a, K, R> PrimaryIndex<'a, K, R>
where
    K: Eq + Hash + Clone,
{
    pub fn build<F>(records: &'a [R], key: F) -> Self
    where
        F: Fn(&R) -> K,
    {
        let mut by_key = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        let mut duplicates = Vec::new();
        for record in records {
            let k = key(record);
            match by_key.insert(k.clone(), record) {
                None => order.push(k),
                Some(_) if !duplicates.contains(&k) => duplicates.push(k),
                Some(_) => {}
            }
        }
        Self {
            by_key,
            order,
            duplicates,
        }
    }

    pub fn get(&self, key: &K) -> Option<&'a R> {
        self.by_key.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// One winning record per key, in order of each key's first appearance.
    pub fn records(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.order.iter().filter_map(|k| self.by_key.get(k).copied())
    }

    /// Keys that appeared more than once, in order of their first repeat.
    pub fn duplicate_keys(&self) -> &[K] {
        &self.duplicates
    }
}

/// Map that iterates in first-insertion order of its keys.
#[derive(Clone, Debug)]
pub struct GroupMap<K, V> {
    entries: Vec<(K, V)>,
    positions: HashMap<K, usize>,
}

impl<K, V> Default for GroupMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K, V> GroupMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `key`, inserting `init()` at the end if it is new.
    pub fn entry_or_insert_with<F>(&mut self, key: K, init: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let idx = match self.positions.get(&key) {
            Some(idx) => *idx,
            None => {
                self.entries.push((key.clone(), init()));
                let idx = self.entries.len() - 1;
                self.positions.insert(key, idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.positions.get(key).map(|idx| &self.entries[*idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Number of records per group value.
pub fn count_by<R, K, F>(records: &[R], group: F) -> GroupMap<K, usize>
where
    K: Eq + Hash + Clone,
    F: Fn(&R) -> K,
{
    let mut out = GroupMap::new();
    for record in records {
        *out.entry_or_insert_with(group(record), || 0) += 1;
    }
    out
}

/// Running sum of `value` per group value.
pub fn sum_by<R, K, G, V>(records: &[R], group: G, value: V) -> GroupMap<K, f64>
where
    K: Eq + Hash + Clone,
    G: Fn(&R) -> K,
    V: Fn(&R) -> f64,
{
    let mut out = GroupMap::new();
    for record in records {
        *out.entry_or_insert_with(group(record), || 0.0) += value(record);
    }
    out
}

/// One-to-many grouping that keeps input order inside each group.
pub fn group_by<'a, R, K, F>(records: &'a [R], group: F) -> GroupMap<K, Vec<&'a R>>
where
    K: Eq + Hash + Clone,
    F: Fn(&R) -> K,
{
    let mut out = GroupMap::new();
    for record in records {
        out.entry_or_insert_with(group(record), Vec::new).push(record);
    }
    out
}
