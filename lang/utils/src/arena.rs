use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

/* ---------------------------------- Index --------------------------------- */

pub use crate::new_key_type;

/// Stable integer handles handed out by arenas. Identities are allocated
/// monotonically and never reused for the lifetime of a compilation.
pub unsafe trait IndexLike: Clone + Copy + Eq + std::hash::Hash {
    type Meta;
    fn new(meta: Self::Meta, idx: usize) -> Self;
    fn index(&self) -> usize;
}

/* -------------------------------- Allocator ------------------------------- */

/// A monotone counter; yields `(meta, idx)` pairs, with `idx` never repeating.
#[derive(Debug)]
pub struct IndexAlloc<Meta>(Meta, usize);

impl IndexAlloc<()> {
    pub fn new() -> Self {
        IndexAlloc((), 0)
    }
}

impl<Meta: Copy> Iterator for IndexAlloc<Meta> {
    type Item = (Meta, usize);
    fn next(&mut self) -> Option<Self::Item> {
        let IndexAlloc(meta, idx) = self;
        let old = *idx;
        *idx += 1;
        Some((*meta, old))
    }
}

/// Allocator of allocators. Each arena draws from its own `IndexAlloc` branded
/// with a distinct meta, so ids from different arenas never collide.
pub struct GlobalAlloc(IndexAlloc<()>);

impl GlobalAlloc {
    pub fn new() -> Self {
        GlobalAlloc(IndexAlloc((), 0))
    }
    pub fn alloc(&mut self) -> IndexAlloc<usize> {
        IndexAlloc(self.0.next().unwrap().1, 0)
    }
}

impl Default for GlobalAlloc {
    fn default() -> Self {
        Self::new()
    }
}

/* ---------------------------------- Arena --------------------------------- */

/// An allocating map from ids to values. Ids handed out are append-only;
/// `get` on a never-assigned id is `None`, which is distinguishable from any
/// stored value.
#[derive(Debug)]
pub struct ArenaSparse<Id, T, Meta = usize> {
    allocator: IndexAlloc<Meta>,
    map: HashMap<Id, T>,
    _marker: std::marker::PhantomData<Id>,
}

impl<Id, T, Meta> ArenaSparse<Id, T, Meta>
where
    Meta: Copy,
    Id: IndexLike<Meta = Meta>,
{
    pub fn new(allocator: IndexAlloc<Meta>) -> Self {
        ArenaSparse { allocator, map: HashMap::new(), _marker: std::marker::PhantomData }
    }
    pub fn alloc(&mut self, val: T) -> Id {
        let (meta, idx) = self.allocator.next().unwrap();
        let id = IndexLike::new(meta, idx);
        self.map.insert(id, val);
        id
    }
    pub fn get(&self, id: &Id) -> Option<&T> {
        self.map.get(id)
    }
    pub fn get_mut(&mut self, id: &Id) -> Option<&mut T> {
        self.map.get_mut(id)
    }
    pub fn contains(&self, id: &Id) -> bool {
        self.map.contains_key(id)
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, Id, T> {
        self.map.iter()
    }
    pub fn keys(&self) -> impl Iterator<Item = &Id> {
        self.map.keys()
    }
}

impl<Id, T, Meta> IndexMut<&Id> for ArenaSparse<Id, T, Meta>
where
    Meta: Copy,
    Id: IndexLike<Meta = Meta>,
{
    fn index_mut(&mut self, id: &Id) -> &mut Self::Output {
        self.get_mut(id).unwrap()
    }
}

impl<Id, T, Meta> Index<&Id> for ArenaSparse<Id, T, Meta>
where
    Meta: Copy,
    Id: IndexLike<Meta = Meta>,
{
    type Output = T;
    fn index(&self, id: &Id) -> &Self::Output {
        self.get(id).unwrap()
    }
}

impl<'a, Id, T, Meta> IntoIterator for &'a ArenaSparse<Id, T, Meta>
where
    Meta: Copy,
    Id: IndexLike<Meta = Meta>,
{
    type Item = (&'a Id, &'a T);
    type IntoIter = std::collections::hash_map::Iter<'a, Id, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

/* ------------------------------- ArenaAssoc ------------------------------- */

/// A plain association keyed by ids allocated elsewhere.
#[derive(Debug, Clone)]
pub struct ArenaAssoc<Id, T> {
    map: HashMap<Id, T>,
}

impl<Id, T> ArenaAssoc<Id, T> {
    pub fn new() -> Self {
        ArenaAssoc { map: HashMap::new() }
    }
}

impl<Id, T> Default for ArenaAssoc<Id, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id, T> ArenaAssoc<Id, T>
where
    Id: Eq + std::hash::Hash,
{
    /// Insert a fresh binding; keeps the first value on a duplicate key.
    pub fn insert(&mut self, id: Id, val: T) {
        self.map.entry(id).or_insert(val);
    }
    /// Insert a fresh binding; `Err` carries the rejected value if the key is
    /// already taken. Used where duplicates indicate a pipeline bug.
    pub fn try_insert(&mut self, id: Id, val: T) -> Result<(), T> {
        match self.map.entry(id) {
            | std::collections::hash_map::Entry::Occupied(_) => Err(val),
            | std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(val);
                Ok(())
            }
        }
    }
    pub fn get(&self, id: &Id) -> Option<&T> {
        self.map.get(id)
    }
    pub fn contains(&self, id: &Id) -> bool {
        self.map.contains_key(id)
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, Id, T> {
        self.map.iter()
    }
    pub fn keys(&self) -> impl Iterator<Item = &Id> {
        self.map.keys()
    }
}

impl<Id, T> Index<&Id> for ArenaAssoc<Id, T>
where
    Id: Eq + std::hash::Hash,
{
    type Output = T;
    fn index(&self, id: &Id) -> &Self::Output {
        self.get(id).unwrap()
    }
}

impl<Id, T> IndexMut<&Id> for ArenaAssoc<Id, T>
where
    Id: Eq + std::hash::Hash,
{
    fn index_mut(&mut self, id: &Id) -> &mut Self::Output {
        self.map.get_mut(id).unwrap()
    }
}

impl<Id, T> IntoIterator for ArenaAssoc<Id, T> {
    type Item = (Id, T);
    type IntoIter = std::collections::hash_map::IntoIter<Id, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, Id, T> IntoIterator for &'a ArenaAssoc<Id, T> {
    type Item = (&'a Id, &'a T);
    type IntoIter = std::collections::hash_map::Iter<'a, Id, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<Id, T> Extend<(Id, T)> for ArenaAssoc<Id, T>
where
    Id: Eq + std::hash::Hash,
{
    fn extend<I: IntoIterator<Item = (Id, T)>>(&mut self, iter: I) {
        self.map.extend(iter);
    }
}

/* ------------------------------- ArenaForth ------------------------------- */

/// A bidirectional single-to-multi map; forward lookups widen, backward
/// lookups narrow.
#[derive(Debug, Clone)]
pub struct ArenaForth<P, Q> {
    forward: HashMap<P, Vec<Q>>,
    backward: HashMap<Q, P>,
}

impl<P, Q> ArenaForth<P, Q> {
    pub fn new() -> Self {
        ArenaForth { forward: HashMap::new(), backward: HashMap::new() }
    }
}

impl<P, Q> Default for ArenaForth<P, Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, Q> ArenaForth<P, Q>
where
    P: Eq + std::hash::Hash + Clone,
    Q: Eq + std::hash::Hash + Clone,
{
    pub fn insert(&mut self, p: P, q: Q) {
        self.forward.entry(p.clone()).or_default().push(q.clone());
        self.backward.insert(q, p);
    }
}

impl<P, Q> ArenaForth<P, Q>
where
    P: Eq + std::hash::Hash,
{
    pub fn forth(&self, p: &P) -> &[Q] {
        self.forward.get(p).map(|q| q.as_slice()).unwrap_or_default()
    }
}

impl<P, Q> ArenaForth<P, Q>
where
    Q: Eq + std::hash::Hash,
{
    pub fn back(&self, q: &Q) -> Option<&P> {
        self.backward.get(q)
    }
}

impl<'a, P, Q> IntoIterator for &'a ArenaForth<P, Q> {
    type Item = (&'a P, &'a Vec<Q>);
    type IntoIter = std::collections::hash_map::Iter<'a, P, Vec<Q>>;
    fn into_iter(self) -> Self::IntoIter {
        self.forward.iter()
    }
}

/* ---------------------------------- Macro --------------------------------- */

#[macro_export]
macro_rules! new_key_type {
    ( $(#[$outer:meta])* $vis:vis struct $name:ident < $meta:ty > ; $($rest:tt)* ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
        $vis struct $name($meta, usize);

        unsafe impl $crate::arena::IndexLike for $name {
            type Meta = $meta;
            fn new(meta: Self::Meta, idx: usize) -> Self {
                Self(meta, idx)
            }
            fn index(&self) -> usize {
                self.1
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:?}, {})", stringify!($name), self.0, self.1)
            }
        }

        impl $name {
            pub fn concise(&self) -> String {
                format!("[{:?}#{:?}]", self.0, self.1)
            }
        }

        $crate::new_key_type!($($rest)*);
    };

    ( $(#[$outer:meta])* $vis:vis struct $name:ident ; $($rest:tt)* ) => {
        $crate::new_key_type!( $(#[$outer])* $vis struct $name<usize> ; $($rest)* );
    };

    () => {}
}
