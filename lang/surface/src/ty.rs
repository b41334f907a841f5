//! Resolved types, stage environments, and the append-only type table.

use crate::syntax::*;
use thiserror::Error;

/* ---------------------------------- Type ---------------------------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Unit,
    Bool,
    Int,
    Float,
    /// a bulk value; demotes to its element once persisted across a stage
    Arr(Box<Type>),
    /// a quoted program producing a value of the inner type
    Code(Box<Type>),
    Fn(Vec<Type>, Box<Type>),
    /// a type this layer does not interpret (externs, host-only data)
    Opaque(String),
}

impl Type {
    pub fn arr(elem: Type) -> Self {
        Type::Arr(Box::new(elem))
    }
    pub fn code(inner: Type) -> Self {
        Type::Code(Box::new(inner))
    }
    pub fn func(params: Vec<Type>, ret: Type) -> Self {
        Type::Fn(params, Box::new(ret))
    }
    /// Unwrap one level of array typing; identity on anything else. Persisted
    /// bulk values hand over a single element per invocation.
    pub fn elem(&self) -> Type {
        match self {
            | Type::Arr(elem) => (**elem).to_owned(),
            | _ => self.to_owned(),
        }
    }
    /// Unwrap one level of code typing; identity on anything else.
    pub fn splice(&self) -> Type {
        match self {
            | Type::Code(inner) => (**inner).to_owned(),
            | _ => self.to_owned(),
        }
    }
}

/* ------------------------------- Stage env -------------------------------- */

/// One stage's worth of bindings.
#[derive(Clone, Debug, Default)]
pub struct StageFrame(pub im::HashMap<VarName, DefId>);

/// The stack of scopes captured at a node. Frame 0 is the current stage;
/// frame `k` is `k` stage boundaries outward.
#[derive(Clone, Debug)]
pub struct StageEnv(im::Vector<StageFrame>);

impl StageEnv {
    pub fn new() -> Self {
        StageEnv(im::vector![StageFrame::default()])
    }
    /// Bind a name in the current stage.
    pub fn bind(&self, name: VarName, def: DefId) -> Self {
        let StageEnv(mut frames) = self.to_owned();
        let StageFrame(map) = &mut frames[0];
        map.insert(name, def);
        StageEnv(frames)
    }
    /// Enter a quotation: every existing binding moves one stage outward.
    pub fn enter_stage(&self) -> Self {
        let StageEnv(mut frames) = self.to_owned();
        frames.push_front(StageFrame::default());
        StageEnv(frames)
    }
    /// Step back out through `k` stage boundaries, as escape bodies do.
    /// Clamped at the outermost stage; levels are validated downstream, not
    /// here.
    pub fn exit_stages(&self, k: usize) -> Self {
        let StageEnv(frames) = self;
        let mut frames = frames.to_owned();
        StageEnv(frames.split_off(k.min(frames.len() - 1)))
    }
    /// The stage distance of a name: the innermost frame that binds it.
    pub fn distance(&self, name: &VarName) -> Option<usize> {
        self.lookup(name).map(|(k, _)| k)
    }
    pub fn lookup(&self, name: &VarName) -> Option<(usize, DefId)> {
        let StageEnv(frames) = self;
        frames.iter().enumerate().find_map(|(k, StageFrame(map))| {
            map.get(name).map(|def| (k, *def))
        })
    }
    pub fn depth(&self) -> usize {
        let StageEnv(frames) = self;
        frames.len()
    }
}

impl Default for StageEnv {
    fn default() -> Self {
        Self::new()
    }
}

/* ------------------------------- Type table ------------------------------- */

/// What elaboration records per identity.
#[derive(Clone, Debug)]
pub struct TyInfo {
    pub ty: Type,
    pub env: StageEnv,
}

#[derive(Error, Debug, Clone)]
#[error("type table entry for {site:?} appended twice")]
pub struct DuplicateEntry {
    pub site: TermId,
}

/// Mapping from node identity to its elaboration record. The table only ever
/// grows: `append` is the sole mutator and rejects keys it has seen, so later
/// passes can index by identity against a stable mapping.
#[derive(Debug, Default)]
pub struct TypeTable {
    entries: ArenaAssoc<TermId, TyInfo>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn append(&mut self, site: TermId, info: TyInfo) -> Result<(), DuplicateEntry> {
        self.entries.try_insert(site, info).map_err(|_| DuplicateEntry { site })
    }
    pub fn get(&self, site: &TermId) -> Option<&TyInfo> {
        self.entries.get(site)
    }
    pub fn contains(&self, site: &TermId) -> bool {
        self.entries.contains(site)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn keys(&self) -> impl Iterator<Item = &TermId> {
        self.entries.keys()
    }
}
