pub use strata_syntax::*;
pub use strata_utils::arena::*;

use derive_more::From;

/* ------------------------------- Identifier ------------------------------- */

strata_utils::new_key_type! {
    pub struct DefId;
    pub struct TermId;
}

/* ---------------------------------- Term ---------------------------------- */

#[derive(From, Clone, Debug)]
pub enum Term {
    /// a variable read, still by name; resolved to its binder later
    #[from(ignore)]
    Var(VarName),
    /// a reference to a name defined outside the staged program
    Ext(ExternRef),
    Lit(Literal),
    Abs(Abs<DefId, TermId>),
    App(App<TermId>),
    Let(Let<DefId, TermId, TermId>),
    Quote(Quote<TermId>),
    Esc(Escape<TermId>),
    /// a macro invocation; removed by desugaring
    #[from(ignore)]
    Mac(VarName),
}

/* ---------------------------------- Arena --------------------------------- */

/// The arenas backing one elaborated tree. Identities are allocated
/// monotonically and shared with everything the desugarer synthesizes later;
/// nothing is ever renumbered.
#[derive(Debug)]
pub struct SurfaceArena {
    pub defs: ArenaSparse<DefId, VarName>,
    pub terms: ArenaSparse<TermId, Term>,
}

impl SurfaceArena {
    pub fn new(alloc: &mut GlobalAlloc) -> Self {
        Self { defs: ArenaSparse::new(alloc.alloc()), terms: ArenaSparse::new(alloc.alloc()) }
    }
    pub fn def(&self, id: &DefId) -> VarName {
        self.defs[id].to_owned()
    }
    pub fn term(&self, id: &TermId) -> Term {
        self.terms[id].to_owned()
    }
}
