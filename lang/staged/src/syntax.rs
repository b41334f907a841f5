pub use strata_surface::syntax::*;
pub use strata_surface::ty::*;

use indexmap::IndexSet;

/* ------------------------------- Identifier ------------------------------- */

strata_utils::new_key_type! {
    pub struct ScopeId;
}

/* ---------------------------------- Scope --------------------------------- */

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// a function body; does not start a new stage
    Fn,
    /// a quotation body; one stage removed from its surroundings
    Quote,
}

/// One escape found lexically directly in a quotation: the site, the
/// expression to evaluate in the enclosing stage, and how many stage
/// boundaries it reaches back through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeSite {
    pub site: TermId,
    pub body: TermId,
    pub levels: usize,
}

/// One lexical region that introduces bindings. Carries both containment
/// hierarchies: plain lexical parent/children, and the quote hierarchy that
/// links quotations to the nearest enclosing quotation, skipping functions
/// (a function inside a quotation does not start a new stage).
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// the `Abs` or `Quote` node this scope came from; the root has none
    pub site: Option<TermId>,
    pub body: TermId,
    /// identities bound directly in this scope, in source order
    pub bound: IndexSet<DefId>,
    /// identities referenced but bound strictly outside, in order of first
    /// occurrence in a pre-order walk of the body
    pub free: IndexSet<DefId>,
    /// persist escapes lexically direct in this scope; quotations only
    pub persists: Vec<EscapeSite>,
    /// splice escapes lexically direct in this scope; quotations only
    pub splices: Vec<EscapeSite>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub quote_parent: Option<ScopeId>,
    pub quote_children: Vec<ScopeId>,
}

/// The scope tree produced by discovery; consumed by the lifter.
#[derive(Debug)]
pub struct ScopeTree {
    pub scopes: ArenaSparse<ScopeId, Scope>,
    pub root: ScopeId,
}

impl ScopeTree {
    /// Scope ids in allocation order, which is pre-order of discovery.
    pub fn ordered(&self) -> Vec<ScopeId> {
        let mut ids: Vec<_> = self.scopes.keys().copied().collect();
        ids.sort_by_key(|id| id.index());
        ids
    }
}

/* ---------------------------------- Lifted -------------------------------- */

/// A closure made explicit. The capture list's order is the marshalling
/// order: callers and backends hand captured values across in exactly this
/// sequence.
#[derive(Debug)]
pub struct Procedure {
    pub site: Option<TermId>,
    pub params: Vec<DefId>,
    pub captures: Vec<DefId>,
    pub body: TermId,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub quote_parent: Option<ScopeId>,
    pub quote_children: Vec<ScopeId>,
}

/// A quotation made explicit. The annotation is carried verbatim; only
/// backends interpret it.
#[derive(Debug)]
pub struct StagedProgram {
    pub site: TermId,
    pub annot: StageAnnot,
    pub body: TermId,
    pub bound: Vec<DefId>,
    pub persists: Vec<EscapeSite>,
    pub splices: Vec<EscapeSite>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub quote_parent: Option<ScopeId>,
    pub quote_children: Vec<ScopeId>,
}
