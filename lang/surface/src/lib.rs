//! The elaborated surface tree of strata and the desugaring passes that run
//! over it.
//!
//! The tree arrives here already elaborated: every node carries a stable
//! identity, and the [`ty::TypeTable`] records its resolved type together
//! with the stage environment in effect at that point. The two passes in
//! [`desugar`] make the staging discipline explicit: implicit cross-stage
//! reads become persist escapes, macro invocations become (possibly spliced)
//! calls. Whatever they synthesize is handed back to the external
//! [`elab::Elaborator`] so the type table keeps covering every identity.

pub mod syntax;
pub mod ty;
pub mod elab;
pub mod desugar;
pub mod err;
pub mod fmt;

pub use err::*;
