//! The seam to the external elaborator.
//!
//! Elaboration proper (assigning the original types and stage environments)
//! happens upstream. This crate only needs a way to hand freshly synthesized
//! subtrees back so their identities get covered by the type table too.

use crate::{syntax::*, ty::*};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ElabError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateEntry),
    #[error("cannot elaborate {site:?}: {message}")]
    Invalid { site: TermId, message: String },
}

pub type Result<T> = std::result::Result<T, ElabError>;

/// Elaborates a subtree the desugarer has just synthesized.
///
/// The contract mirrors the upstream elaborator's: after a successful call,
/// every identity reachable from `id` has a `TyInfo` entry. Entries that
/// already exist are left untouched; the table never renumbers.
pub trait Elaborator {
    fn elaborate(
        &mut self, arena: &SurfaceArena, types: &mut TypeTable, id: TermId, env: &StageEnv,
    ) -> Result<()>;
}
