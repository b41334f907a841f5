use crate::{elab::ElabError, syntax::*};
use thiserror::Error;

/// Errors reported while desugaring. All of them are internal-consistency
/// failures: the upstream checker has already rejected user mistakes, so any
/// of these aborts the compilation.
#[derive(Error, Debug, Clone)]
pub enum DesugarError {
    #[error("name `{name}` at {site:?} not found in its stage environment")]
    StageResolution { name: VarName, site: TermId },
    #[error("no type table entry for {site:?}; elaboration did not cover it")]
    MissingTyInfo { site: TermId },
    #[error(transparent)]
    Elab(#[from] ElabError),
}

pub type Result<T> = std::result::Result<T, DesugarError>;
