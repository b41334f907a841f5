use crate::syntax::*;
use thiserror::Error;

/// Errors from scope discovery, resolution, lifting, and assembly. None of
/// these are user errors: each one means a pipeline-ordering or consistency
/// bug, and each one aborts the compilation with no partial artifact.
#[derive(Error, Debug, Clone)]
pub enum StagedError {
    #[error("variable `{name}` at {site:?} has no lexical binding")]
    UnresolvedVar { name: VarName, site: TermId },
    #[error("no table entry for {site:?}; pipeline ordering violated")]
    ResolutionGap { site: TermId },
    #[error("escape at {site:?} sits outside any quotation")]
    EscapeOutsideQuote { site: TermId },
    #[error("unsupported construct at {site:?}: {construct}")]
    UnsupportedConstruct { site: TermId, construct: &'static str },
    #[error("scope {scope:?} is not in the staged program table")]
    UnknownStage { scope: ScopeId },
    #[error("main procedure {scope:?} is malformed: {reason}")]
    MalformedMain { scope: ScopeId, reason: &'static str },
    #[error(transparent)]
    Table(#[from] DuplicateEntry),
}

pub type Result<T> = std::result::Result<T, StagedError>;
