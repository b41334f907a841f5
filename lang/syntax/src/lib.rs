pub mod fmt;
pub use fmt::*;

use derive_more::From;

/* --------------------------------- Binder --------------------------------- */

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName(pub String);

impl VarName {
    pub fn plain(&self) -> &str {
        let VarName(name) = self;
        name
    }
}

impl From<&str> for VarName {
    fn from(name: &str) -> Self {
        VarName(name.to_owned())
    }
}

/// The name an external reference resolves to, as backends will see it.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExternName(pub String);

impl From<&str> for ExternName {
    fn from(name: &str) -> Self {
        ExternName(name.to_owned())
    }
}

/// `extern foo` or `extern foo as "bar"`; the rename, if present, wins.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ExternRef {
    pub name: VarName,
    pub rename: Option<ExternName>,
}

impl ExternRef {
    pub fn extern_name(&self) -> ExternName {
        match &self.rename {
            | Some(name) => name.to_owned(),
            | None => ExternName(self.name.plain().to_owned()),
        }
    }
}

/* ------------------------------- Structural ------------------------------- */

/// any binding structure
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Abs<P, Tm>(pub Vec<P>, pub Tm);

/// `f(a_1, ...)` shaped application
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct App<Tm>(pub Tm, pub Vec<Tm>);

/// `let x = a in ...`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Let<Br, Be, Tail> {
    pub binder: Br,
    pub bindee: Be,
    pub tail: Tail,
}

/* --------------------------------- Staging -------------------------------- */

/// A future-stage fragment; the body is a program generated at the next stage.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Quote<Tm> {
    pub annot: StageAnnot,
    pub body: Tm,
}

/// How an escape reaches back across stage boundaries.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum EscapeKind {
    /// carries a value computed in the enclosing stage
    Persist,
    /// carries code computed in the enclosing stage
    Splice,
}

/// A cross-stage reference embedded in staged code; `levels` counts how many
/// stage boundaries the body reaches back through.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Escape<Tm> {
    pub kind: EscapeKind,
    pub levels: usize,
    pub body: Tm,
}

/// The surface tag on a quotation. Carried verbatim through the pipeline;
/// only backends interpret it.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum StageAnnot {
    Ordinary,
    Render,
    Shader,
    /// surface syntax not modeled yet; kept as-is for forward compatibility
    Unknown(String),
}

impl StageAnnot {
    pub fn is_render(&self) -> bool {
        matches!(self, StageAnnot::Render)
    }
}

/// The role a staged program plays for the shader backends, derived from its
/// annotation and its position in the quote hierarchy.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum StageRole {
    Render,
    Vertex,
    Fragment,
}

/* --------------------------------- Literal -------------------------------- */

#[derive(From, Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Unit,
}
