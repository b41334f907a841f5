//! The formatter trait. Per-phase crates provide the `Fmter` that carries
//! their arenas.

use crate::*;

pub trait Ugly<'a, Fmter> {
    fn ugly(&self, f: &'a Fmter) -> String;
}

impl std::fmt::Display for VarName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let VarName(name) = self;
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for ExternName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ExternName(name) = self;
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Literal::Int(i) => write!(f, "{}", i),
            | Literal::Float(x) => write!(f, "{}", x),
            | Literal::Bool(b) => write!(f, "{}", b),
            | Literal::Unit => write!(f, "()"),
        }
    }
}

impl std::fmt::Display for StageAnnot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | StageAnnot::Ordinary => write!(f, "ordinary"),
            | StageAnnot::Render => write!(f, "render"),
            | StageAnnot::Shader => write!(f, "shader"),
            | StageAnnot::Unknown(tag) => write!(f, "{}", tag),
        }
    }
}

impl std::fmt::Display for StageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | StageRole::Render => write!(f, "render"),
            | StageRole::Vertex => write!(f, "vertex"),
            | StageRole::Fragment => write!(f, "fragment"),
        }
    }
}
