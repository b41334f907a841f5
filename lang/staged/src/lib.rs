//! The staged intermediate representation of strata.
//!
//! Takes the desugared, elaborated tree and flattens its staging structure:
//! scope discovery, def-use resolution, extern collection, and lifting of
//! nested functions and quotations into flat tables of procedures and staged
//! programs. The assembled [`assemble::StagedIr`] is the sole compilation
//! artifact every backend and the interpreter consumes.

pub mod syntax;
pub mod scope;
pub mod binders;
pub mod externs;
pub mod prims;
pub mod lift;
pub mod assemble;
pub mod err;
pub mod fmt;

pub use assemble::*;
pub use err::*;
