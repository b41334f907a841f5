//! Assembly: runs the analyses in pipeline order and packages the one
//! immutable artifact every backend consumes.

use crate::{
    binders::{DefUseOut, DefUseResolver},
    err::*,
    externs::ExternCollector,
    lift::{LiftOut, Lifter},
    prims::{self, PrimOut},
    scope::ScopeBuilder,
    syntax::*,
};
use indexmap::IndexMap;
use strata_utils::arena::ArenaForth;

/// Orchestrates the staged pipeline over a desugared, elaborated tree:
/// intrinsics first, then scope discovery, def-use and extern resolution,
/// lifting, grouping. The only constructor of [`StagedIr`].
pub struct Assembler {
    pub alloc: GlobalAlloc,
    pub arena: SurfaceArena,
    pub types: TypeTable,
    pub top: TermId,
}

impl Assembler {
    pub fn run(self) -> Result<StagedIr> {
        let Assembler { mut alloc, mut arena, mut types, top } = self;
        // intrinsics claim their reserved identities before user code is
        // looked at, so both extern flavors share one numbering space
        let PrimOut { exts, prims } = prims::register(&mut arena, &mut types)?;
        let tree = ScopeBuilder::new(&arena, &mut alloc).run(top)?;
        let def_use = DefUseResolver::new(&arena).run(top)?;
        let exts = ExternCollector::new(&arena, exts).run(top)?;
        let LiftOut { procs, stages, main, top_level, grouped } =
            Lifter { arena: &arena, types: &types, def_use: &def_use, tree }.run()?;
        let DefUseOut { def_use, users } = def_use;
        let ir = StagedIr {
            arena,
            types,
            top,
            def_use,
            users,
            exts,
            prims,
            procs,
            main,
            stages,
            top_level,
            grouped,
        };
        log::debug!("assembled {}", ir.main.ugly(&crate::fmt::Formatter::new(&ir)));
        Ok(ir)
    }
}

/// The assembled intermediate representation: everything downstream reads,
/// nothing downstream writes.
#[derive(Debug)]
pub struct StagedIr {
    pub arena: SurfaceArena,
    pub types: TypeTable,
    pub top: TermId,
    /// every variable read to its binding site
    pub def_use: ArenaAssoc<TermId, DefId>,
    /// every binding site back to its reads
    pub users: ArenaForth<DefId, TermId>,
    /// every external reference (intrinsics included) to its external name
    pub exts: ArenaAssoc<TermId, ExternName>,
    /// builtin name to its reserved identity
    pub prims: ArenaAssoc<ExternName, TermId>,
    /// lifted procedures, in identity order; `main` is one of them
    pub procs: IndexMap<ScopeId, Procedure>,
    pub main: ScopeId,
    /// lifted staged programs, in identity order
    pub stages: IndexMap<ScopeId, StagedProgram>,
    /// procedures outside every quotation
    pub top_level: Vec<ScopeId>,
    /// staged program to the procedures lexically inside it
    pub grouped: ArenaForth<ScopeId, ScopeId>,
}

impl StagedIr {
    /// The classification backends share: a render-annotated program is
    /// `Render`; otherwise a program with no quote parent, or whose quote
    /// parent is render-annotated, is `Vertex`; anything deeper is
    /// `Fragment`.
    pub fn role(&self, id: ScopeId) -> Result<StageRole> {
        let Some(stage) = self.stages.get(&id) else {
            Err(StagedError::UnknownStage { scope: id })?
        };
        if stage.annot.is_render() {
            return Ok(StageRole::Render);
        }
        match stage.quote_parent {
            | None => Ok(StageRole::Vertex),
            | Some(parent) => {
                let Some(outer) = self.stages.get(&parent) else {
                    Err(StagedError::UnknownStage { scope: parent })?
                };
                if outer.annot.is_render() {
                    Ok(StageRole::Vertex)
                } else {
                    Ok(StageRole::Fragment)
                }
            }
        }
    }

    /// The at-most-one staged program nested immediately inside `id`. A
    /// shader stage may nest at most one further stage; more is a
    /// backend-reported error.
    pub fn quote_child(&self, id: ScopeId) -> Result<Option<ScopeId>> {
        let Some(stage) = self.stages.get(&id) else {
            Err(StagedError::UnknownStage { scope: id })?
        };
        match stage.quote_children.as_slice() {
            | [] => Ok(None),
            | [child] => Ok(Some(*child)),
            | _ => Err(StagedError::UnsupportedConstruct {
                site: stage.site,
                construct: "more than one staged program nested in a stage",
            }),
        }
    }

    /// The procedures lexically inside the staged program `id`.
    pub fn members(&self, id: ScopeId) -> &[ScopeId] {
        self.grouped.forth(&id)
    }
}
