//! Lifting: scope tree in, flat procedure and staged-program tables out.
//!
//! Function scopes become procedures with explicit, ordered captures (the
//! marshalling order for closures); quotation scopes become staged programs
//! with explicit escape lists. Grouping partitions the procedures by the
//! staged program that lexically contains them, so a backend can collect one
//! shader's helpers without walking the tree again.

use crate::{binders::DefUseOut, err::*, syntax::*};
use indexmap::IndexMap;
use strata_utils::arena::ArenaForth;

pub struct Lifter<'a> {
    pub arena: &'a SurfaceArena,
    pub types: &'a TypeTable,
    pub def_use: &'a DefUseOut,
    pub tree: ScopeTree,
}

pub struct LiftOut {
    pub procs: IndexMap<ScopeId, Procedure>,
    pub stages: IndexMap<ScopeId, StagedProgram>,
    pub main: ScopeId,
    pub top_level: Vec<ScopeId>,
    pub grouped: ArenaForth<ScopeId, ScopeId>,
}

impl Lifter<'_> {
    pub fn run(self) -> Result<LiftOut> {
        let Lifter { arena, types, def_use, tree } = self;
        let mut procs = IndexMap::new();
        let mut stages = IndexMap::new();

        for id in tree.ordered() {
            let scope = &tree.scopes[&id];
            // scopes discovered before desugaring and elaboration finished
            // would show up here as table gaps; abort instead of skipping
            if !types.contains(&scope.body) {
                Err(StagedError::ResolutionGap { site: scope.body })?
            }
            for esc in scope.persists.iter().chain(scope.splices.iter()) {
                if !types.contains(&esc.body) {
                    Err(StagedError::ResolutionGap { site: esc.body })?
                }
            }
            // a capture nobody reads means def-use ran on a different tree
            for def in scope.free.iter() {
                if def_use.users.forth(def).is_empty() {
                    Err(StagedError::ResolutionGap { site: scope.body })?
                }
            }
            debug_assert!(scope.free.iter().all(|def| {
                let mut up = scope.parent;
                while let Some(parent) = up {
                    let outer = &tree.scopes[&parent];
                    if outer.bound.contains(def) {
                        return true;
                    }
                    up = outer.parent;
                }
                false
            }));

            match scope.kind {
                | ScopeKind::Fn => {
                    let params = match scope.site {
                        | None => Vec::new(),
                        | Some(site) => match arena.term(&site) {
                            | Term::Abs(Abs(params, _)) => params,
                            | _ => Err(StagedError::UnsupportedConstruct {
                                site,
                                construct: "function scope not rooted at an abstraction",
                            })?,
                        },
                    };
                    procs.insert(id, Procedure {
                        site: scope.site,
                        params,
                        captures: scope.free.iter().copied().collect(),
                        body: scope.body,
                        parent: scope.parent,
                        children: scope.children.to_owned(),
                        quote_parent: scope.quote_parent,
                        quote_children: scope.quote_children.to_owned(),
                    });
                }
                | ScopeKind::Quote => {
                    let Some(site) = scope.site else {
                        Err(StagedError::UnknownStage { scope: id })?
                    };
                    let annot = match arena.term(&site) {
                        | Term::Quote(Quote { annot, body: _ }) => annot,
                        | _ => Err(StagedError::UnsupportedConstruct {
                            site,
                            construct: "staged program not rooted at a quotation",
                        })?,
                    };
                    stages.insert(id, StagedProgram {
                        site,
                        annot,
                        body: scope.body,
                        bound: scope.bound.iter().copied().collect(),
                        persists: scope.persists.to_owned(),
                        splices: scope.splices.to_owned(),
                        parent: scope.parent,
                        children: scope.children.to_owned(),
                        quote_parent: scope.quote_parent,
                        quote_children: scope.quote_children.to_owned(),
                    });
                }
            }
        }

        // exactly one procedure is main: the top-level body
        let main = tree.root;
        let Some(entry) = procs.get(&main) else {
            Err(StagedError::MalformedMain { scope: main, reason: "root scope is not a procedure" })?
        };
        if !entry.params.is_empty() {
            Err(StagedError::MalformedMain { scope: main, reason: "main takes parameters" })?
        }
        if !entry.captures.is_empty() {
            Err(StagedError::MalformedMain { scope: main, reason: "main captures variables" })?
        }
        if entry.quote_parent.is_some() {
            Err(StagedError::MalformedMain { scope: main, reason: "main sits inside a quotation" })?
        }

        // partition the procedures by enclosing staged program
        let mut top_level = Vec::new();
        let mut grouped = ArenaForth::new();
        for (id, proc) in procs.iter() {
            match proc.quote_parent {
                | None => top_level.push(*id),
                | Some(stage) => grouped.insert(stage, *id),
            }
        }

        log::debug!(
            "lifted {} procedure(s) and {} staged program(s), {} top-level",
            procs.len(),
            stages.len(),
            top_level.len()
        );
        Ok(LiftOut { procs, stages, main, top_level, grouped })
    }
}
