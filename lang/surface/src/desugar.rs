//! Desugaring: the rewrites that make the staging discipline explicit.
//!
//! Two passes run in a fixed order, each exactly once per compilation:
//!
//! 1. [`AutoPersist`] turns implicit cross-stage variable reads into persist
//!    escapes carrying their stage distance.
//! 2. [`MacroExpand`] turns macro invocations into zero-argument calls,
//!    spliced across stages when the definition lives further out.
//!
//! Both are built from the same structural copy in [`Rewrite::structural`]:
//! a pass only overrides the node kinds it changes. Unchanged subtrees keep
//! their identities, so the type table only ever grows.

use crate::{elab::Elaborator, err::*, syntax::*, ty::*};

/// Shared state of the desugaring passes. The type table is threaded through
/// explicitly; every synthesized node goes back through the elaborator before
/// the pass moves on.
pub struct Desugarer<'a, E> {
    pub arena: &'a mut SurfaceArena,
    pub types: &'a mut TypeTable,
    pub elab: &'a mut E,
}

impl<'a, E: Elaborator> Desugarer<'a, E> {
    pub fn new(arena: &'a mut SurfaceArena, types: &'a mut TypeTable, elab: &'a mut E) -> Self {
        Self { arena, types, elab }
    }

    /// Run both passes over the whole program, auto-persist first. The
    /// macro pass's stage-distance computation relies on the escapes the
    /// first pass made explicit, hence the order.
    pub fn run(mut self, top: TermId) -> Result<TermId> {
        let top = AutoPersist.term(&mut self, top)?;
        log::debug!("auto-persist done, top is now {}", top.concise());
        let top = MacroExpand.term(&mut self, top)?;
        log::debug!("macro expansion done: {}", top.ugly(&crate::fmt::Formatter::new(self.arena)));
        Ok(top)
    }

    /// The elaboration record captured at `id`.
    pub fn ty_info(&self, id: TermId) -> Result<TyInfo> {
        let Some(info) = self.types.get(&id) else {
            Err(DesugarError::MissingTyInfo { site: id })?
        };
        Ok(info.to_owned())
    }

    /// Allocate a synthesized node and elaborate it under `env`.
    pub fn alloc(&mut self, term: Term, env: &StageEnv) -> Result<TermId> {
        let id = self.arena.terms.alloc(term);
        self.elab.elaborate(self.arena, self.types, id, env)?;
        Ok(id)
    }

    /// Rebuild `orig` with new children, under the environment captured at
    /// the original node.
    fn realloc(&mut self, orig: TermId, term: Term) -> Result<TermId> {
        let TyInfo { ty: _, env } = self.ty_info(orig)?;
        self.alloc(term, &env)
    }
}

/// One desugaring pass: an override on top of the generic structural copy.
pub trait Rewrite {
    /// Rewrite one node. The default is the structural copy; a pass overrides
    /// this for the node kinds it changes and delegates for the rest.
    fn term<E: Elaborator>(&mut self, desugarer: &mut Desugarer<E>, id: TermId) -> Result<TermId>
    where
        Self: Sized,
    {
        self.structural(desugarer, id)
    }

    /// Copy, recursing into children. A node is rebuilt (with a fresh,
    /// re-elaborated identity) only when some child changed; otherwise the
    /// original id flows through untouched.
    fn structural<E: Elaborator>(
        &mut self, desugarer: &mut Desugarer<E>, id: TermId,
    ) -> Result<TermId>
    where
        Self: Sized,
    {
        let term = desugarer.arena.term(&id);
        let res = match term {
            | Term::Var(_) | Term::Ext(_) | Term::Lit(_) | Term::Mac(_) => return Ok(id),
            | Term::Abs(term) => {
                let Abs(params, body) = term;
                let body_ = self.term(desugarer, body)?;
                if body_ == body {
                    return Ok(id);
                }
                Abs(params, body_).into()
            }
            | Term::App(term) => {
                let App(fun, args) = term;
                let fun_ = self.term(desugarer, fun)?;
                let mut changed = fun_ != fun;
                let mut args_ = Vec::with_capacity(args.len());
                for arg in args {
                    let arg_ = self.term(desugarer, arg)?;
                    changed |= arg_ != arg;
                    args_.push(arg_);
                }
                if !changed {
                    return Ok(id);
                }
                App(fun_, args_).into()
            }
            | Term::Let(term) => {
                let Let { binder, bindee, tail } = term;
                let bindee_ = self.term(desugarer, bindee)?;
                let tail_ = self.term(desugarer, tail)?;
                if bindee_ == bindee && tail_ == tail {
                    return Ok(id);
                }
                Let { binder, bindee: bindee_, tail: tail_ }.into()
            }
            | Term::Quote(term) => {
                let Quote { annot, body } = term;
                let body_ = self.term(desugarer, body)?;
                if body_ == body {
                    return Ok(id);
                }
                Quote { annot, body: body_ }.into()
            }
            | Term::Esc(term) => {
                let Escape { kind, levels, body } = term;
                let body_ = self.term(desugarer, body)?;
                if body_ == body {
                    return Ok(id);
                }
                Escape { kind, levels, body: body_ }.into()
            }
        };
        desugarer.realloc(id, res)
    }
}

/* ------------------------------ Auto-persist ------------------------------ */

/// Rewrites every variable read whose name is bound `k > 0` stages outward
/// into an explicit persist escape wrapping a fresh read. Reads at distance 0
/// and extern references pass through untouched.
pub struct AutoPersist;

impl Rewrite for AutoPersist {
    fn term<E: Elaborator>(&mut self, desugarer: &mut Desugarer<E>, id: TermId) -> Result<TermId> {
        match desugarer.arena.term(&id) {
            | Term::Var(name) => {
                let TyInfo { ty: _, env } = desugarer.ty_info(id)?;
                let Some(levels) = env.distance(&name) else {
                    Err(DesugarError::StageResolution { name, site: id })?
                };
                if levels == 0 {
                    return Ok(id);
                }
                // the read and the escape both get fresh identities; the
                // elaborator sees them as one synthesized subtree
                let read = desugarer.arena.terms.alloc(Term::Var(name.to_owned()));
                let esc = desugarer.arena.terms.alloc(
                    Escape { kind: EscapeKind::Persist, levels, body: read }.into(),
                );
                desugarer.elab.elaborate(desugarer.arena, desugarer.types, esc, &env)?;
                log::trace!(
                    "auto-persist: `{}` at {} crosses {} stage(s), now {}",
                    name,
                    id.concise(),
                    levels,
                    esc.concise()
                );
                Ok(esc)
            }
            | _ => self.structural(desugarer, id),
        }
    }
}

/* ---------------------------- Macro expansion ----------------------------- */

/// Rewrites macro invocations into zero-argument calls. An invocation whose
/// definition is bound `k > 0` stages outward becomes a splice escape around
/// the call; a same-stage invocation is just the call.
pub struct MacroExpand;

impl Rewrite for MacroExpand {
    fn term<E: Elaborator>(&mut self, desugarer: &mut Desugarer<E>, id: TermId) -> Result<TermId> {
        match desugarer.arena.term(&id) {
            | Term::Mac(name) => {
                let TyInfo { ty: _, env } = desugarer.ty_info(id)?;
                let Some(levels) = env.distance(&name) else {
                    // the surface checker rejects unbound names, so this is
                    // a pipeline bug, not a user error
                    Err(DesugarError::StageResolution { name, site: id })?
                };
                let callee = desugarer.arena.terms.alloc(Term::Var(name.to_owned()));
                let call = desugarer.arena.terms.alloc(App(callee, Vec::new()).into());
                let res = if levels == 0 {
                    desugarer.elab.elaborate(desugarer.arena, desugarer.types, call, &env)?;
                    call
                } else {
                    let esc = desugarer.arena.terms.alloc(
                        Escape { kind: EscapeKind::Splice, levels, body: call }.into(),
                    );
                    desugarer.elab.elaborate(desugarer.arena, desugarer.types, esc, &env)?;
                    esc
                };
                log::trace!(
                    "macro `{}` at {} expanded across {} stage(s) into {}",
                    name,
                    id.concise(),
                    levels,
                    res.concise()
                );
                Ok(res)
            }
            | _ => self.structural(desugarer, id),
        }
    }
}
