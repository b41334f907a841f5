//! Def-use resolution: one walk mapping every variable read to its binding
//! site, innermost binding first. Extern references carry no lexical binding
//! and are skipped; the extern collector owns them.

use crate::{err::*, syntax::*};
use strata_utils::arena::ArenaForth;

type Frame = im::HashMap<VarName, DefId>;

pub struct DefUseResolver<'a> {
    pub arena: &'a SurfaceArena,
    /// one frame per enclosing scope, innermost last
    frames: Vec<Frame>,
    def_use: ArenaAssoc<TermId, DefId>,
    users: ArenaForth<DefId, TermId>,
}

/// The resolved maps: read to binder, and binder back to all its reads.
pub struct DefUseOut {
    pub def_use: ArenaAssoc<TermId, DefId>,
    pub users: ArenaForth<DefId, TermId>,
}

impl<'a> DefUseResolver<'a> {
    pub fn new(arena: &'a SurfaceArena) -> Self {
        Self {
            arena,
            frames: vec![Frame::default()],
            def_use: ArenaAssoc::new(),
            users: ArenaForth::new(),
        }
    }

    pub fn run(mut self, top: TermId) -> Result<DefUseOut> {
        let () = self.term(top)?;
        let Self { arena: _, frames: _, def_use, users } = self;
        log::debug!("def-use resolved {} read(s)", def_use.len());
        Ok(DefUseOut { def_use, users })
    }

    fn bind(&mut self, def: DefId) {
        let name = self.arena.def(&def);
        self.frames.last_mut().unwrap().insert(name, def);
    }

    fn resolve(&self, name: &VarName) -> Option<DefId> {
        self.frames.iter().rev().find_map(|frame| frame.get(name).copied())
    }

    fn term(&mut self, id: TermId) -> Result<()> {
        match self.arena.term(&id) {
            | Term::Var(name) => {
                let Some(def) = self.resolve(&name) else {
                    Err(StagedError::UnresolvedVar { name, site: id })?
                };
                self.def_use.insert(id, def);
                self.users.insert(def, id);
                Ok(())
            }
            | Term::Ext(_) | Term::Lit(_) => Ok(()),
            | Term::Mac(_) => Err(StagedError::UnsupportedConstruct {
                site: id,
                construct: "macro invocation survived desugaring",
            }),
            | Term::Abs(term) => {
                let Abs(params, body) = term;
                self.frames.push(Frame::default());
                for param in params {
                    self.bind(param);
                }
                let () = self.term(body)?;
                self.frames.pop();
                Ok(())
            }
            | Term::App(term) => {
                let App(fun, args) = term;
                let () = self.term(fun)?;
                for arg in args {
                    let () = self.term(arg)?;
                }
                Ok(())
            }
            | Term::Let(term) => {
                let Let { binder, bindee, tail } = term;
                let () = self.term(bindee)?;
                // the binder scopes over the tail only
                let saved = self.frames.last().unwrap().clone();
                self.bind(binder);
                let res = self.term(tail);
                *self.frames.last_mut().unwrap() = saved;
                res
            }
            | Term::Quote(term) => {
                let Quote { annot: _, body } = term;
                self.frames.push(Frame::default());
                let () = self.term(body)?;
                self.frames.pop();
                Ok(())
            }
            | Term::Esc(term) => {
                let Escape { kind: _, levels: _, body } = term;
                self.term(body)
            }
        }
    }
}
