//! Extern collection: one walk mapping every external-reference identity to
//! its external name. A rename given at the reference site wins over the
//! declared name.

use crate::{err::*, syntax::*};

pub struct ExternCollector<'a> {
    pub arena: &'a SurfaceArena,
    exts: ArenaAssoc<TermId, ExternName>,
}

impl<'a> ExternCollector<'a> {
    /// `seed` carries the intrinsics registered before user code.
    pub fn new(arena: &'a SurfaceArena, seed: ArenaAssoc<TermId, ExternName>) -> Self {
        Self { arena, exts: seed }
    }

    pub fn run(mut self, top: TermId) -> Result<ArenaAssoc<TermId, ExternName>> {
        let () = self.term(top)?;
        log::debug!("extern table holds {} entries", self.exts.len());
        Ok(self.exts)
    }

    fn term(&mut self, id: TermId) -> Result<()> {
        match self.arena.term(&id) {
            | Term::Ext(ext) => {
                self.exts.insert(id, ext.extern_name());
                Ok(())
            }
            | Term::Var(_) | Term::Lit(_) | Term::Mac(_) => Ok(()),
            | Term::Abs(term) => {
                let Abs(_, body) = term;
                self.term(body)
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
                let Let { binder: _, bindee, tail } = term;
                let () = self.term(bindee)?;
                self.term(tail)
            }
            | Term::Quote(term) => {
                let Quote { annot: _, body } = term;
                self.term(body)
            }
            | Term::Esc(term) => {
                let Escape { kind: _, levels: _, body } = term;
                self.term(body)
            }
        }
    }
}
