//! Scope discovery: one top-down walk that produces the scope tree.
//!
//! A scope opens on entering a function body or a quotation body. The walk
//! resolves names lexically as it goes, so that each scope ends up with its
//! directly-bound set and its free set (ordered by first occurrence in
//! pre-order, nested scopes folded in at their position). Escapes attach to
//! the nearest enclosing quotation; function scopes never own escapes.

use crate::{err::*, syntax::*};

type Local = im::HashMap<VarName, DefId>;

pub struct ScopeBuilder<'a> {
    pub arena: &'a SurfaceArena,
    scopes: ArenaSparse<ScopeId, Scope>,
    /// lexical scope stack, innermost last
    stack: Vec<ScopeId>,
    /// quotation scopes only, innermost last
    quotes: Vec<ScopeId>,
}

impl<'a> ScopeBuilder<'a> {
    pub fn new(arena: &'a SurfaceArena, alloc: &mut GlobalAlloc) -> Self {
        Self { arena, scopes: ArenaSparse::new(alloc.alloc()), stack: Vec::new(), quotes: Vec::new() }
    }

    pub fn run(mut self, top: TermId) -> Result<ScopeTree> {
        let root = self.open(ScopeKind::Fn, None, top);
        self.term(top, Local::default())?;
        self.close(root);
        log::debug!("scope discovery found {} scope(s)", self.scopes.len());
        Ok(ScopeTree { scopes: self.scopes, root })
    }

    fn open(&mut self, kind: ScopeKind, site: Option<TermId>, body: TermId) -> ScopeId {
        let parent = self.stack.last().copied();
        let quote_parent = self.quotes.last().copied();
        let id = self.scopes.alloc(Scope {
            kind,
            site,
            body,
            bound: Default::default(),
            free: Default::default(),
            persists: Vec::new(),
            splices: Vec::new(),
            parent,
            children: Vec::new(),
            quote_parent,
            quote_children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.scopes[&parent].children.push(id);
        }
        if let ScopeKind::Quote = kind {
            if let Some(quote_parent) = quote_parent {
                self.scopes[&quote_parent].quote_children.push(id);
            }
            self.quotes.push(id);
        }
        self.stack.push(id);
        id
    }

    fn close(&mut self, id: ScopeId) {
        let popped = self.stack.pop();
        debug_assert_eq!(popped, Some(id));
        if let ScopeKind::Quote = self.scopes[&id].kind {
            self.quotes.pop();
        }
    }

    fn current(&self) -> ScopeId {
        *self.stack.last().unwrap()
    }

    fn bind(&mut self, local: &Local, def: DefId) -> Local {
        let scope = self.current();
        self.scopes[&scope].bound.insert(def);
        let name = self.arena.def(&def);
        local.update(name, def)
    }

    /// Attribute a read: every scope between the read and the binder sees the
    /// definition as free.
    fn note_read(&mut self, def: DefId) {
        let stack: Vec<_> = self.stack.iter().rev().copied().collect();
        for scope in stack {
            if self.scopes[&scope].bound.contains(&def) {
                return;
            }
            self.scopes[&scope].free.insert(def);
        }
        debug_assert!(false, "read resolved outside every open scope");
    }

    fn term(&mut self, id: TermId, local: Local) -> Result<()> {
        match self.arena.term(&id) {
            | Term::Var(name) => {
                let Some(def) = local.get(&name) else {
                    Err(StagedError::UnresolvedVar { name, site: id })?
                };
                self.note_read(*def);
                Ok(())
            }
            | Term::Ext(_) | Term::Lit(_) => Ok(()),
            | Term::Mac(_) => Err(StagedError::UnsupportedConstruct {
                site: id,
                construct: "macro invocation survived desugaring",
            }),
            | Term::Abs(term) => {
                let Abs(params, body) = term;
                let scope = self.open(ScopeKind::Fn, Some(id), body);
                let mut local = local;
                for param in params {
                    local = self.bind(&local, param);
                }
                let () = self.term(body, local)?;
                self.close(scope);
                Ok(())
            }
            | Term::App(term) => {
                let App(fun, args) = term;
                let () = self.term(fun, local.clone())?;
                for arg in args {
                    let () = self.term(arg, local.clone())?;
                }
                Ok(())
            }
            | Term::Let(term) => {
                let Let { binder, bindee, tail } = term;
                let () = self.term(bindee, local.clone())?;
                let local = self.bind(&local, binder);
                self.term(tail, local)
            }
            | Term::Quote(term) => {
                let Quote { annot: _, body } = term;
                let scope = self.open(ScopeKind::Quote, Some(id), body);
                let () = self.term(body, local)?;
                self.close(scope);
                Ok(())
            }
            | Term::Esc(term) => {
                let Escape { kind, levels, body } = term;
                let Some(quote) = self.quotes.last().copied() else {
                    Err(StagedError::EscapeOutsideQuote { site: id })?
                };
                let site = EscapeSite { site: id, body, levels };
                match kind {
                    | EscapeKind::Persist => self.scopes[&quote].persists.push(site),
                    | EscapeKind::Splice => self.scopes[&quote].splices.push(site),
                }
                self.term(body, local)
            }
        }
    }
}
