//! An ugly printer for elaborated trees, for logs and test failures.

use crate::syntax::*;

pub struct Formatter<'arena> {
    arena: &'arena SurfaceArena,
}

impl<'arena> Formatter<'arena> {
    pub fn new(arena: &'arena SurfaceArena) -> Self {
        Formatter { arena }
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for DefId {
    fn ugly(&self, f: &'a Formatter<'a>) -> String {
        let name = &f.arena.defs[self];
        format!("{}{}", name, self.concise())
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for TermId {
    fn ugly(&self, f: &'a Formatter<'a>) -> String {
        let term = &f.arena.terms[self];
        match term {
            | Term::Var(name) => format!("{}", name),
            | Term::Ext(ext) => format!("extern {}", ext.extern_name()),
            | Term::Lit(lit) => format!("{}", lit),
            | Term::Abs(term) => {
                let Abs(params, body) = term;
                let params =
                    params.iter().map(|def| def.ugly(f)).collect::<Vec<_>>().join(", ");
                format!("fn ({}) -> {}", params, body.ugly(f))
            }
            | Term::App(term) => {
                let App(fun, args) = term;
                let args = args.iter().map(|arg| arg.ugly(f)).collect::<Vec<_>>().join(", ");
                format!("{}({})", fun.ugly(f), args)
            }
            | Term::Let(term) => {
                let Let { binder, bindee, tail } = term;
                format!("let {} = {} in {}", binder.ugly(f), bindee.ugly(f), tail.ugly(f))
            }
            | Term::Quote(term) => {
                let Quote { annot, body } = term;
                format!("quote[{}] {{ {} }}", annot, body.ugly(f))
            }
            | Term::Esc(term) => {
                let Escape { kind, levels, body } = term;
                let sigil = match kind {
                    | EscapeKind::Persist => "%",
                    | EscapeKind::Splice => "$",
                };
                format!("{}({})", sigil.repeat(*levels), body.ugly(f))
            }
            | Term::Mac(name) => format!("{}!", name),
        }
    }
}
