//! Test support for the staged pipeline: a tree builder and a small
//! reference elaborator standing in for the upstream one.

use strata_staged::{assemble::*, err::StagedError};
use strata_surface::{desugar::Desugarer, elab::*, syntax::*, ty::*};

/* ---------------------------- Reference elab ------------------------------ */

/// A structural elaborator: types bottom-up, stage environment threaded
/// through quotations and escapes. It honors the seam's contract: entries
/// already in the table are left untouched, new identities all get covered.
#[derive(Default)]
pub struct RefElaborator {
    pub def_types: ArenaAssoc<DefId, Type>,
}

impl Elaborator for RefElaborator {
    fn elaborate(
        &mut self, arena: &SurfaceArena, types: &mut TypeTable, id: TermId, env: &StageEnv,
    ) -> Result<()> {
        let _ = self.infer(arena, types, id, env)?;
        Ok(())
    }
}

impl RefElaborator {
    fn def_type(&self, def: DefId, site: TermId) -> Result<Type> {
        let Some(ty) = self.def_types.get(&def) else {
            Err(ElabError::Invalid {
                site,
                message: format!("no declared type for {}", def.concise()),
            })?
        };
        Ok(ty.to_owned())
    }

    fn infer(
        &mut self, arena: &SurfaceArena, types: &mut TypeTable, id: TermId, env: &StageEnv,
    ) -> Result<Type> {
        if let Some(info) = types.get(&id) {
            // already elaborated; never touched again
            return Ok(info.ty.to_owned());
        }
        let ty = match arena.term(&id) {
            | Term::Var(name) => {
                let Some((_, def)) = env.lookup(&name) else {
                    Err(ElabError::Invalid { site: id, message: format!("unbound `{}`", name) })?
                };
                self.def_type(def, id)?
            }
            | Term::Ext(ext) => {
                let ExternName(name) = ext.extern_name();
                Type::Opaque(name)
            }
            | Term::Lit(lit) => match lit {
                | Literal::Int(_) => Type::Int,
                | Literal::Float(_) => Type::Float,
                | Literal::Bool(_) => Type::Bool,
                | Literal::Unit => Type::Unit,
            },
            | Term::Abs(term) => {
                let Abs(params, body) = term;
                let mut env = env.to_owned();
                let mut param_tys = Vec::with_capacity(params.len());
                for param in params {
                    param_tys.push(self.def_type(param, id)?);
                    env = env.bind(arena.def(&param), param);
                }
                let ret = self.infer(arena, types, body, &env)?;
                Type::func(param_tys, ret)
            }
            | Term::App(term) => {
                let App(fun, args) = term;
                let fun_ty = self.infer(arena, types, fun, env)?;
                for arg in args {
                    let _ = self.infer(arena, types, arg, env)?;
                }
                match fun_ty {
                    | Type::Fn(_, ret) => *ret,
                    | other => other,
                }
            }
            | Term::Let(term) => {
                let Let { binder, bindee, tail } = term;
                let bindee_ty = self.infer(arena, types, bindee, env)?;
                self.def_types.insert(binder, bindee_ty);
                let env = env.bind(arena.def(&binder), binder);
                self.infer(arena, types, tail, &env)?
            }
            | Term::Quote(term) => {
                let Quote { annot: _, body } = term;
                Type::code(self.infer(arena, types, body, &env.enter_stage())?)
            }
            | Term::Esc(term) => {
                let Escape { kind, levels, body } = term;
                let body_ty = self.infer(arena, types, body, &env.exit_stages(levels))?;
                match kind {
                    | EscapeKind::Persist => body_ty.elem(),
                    | EscapeKind::Splice => body_ty.splice(),
                }
            }
            | Term::Mac(name) => {
                let Some((_, def)) = env.lookup(&name) else {
                    Err(ElabError::Invalid {
                        site: id,
                        message: format!("unbound macro `{}`", name),
                    })?
                };
                match self.def_type(def, id)? {
                    | Type::Fn(_, ret) => ret.splice(),
                    | other => other,
                }
            }
        };
        types.append(id, TyInfo { ty: ty.to_owned(), env: env.to_owned() })?;
        Ok(ty)
    }
}

/* -------------------------------- Builder --------------------------------- */

/// Builds elaborated trees by hand and drives the pipeline over them.
pub struct Build {
    pub alloc: GlobalAlloc,
    pub arena: SurfaceArena,
    pub types: TypeTable,
    pub elab: RefElaborator,
}

impl Build {
    pub fn new() -> Self {
        let mut alloc = GlobalAlloc::new();
        let arena = SurfaceArena::new(&mut alloc);
        Build { alloc, arena, types: TypeTable::new(), elab: RefElaborator::default() }
    }

    pub fn def(&mut self, name: &str, ty: Type) -> DefId {
        let def = self.arena.defs.alloc(name.into());
        self.elab.def_types.insert(def, ty);
        def
    }
    pub fn var(&mut self, name: &str) -> TermId {
        self.arena.terms.alloc(Term::Var(name.into()))
    }
    pub fn ext(&mut self, name: &str) -> TermId {
        self.arena.terms.alloc(Term::Ext(ExternRef { name: name.into(), rename: None }))
    }
    pub fn lit(&mut self, lit: impl Into<Literal>) -> TermId {
        self.arena.terms.alloc(Term::Lit(lit.into()))
    }
    pub fn unit(&mut self) -> TermId {
        self.arena.terms.alloc(Term::Lit(Literal::Unit))
    }
    pub fn abs(&mut self, params: Vec<DefId>, body: TermId) -> TermId {
        self.arena.terms.alloc(Abs(params, body).into())
    }
    pub fn app(&mut self, fun: TermId, args: Vec<TermId>) -> TermId {
        self.arena.terms.alloc(App(fun, args).into())
    }
    pub fn let_(&mut self, binder: DefId, bindee: TermId, tail: TermId) -> TermId {
        self.arena.terms.alloc(Let { binder, bindee, tail }.into())
    }
    pub fn quote(&mut self, annot: StageAnnot, body: TermId) -> TermId {
        self.arena.terms.alloc(Quote { annot, body }.into())
    }
    pub fn esc(&mut self, kind: EscapeKind, levels: usize, body: TermId) -> TermId {
        self.arena.terms.alloc(Escape { kind, levels, body }.into())
    }
    pub fn mac(&mut self, name: &str) -> TermId {
        self.arena.terms.alloc(Term::Mac(name.into()))
    }

    /// Elaborate the whole tree from the root, as the upstream elaborator
    /// would have before handing it over.
    pub fn elaborate(&mut self, top: TermId) {
        let Build { arena, types, elab, .. } = self;
        elab.elaborate(arena, types, top, &StageEnv::new()).expect("reference elaboration");
    }

    pub fn desugar(&mut self, top: TermId) -> TermId {
        self.try_desugar(top).expect("desugaring")
    }

    pub fn try_desugar(
        &mut self, top: TermId,
    ) -> std::result::Result<TermId, strata_surface::DesugarError> {
        let Build { arena, types, elab, .. } = self;
        Desugarer::new(arena, types, elab).run(top)
    }

    pub fn assemble(self, top: TermId) -> StagedIr {
        self.try_assemble(top).expect("assembly")
    }

    pub fn try_assemble(self, top: TermId) -> std::result::Result<StagedIr, StagedError> {
        let Build { alloc, arena, types, elab: _ } = self;
        Assembler { alloc, arena, types, top }.run()
    }

    /// The full front half: elaborate, desugar, assemble.
    pub fn pipeline(mut self, top: TermId) -> StagedIr {
        self.elaborate(top);
        let top = self.desugar(top);
        self.assemble(top)
    }
}

impl Default for Build {
    fn default() -> Self {
        Self::new()
    }
}
