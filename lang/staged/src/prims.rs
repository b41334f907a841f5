//! Intrinsic built-ins.
//!
//! Registered into the extern table and the type table before any user code
//! is analyzed, from reserved identities drawn out of the same term arena.
//! User externs and built-ins share one numbering space, so backends treat
//! both uniformly.

use crate::{err::*, syntax::*};

fn builtin_set() -> Vec<(&'static str, Type)> {
    use Type::*;
    vec![
        ("add", Type::func(vec![Float, Float], Float)),
        ("sub", Type::func(vec![Float, Float], Float)),
        ("mul", Type::func(vec![Float, Float], Float)),
        ("div", Type::func(vec![Float, Float], Float)),
        ("sin", Type::func(vec![Float], Float)),
        ("cos", Type::func(vec![Float], Float)),
        ("sqrt", Type::func(vec![Float], Float)),
        ("dot", Type::func(vec![Type::arr(Float), Type::arr(Float)], Float)),
        ("mix", Type::func(vec![Float, Float, Float], Float)),
        ("clamp", Type::func(vec![Float, Float, Float], Float)),
        ("int_to_float", Type::func(vec![Int], Float)),
        ("float_to_int", Type::func(vec![Float], Int)),
    ]
}

/// What intrinsic registration leaves behind: the seeded extern table and an
/// index from builtin name to its reserved identity.
pub struct PrimOut {
    pub exts: ArenaAssoc<TermId, ExternName>,
    pub prims: ArenaAssoc<ExternName, TermId>,
}

pub fn register(arena: &mut SurfaceArena, types: &mut TypeTable) -> Result<PrimOut> {
    let mut exts = ArenaAssoc::new();
    let mut prims = ArenaAssoc::new();
    for (name, ty) in builtin_set() {
        let ext = ExternRef { name: name.into(), rename: None };
        let ext_name = ext.extern_name();
        let id = arena.terms.alloc(Term::Ext(ext));
        types.append(id, TyInfo { ty, env: StageEnv::new() })?;
        exts.insert(id, ext_name.to_owned());
        prims.insert(ext_name, id);
    }
    log::debug!("registered {} intrinsic(s)", prims.len());
    Ok(PrimOut { exts, prims })
}
