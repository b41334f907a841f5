//! End-to-end assembly: captures, grouping, main, and the shared tables.

use pretty_assertions::assert_eq;
use strata_surface::{syntax::*, ty::*};
use strata_tests::Build;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A top-level helper function next to a shader that defines its own helper:
/// `let f = fn x -> x in quote { let h = fn y -> y in h(1) }`.
fn shader_with_helper() -> (Build, TermId, DefId, DefId) {
    let mut b = Build::new();
    let f = b.def("f", Type::func(vec![Type::Int], Type::Int));
    let x = b.def("x", Type::Int);
    let rx = b.var("x");
    let lam_f = b.abs(vec![x], rx);
    let h = b.def("h", Type::func(vec![Type::Int], Type::Int));
    let y = b.def("y", Type::Int);
    let ry = b.var("y");
    let lam_h = b.abs(vec![y], ry);
    let rh = b.var("h");
    let one = b.lit(1_i64);
    let call = b.app(rh, vec![one]);
    let tail = b.let_(h, lam_h, call);
    let q = b.quote(StageAnnot::Shader, tail);
    let top = b.let_(f, lam_f, q);
    (b, top, x, y)
}

#[test]
fn a_quotation_reading_an_outer_binding_gets_one_persist() {
    init();
    let mut b = Build::new();
    let x = b.def("x", Type::arr(Type::Float));
    let buf = b.ext("buf");
    let read = b.var("x");
    let q = b.quote(StageAnnot::Shader, read);
    let top = b.let_(x, buf, q);
    b.elaborate(top);
    let top = b.desugar(top);
    let ir = b.assemble(top);
    assert_eq!(ir.stages.len(), 1);
    let (_, stage) = ir.stages.first().unwrap();
    let [entry] = stage.persists.as_slice() else { panic!("expected one persist") };
    assert_eq!(entry.levels, 1);
    assert!(stage.splices.is_empty());
    assert_eq!(ir.def_use.get(&entry.body), Some(&x));
    assert_eq!(ir.types.get(&entry.site).unwrap().ty, Type::Float);
}

#[test]
fn captures_follow_first_occurrence_order() {
    init();
    let mut b = Build::new();
    let a = b.def("a", Type::Float);
    let c = b.def("b", Type::Float);
    let rb = b.var("b");
    let ra = b.var("a");
    let pair = b.ext("pair");
    let call = b.app(pair, vec![rb, ra]);
    let inner = b.abs(vec![], call);
    let top = b.abs(vec![a, c], inner);
    let ir = b.pipeline(top);
    let proc =
        ir.procs.values().find(|p| p.params.is_empty() && !p.captures.is_empty()).unwrap();
    // `b` is read before `a`; the marshalling order says so too
    assert_eq!(proc.captures, vec![c, a]);
    for def in proc.captures.iter() {
        assert!(!ir.users.forth(def).is_empty());
    }
    let outer = ir.procs.values().find(|p| p.params == vec![a, c]).unwrap();
    assert!(outer.captures.is_empty());
}

#[test]
fn grouping_partitions_the_procedures_by_enclosing_stage() {
    init();
    let (b, top, x, y) = shader_with_helper();
    let ir = b.pipeline(top);
    assert_eq!(ir.procs.len(), 3);
    assert_eq!(ir.stages.len(), 1);
    assert_eq!(ir.top_level.len(), 2);
    assert!(ir.top_level.contains(&ir.main));
    let (&stage_id, _) = ir.stages.first().unwrap();
    let (&f_scope, _) = ir.procs.iter().find(|(_, p)| p.params == vec![x]).unwrap();
    let (&h_scope, _) = ir.procs.iter().find(|(_, p)| p.params == vec![y]).unwrap();
    assert!(ir.top_level.contains(&f_scope));
    assert_eq!(ir.members(stage_id), &[h_scope]);
    // the partition covers every procedure exactly once
    let mut covered = ir.top_level.to_owned();
    for (id, _) in ir.stages.iter() {
        covered.extend_from_slice(ir.members(*id));
    }
    covered.sort_by_key(|id| id.index());
    let mut all: Vec<_> = ir.procs.keys().copied().collect();
    all.sort_by_key(|id| id.index());
    assert_eq!(covered, all);
}

#[test]
fn main_is_the_unique_unparameterized_top_level_procedure() {
    init();
    let (b, top, _, _) = shader_with_helper();
    let ir = b.pipeline(top);
    let mains: Vec<_> = ir
        .procs
        .iter()
        .filter(|(_, p)| {
            p.params.is_empty() && p.captures.is_empty() && p.quote_parent.is_none()
        })
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(mains, vec![ir.main]);
}

#[test]
fn extern_references_and_intrinsics_share_one_table() {
    init();
    let mut b = Build::new();
    let tex = b
        .arena
        .terms
        .alloc(Term::Ext(ExternRef { name: "texture".into(), rename: Some("tex2d".into()) }));
    let load = b.ext("load");
    let call = b.app(load, vec![tex]);
    b.elaborate(call);
    let top = b.desugar(call);
    let ir = b.assemble(top);
    // the rename wins at the reference site
    assert_eq!(ir.exts.get(&tex), Some(&"tex2d".into()));
    assert_eq!(ir.exts.get(&load), Some(&"load".into()));
    let add = ir.prims.get(&"add".into()).copied().unwrap();
    assert_eq!(ir.exts.get(&add), Some(&"add".into()));
    assert_eq!(
        ir.types.get(&add).unwrap().ty,
        Type::func(vec![Type::Float, Type::Float], Type::Float)
    );
}
