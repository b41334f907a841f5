//! An ugly printer over the assembled representation.

use crate::{assemble::StagedIr, syntax::*};

pub struct Formatter<'ir> {
    ir: &'ir StagedIr,
}

impl<'ir> Formatter<'ir> {
    pub fn new(ir: &'ir StagedIr) -> Self {
        Formatter { ir }
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for DefId {
    fn ugly(&self, f: &'a Formatter<'a>) -> String {
        format!("{}{}", f.ir.arena.defs[self], self.concise())
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for EscapeSite {
    fn ugly(&self, _f: &'a Formatter<'a>) -> String {
        let EscapeSite { site, body, levels } = self;
        format!("{} ^{} (body {})", site.concise(), levels, body.concise())
    }
}

impl<'a> Ugly<'a, Formatter<'a>> for ScopeId {
    fn ugly(&self, f: &'a Formatter<'a>) -> String {
        if let Some(proc) = f.ir.procs.get(self) {
            let params =
                proc.params.iter().map(|def| def.ugly(f)).collect::<Vec<_>>().join(", ");
            let captures =
                proc.captures.iter().map(|def| def.ugly(f)).collect::<Vec<_>>().join(", ");
            let main = if *self == f.ir.main { " main" } else { "" };
            format!("proc{} {} ({}) [{}]", main, self.concise(), params, captures)
        } else if let Some(stage) = f.ir.stages.get(self) {
            format!(
                "stage {} [{}] persists: {}; splices: {}",
                self.concise(),
                stage.annot,
                stage.persists.iter().map(|e| e.ugly(f)).collect::<Vec<_>>().join(", "),
                stage.splices.iter().map(|e| e.ugly(f)).collect::<Vec<_>>().join(", "),
            )
        } else {
            format!("scope {} (unlifted)", self.concise())
        }
    }
}
