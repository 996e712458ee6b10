//! Overload sets and score-based resolution.
//!
//! Every candidate is scored against the argument types: an exact match on
//! a parameter earns [`EXACT_MATCH`], an assignable one [`ASSIGNABLE_MATCH`],
//! anything else rejects the candidate. The highest total wins and ties go
//! to the candidate declared first.

use rowan::TextRange;

use crate::classes::ClassTable;
use crate::ty::Ty;

pub const EXACT_MATCH: u32 = 10;
pub const ASSIGNABLE_MATCH: u32 = 5;

/// One declared signature.
#[derive(Clone, Debug, PartialEq)]
pub struct Overload {
    pub params: Vec<Ty>,
    pub ret: Ty,
    pub span: Option<TextRange>,
}

impl Overload {
    pub fn new(params: Vec<Ty>, ret: Ty) -> Self {
        Overload {
            params,
            ret,
            span: None,
        }
    }

    /// The candidate as a function type.
    pub fn fn_ty(&self) -> Ty {
        Ty::fun(self.params.clone(), self.ret.clone())
    }
}

/// All signatures declared under one name, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct OverloadSet {
    pub name: String,
    pub candidates: Vec<Overload>,
}

impl OverloadSet {
    pub fn new(name: impl Into<String>) -> Self {
        OverloadSet {
            name: name.into(),
            candidates: Vec::new(),
        }
    }

    /// Append a candidate. Identical signatures are kept; the earlier one
    /// always wins resolution.
    pub fn add(&mut self, overload: Overload) {
        self.candidates.push(overload);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Score one parameter list against argument types. `None` rejects it.
pub fn score(params: &[Ty], args: &[Ty], classes: &ClassTable) -> Option<u32> {
    if params.len() != args.len() {
        return None;
    }
    params.iter().zip(args).try_fold(0, |total, (param, arg)| {
        if param == arg {
            Some(total + EXACT_MATCH)
        } else if classes.is_assignable(arg, param) {
            Some(total + ASSIGNABLE_MATCH)
        } else {
            None
        }
    })
}

/// All viable candidates with their scores, best first.
///
/// The sort is stable, so equally scored candidates keep declaration order.
pub fn rank<'s>(set: &'s OverloadSet, args: &[Ty], classes: &ClassTable) -> Vec<(&'s Overload, u32)> {
    let mut viable: Vec<_> = set
        .candidates
        .iter()
        .filter_map(|c| score(&c.params, args, classes).map(|s| (c, s)))
        .collect();
    viable.sort_by(|a, b| b.1.cmp(&a.1));
    viable
}

/// The best candidate for the given argument types, if any is viable.
pub fn resolve<'s>(set: &'s OverloadSet, args: &[Ty], classes: &ClassTable) -> Option<&'s Overload> {
    rank(set, args, classes).first().map(|(c, _)| *c)
}

/// The first candidate, in declaration order, with the given parameter count.
pub fn first_arity_match(set: &OverloadSet, argc: usize) -> Option<&Overload> {
    set.candidates.iter().find(|c| c.params.len() == argc)
}
