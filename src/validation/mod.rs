// src/validation/mod.rs

pub mod plan;

pub use plan::{
    DENYLIST, DenylistRule, PathSeparatorRule, Rejection, SafetyRule, SafetyValidator,
    ValidationVerdict, Violation,
};
