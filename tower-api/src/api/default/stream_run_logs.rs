//! Server-sent log stream for a run
//!
//! There is no request/response entry point here; the module only exposes
//! its parameter list, so dynamic callers skip it.

use crate::types::{Module, Param, TypeHint};

pub fn module() -> Module {
    Module {
        name: "stream_run_logs",
        sync: None,
        params: vec![
            Param::client(),
            Param::new("name", TypeHint::Str),
            Param::new("seq", TypeHint::Int),
        ],
    }
}
