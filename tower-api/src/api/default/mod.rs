//! Endpoints without a more specific tag
//!
//! Each submodule exposes a typed `call` and a `module()` registration
//! describing its dynamic entry point and declared parameters.

pub mod create_app;
pub mod create_environment;
pub mod create_secret;
pub mod delete_app;
pub mod delete_secret;
pub mod describe_app;
pub mod describe_run;
pub mod describe_secrets_key;
pub mod list_apps;
pub mod list_environments;
pub mod list_runs;
pub mod list_secrets;
pub mod run_app;
pub mod stream_run_logs;

use crate::types::{Module, Namespace};

/// Import path of this namespace
pub const PATH: &str = "tower_api.api.default";

/// Every module in this namespace, in registration order
pub fn namespace() -> Namespace {
    let modules: Vec<Module> = vec![
        list_apps::module(),
        describe_app::module(),
        create_app::module(),
        delete_app::module(),
        list_secrets::module(),
        create_secret::module(),
        delete_secret::module(),
        describe_secrets_key::module(),
        run_app::module(),
        list_runs::module(),
        describe_run::module(),
        stream_run_logs::module(),
        list_environments::module(),
        create_environment::module(),
    ];
    Namespace {
        path: PATH,
        modules,
    }
}
