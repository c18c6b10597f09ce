//! Describe response
//!
//! The raw namespace holds one remote var per catalog operation followed by
//! the extra operations. The wrapper namespace re-exposes each of them as
//! host code: catalog operations take keyword options and forward them as a
//! single map; extra operations are aliased as they are.

use tower_pod_protocol::{
    messages::op, DescribeResponse, NamespaceDescriptor, VarDescriptor, PAYLOAD_FORMAT,
};

use crate::catalog::Catalog;
use crate::config::NamespaceConfig;
use crate::extras::Extras;

pub fn describe(catalog: &Catalog, extras: &Extras, names: &NamespaceConfig) -> DescribeResponse {
    let raw = &names.raw_namespace;

    let raw_vars = catalog
        .names()
        .map(VarDescriptor::remote)
        .chain(extras.names().map(VarDescriptor::remote))
        .collect();

    let wrapper_vars = catalog
        .names()
        .map(|name| {
            VarDescriptor::with_code(
                name,
                format!("(defn {name} [& {{:as opts}}] ({raw}/{name} opts))"),
            )
        })
        .chain(
            extras
                .names()
                .map(|name| VarDescriptor::with_code(name, format!("(def {name} {raw}/{name})"))),
        )
        .collect();

    DescribeResponse {
        format: PAYLOAD_FORMAT.to_string(),
        namespaces: vec![
            NamespaceDescriptor {
                name: raw.clone(),
                vars: raw_vars,
            },
            NamespaceDescriptor {
                name: names.namespace.clone(),
                vars: wrapper_vars,
            },
        ],
        ops: vec![op::SHUTDOWN.to_string()],
    }
}
