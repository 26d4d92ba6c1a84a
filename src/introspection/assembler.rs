//! Build [`EndpointInfo`] records from a route table.

use super::registry::FunctionRegistry;
use super::routes::RouteTable;
use super::signature::{
    get_definitions_from_params, get_definitions_from_return_type, get_parameters_info,
    get_return_type_info,
};
use super::types::EndpointInfo;

/// Describe every documented route, in route-table order.
///
/// Routes without a handler descriptor, or whose handler is not in `registry`, are skipped.
/// Output definitions override input definitions that share a name.
pub fn extract_endpoint_info(registry: &FunctionRegistry, routes: &RouteTable) -> Vec<EndpointInfo> {
    let mut endpoints = Vec::new();
    for route in routes.iter() {
        let Some(handler) = route.handler.as_deref() else {
            tracing::trace!(
                method = %route.method,
                path = %route.path,
                "Route has no handler descriptor; skipping"
            );
            continue;
        };
        if !registry.contains(&handler.name) {
            tracing::trace!(
                method = %route.method,
                path = %route.path,
                name = %handler.name,
                "Handler not registered; skipping"
            );
            continue;
        }

        let inputs = get_parameters_info(&handler.parameters);
        let outputs = handler
            .returns
            .as_ref()
            .map(get_return_type_info)
            .unwrap_or_default();

        let mut definitions = get_definitions_from_params(&handler.parameters);
        if let Some(returns) = handler.returns.as_ref() {
            definitions.extend(get_definitions_from_return_type(returns));
        }

        endpoints.push(EndpointInfo {
            name: handler.name.clone(),
            path: route.path.clone(),
            category: handler.category.clone(),
            display_name: handler.display_name.clone(),
            description: handler.description.clone(),
            inputs,
            outputs,
            definitions,
        });
    }
    endpoints
}
