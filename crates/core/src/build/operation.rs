//! One operation descriptor → one placed operation.

use tracing::debug;

use crate::descriptor::OperationDescriptor;
use crate::document::Operation;
use crate::error::GenerateError;
use crate::placement::{MethodReg, Placement};

use super::{BuildContext, build_parameter, build_response};

/// An assembled operation together with its slot in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOperation {
    /// Where the operation goes.
    pub placement: MethodReg,
    /// The operation itself.
    pub operation: Operation,
}

/// Build parameters, then responses, then resolve placement.
///
/// Stops at the first fatal error. Schemas resolved before that point stay in
/// the context's schema table.
pub fn assemble_operation(
    ctx: &mut BuildContext<'_>,
    placement: &Placement<'_>,
    descriptor: &OperationDescriptor,
) -> Result<PlacedOperation, GenerateError> {
    let name = descriptor.name.as_str();
    let mut operation = Operation::default();

    for input in &descriptor.inputs {
        if let Some(parameter) = build_parameter(ctx, name, input)?.into_item() {
            operation.parameters.push(parameter);
        }
    }

    for output in &descriptor.outputs {
        if let Some((key, response)) = build_response(ctx, name, output)?.into_item() {
            operation.responses.insert(key, response);
        }
    }

    let placement = placement.resolve(name);
    debug!(
        operation = name,
        method = %placement.method,
        path = %placement.path,
        parameters = operation.parameters.len(),
        responses = operation.responses.len(),
        "Assembled operation."
    );

    Ok(PlacedOperation {
        placement,
        operation,
    })
}
