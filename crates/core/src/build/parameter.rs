//! Operation input → parameter.

use crate::descriptor::TypeDescriptor;
use crate::document::Parameter;
use crate::error::GenerateError;

use super::{BuildContext, Built, admit};

/// Document one input type of `operation`.
pub fn build_parameter(
    ctx: &mut BuildContext<'_>,
    operation: &str,
    ty: &TypeDescriptor,
) -> Result<Built<Parameter>, GenerateError> {
    Ok(admit(ctx, operation, ty)?
        .map(|admitted| Parameter::from_schema(admitted.name, &admitted.schema)))
}
