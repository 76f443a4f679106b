//! Package-visible accessors for private provider members

use crate::generation::shape::{MethodShape, Operation};
use crate::model::{InjectionPoint, ProvisionPoint};
use scabbard_core::types::ClassName;

pub struct BridgeGenerator;

impl BridgeGenerator {
    /// Bridge method to add to the provision point's container, if it needs one
    pub fn generate(point: &ProvisionPoint) -> Option<(ClassName, MethodShape)> {
        let bridge = point.bridge()?;
        let container = point.container().clone();
        let mut method = MethodShape::new(
            bridge.name.clone(),
            bridge.parameter_types(),
            bridge.return_type.clone(),
        )
        .with_modifiers(Vec::new());
        method.push(Operation::LoadThis);

        match point {
            ProvisionPoint::Method {
                injection_point, ..
            } => {
                let InjectionPoint::Method {
                    method: original, ..
                } = injection_point
                else {
                    return None;
                };
                for index in 0..original.parameters.len() {
                    method.push(Operation::LoadArgument { index: index + 1 });
                }
                method.push(Operation::InvokeVirtual {
                    owner: container.clone(),
                    name: original.name.clone(),
                    parameters: original.parameter_types(),
                    return_type: original.return_type.clone(),
                });
            }
            ProvisionPoint::Field { field, .. } => {
                method.push(Operation::GetField {
                    owner: container.clone(),
                    name: field.name.clone(),
                    field_type: field.field_type.clone(),
                });
            }
            ProvisionPoint::Constructor { .. } => return None,
        }

        if bridge.return_type.is_void() {
            method.push(Operation::Return);
        } else {
            method.push(Operation::ReturnValue);
        }
        Some((container, method))
    }
}
