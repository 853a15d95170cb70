//! Per-property uniqueness of correlation values among sagas of one type.

use crate::error::SagaError;
use crate::saga::{PropertyValue, SagaData};

use super::ledger::Ledger;

/// Reads `property` off `saga`, failing if the type has no such property.
pub(crate) fn read_property<T: SagaData>(saga: &T, property: &str) -> Result<PropertyValue, SagaError> {
    saga.read_property(property)
        .ok_or_else(|| SagaError::UnknownProperty {
            saga_type: T::SAGA_TYPE,
            property: property.to_string(),
        })
}

/// Checks every property independently: `candidate` may not share a value for
/// any of `properties` with another current saga of type `T`. The candidate's
/// own id is excluded from the scan.
pub(crate) fn verify_unique<T: SagaData>(
    ledger: &Ledger,
    candidate: &T,
    properties: &[&str],
) -> Result<(), SagaError> {
    for property in properties {
        let value = read_property(candidate, property)?;

        for existing in ledger.current_of_type::<T>() {
            if existing.id() == candidate.id() {
                continue;
            }
            if read_property(existing, property)? == value {
                return Err(SagaError::CorrelationCollision {
                    saga_type: T::SAGA_TYPE,
                    property: property.to_string(),
                    value: value.render(),
                    existing: existing.id(),
                });
            }
        }
    }
    Ok(())
}
