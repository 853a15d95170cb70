mod saga;

use proc_macro::TokenStream;

/// Derive macro for saga records.
///
/// Generates `saga_store::SagaData` and `saga_store::PropertyReader` for a
/// struct with named fields. Every field not marked `#[saga(skip)]` becomes a
/// readable property, so its type must be `Clone + Into<PropertyValue>`.
///
/// # Usage
///
/// ```ignore
/// use saga_store::{Saga, SagaId};
///
/// #[derive(Clone, Debug, Saga)]
/// #[saga(name = "order_sagas")]
/// struct OrderSaga {
///     #[saga(id)]
///     pub saga_id: SagaId,
///     pub revision: u64,
///     #[saga(rename = "OrderId")]
///     pub order_id: String,
///     #[saga(skip)]
///     pub lines: Vec<OrderLine>,
/// }
/// ```
///
/// Attributes:
/// - `#[saga(name = "...")]` on the struct: the saga type name
///   (default: snake_case struct name).
/// - `#[saga(id)]`: identity field, a `SagaId` (default: the field named `id`).
/// - `#[saga(revision)]`: revision field, a `u64` (default: the field named `revision`).
/// - `#[saga(rename = "...")]`: property name used for correlation lookups.
/// - `#[saga(skip)]`: field is not exposed as a property.
#[proc_macro_derive(Saga, attributes(saga))]
pub fn derive_saga(input: TokenStream) -> TokenStream {
    saga::derive_saga(input)
}
