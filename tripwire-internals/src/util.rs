//! Internal utility types.

/// Marker type used when type-erasing payloads.
///
/// This zero-sized type serves as a placeholder in generic type parameters
/// when the actual concrete type has been erased. For example,
/// `PayloadData<Erased>` represents a payload whose concrete type is unknown
/// at the current scope.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
