//! This module encapsulates the fields of the [`PayloadData`]. Since this is
//! the only place they are visible, this means that the type of the
//! [`PayloadVtable`] is guaranteed to always be in sync with the type of the
//! actual payload. This follows from the fact that they are in sync when
//! created and that the API offers no way to change the [`PayloadVtable`] or
//! payload type after creation.

use crate::{
    handlers::PayloadHandler,
    payload::{raw::RawPayloadRef, vtable::PayloadVtable},
};

/// Type-erased payload data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete
/// payload type `P` is unknown.
#[repr(C)]
pub(super) struct PayloadData<P: 'static> {
    /// The vtable of this payload
    vtable: &'static PayloadVtable,
    /// The actual payload value
    payload: P,
}

impl<P: Send + 'static> PayloadData<P> {
    /// Creates a new [`PayloadData`] with the specified handler and payload.
    ///
    /// This method creates the vtable for type-erased dispatch and pairs it
    /// with the payload value.
    #[inline]
    pub(super) fn new<H: PayloadHandler<P>>(payload: P) -> Self {
        Self {
            vtable: PayloadVtable::new::<P, H>(),
            payload,
        }
    }
}

impl<'a> RawPayloadRef<'a> {
    /// Returns a reference to the [`PayloadVtable`] of the [`PayloadData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static PayloadVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual inner payload type, but we do know
        // that it points to an instance of `PayloadData<P>` for some specific
        // `P`. Since `PayloadData<P>` is `#[repr(C)]`, that means that it's
        // safe to create pointers to the fields before the actual payload.
        //
        // We need to take care to avoid creating an actual reference to the
        // `PayloadData` itself though, as that would still be undefined
        // behavior since we don't have the right type.
        let vtable_ptr: *const &'static PayloadVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Dereferencing the pointer and getting out the `&'static
        // PayloadVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the inner payload of the [`PayloadData`] instance as a
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `P` matches the actual payload
    /// type stored in the [`PayloadData`].
    #[inline]
    pub unsafe fn payload_downcast_unchecked<P: 'static>(self) -> &'a P {
        // SAFETY: The inner function requires that `P` matches the type
        // stored, but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<P>() };
        &this.payload
    }
}
