//! Vtable for type-erased payload operations.
//!
//! This module contains the [`PayloadVtable`] which enables calling handler
//! methods on payloads when their concrete payload type `P` and handler type
//! `H` have been erased. The vtable stores function pointers that dispatch
//! to the correct typed implementations.
//!
//! This module encapsulates the fields of [`PayloadVtable`] so they cannot
//! be accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual payload
//! type and handler stored in the [`PayloadData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`PayloadVtable::new`], which pairs the function pointers
//! with specific types `P` and `H` at compile time.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    handlers::PayloadHandler,
    payload::{data::PayloadData, raw::RawPayloadRef},
    util::Erased,
};

/// Vtable for type-erased payload operations.
///
/// Contains function pointers for performing operations on payloads without
/// knowing their concrete type at compile time.
///
/// # Safety Invariant
///
/// The fields `drop`, `display`, and `debug` are guaranteed to point to the
/// functions defined below instantiated with the payload type `P` and
/// handler type `H` that were used to create this [`PayloadVtable`].
pub(crate) struct PayloadVtable {
    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`PayloadVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the payload type that was used
    /// to create this [`PayloadVtable`].
    type_name: fn() -> &'static str,
    /// Drops the [`Box<PayloadData<P>>`] instance pointed to by this
    /// pointer.
    drop: unsafe fn(NonNull<PayloadData<Erased>>),
    /// Formats the payload using the `display` method on the handler.
    display: unsafe fn(RawPayloadRef<'_>, &mut core::fmt::Formatter<'_>) -> core::fmt::Result,
    /// Formats the payload using the `debug` method on the handler.
    debug: unsafe fn(RawPayloadRef<'_>, &mut core::fmt::Formatter<'_>) -> core::fmt::Result,
}

impl PayloadVtable {
    /// Creates a new [`PayloadVtable`] for the payload type `P` and the
    /// handler type `H`.
    ///
    /// The `P: Send` bound is part of the safety story of [`RawPayload`]: it
    /// ensures no vtable can ever be produced for a non-[`Send`] payload.
    ///
    /// [`RawPayload`]: crate::payload::raw::RawPayload
    pub(super) const fn new<P: Send + 'static, H: PayloadHandler<P>>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<P>,
                type_name: core::any::type_name::<P>,
                drop: drop::<P>,
                display: display::<P, H>,
                debug: debug::<P, H>,
            }
        }
    }

    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`PayloadVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the payload type that was used
    /// to create this [`PayloadVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops the `Box<PayloadData<P>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<PayloadData<P>>`] via
    ///    [`Box::into_raw`]
    /// 2. This [`PayloadVtable`] must be a vtable for the payload type
    ///    stored in the [`PayloadData`].
    /// 3. This method drops the [`Box<PayloadData<P>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it
    ///    is able to transfer ownership of the pointer, and that it will not
    ///    use the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<PayloadData<Erased>>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<P>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Formats the payload using the [`H::display`] function used when
    /// creating this [`PayloadVtable`].
    ///
    /// [`H::display`]: PayloadHandler::display
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`PayloadVtable`] must be a vtable for the payload type
    ///    stored in the [`RawPayloadRef`].
    #[inline]
    pub(super) unsafe fn display(
        &self,
        ptr: RawPayloadRef<'_>,
        formatter: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        // SAFETY: We know that the `self.display` field points to the function
        // `display::<P, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.display)(ptr, formatter) }
    }

    /// Formats the payload using the [`H::debug`] function used when
    /// creating this [`PayloadVtable`].
    ///
    /// [`H::debug`]: PayloadHandler::debug
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`PayloadVtable`] must be a vtable for the payload type
    ///    stored in the [`RawPayloadRef`].
    #[inline]
    pub(super) unsafe fn debug(
        &self,
        ptr: RawPayloadRef<'_>,
        formatter: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        // SAFETY: We know that the `self.debug` field points to the function
        // `debug::<P, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.debug)(ptr, formatter) }
    }
}

/// Drops the [`Box<PayloadData<P>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<PayloadData<P>>`] via [`Box::into_raw`]
/// 2. The payload type `P` matches the actual payload type stored in the
///    [`PayloadData`]
/// 3. This method drops the [`Box<PayloadData<P>>`], so the caller must
///    ensure that the pointer has not previously been dropped, that it is
///    able to transfer ownership of the pointer, and that it will not use
///    the pointer after calling this method.
unsafe fn drop<P: 'static>(ptr: NonNull<PayloadData<Erased>>) {
    let ptr: NonNull<PayloadData<P>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller,
    // and it came from a call to `Box::into_raw` as also guaranteed by our
    // caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Formats a payload using its handler's display implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `P` matches the actual payload type stored in the
///    [`PayloadData`]
unsafe fn display<P: 'static, H: PayloadHandler<P>>(
    ptr: RawPayloadRef<'_>,
    formatter: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let payload: &P = unsafe { ptr.payload_downcast_unchecked::<P>() };
    H::display(payload, formatter)
}

/// Formats a payload using its handler's debug implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `P` matches the actual payload type stored in the
///    [`PayloadData`]
unsafe fn debug<P: 'static, H: PayloadHandler<P>>(
    ptr: RawPayloadRef<'_>,
    formatter: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let payload: &P = unsafe { ptr.payload_downcast_unchecked::<P>() };
    H::debug(payload, formatter)
}
