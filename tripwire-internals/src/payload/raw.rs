//! Type-erased payload pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawPayload`] and
//! [`RawPayloadRef`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer
//! always comes from `Box<PayloadData<P>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawPayload::new`] (which
//! creates it from `Box::into_raw`), and cannot be modified afterward (no
//! `pub` or `pub(crate)` fields), the pointer provenance remains valid
//! throughout the value's lifetime.
//!
//! The [`RawPayload::drop`] implementation relies on this invariant to
//! safely reconstruct the `Box` and deallocate the memory.
//!
//! # Type Erasure
//!
//! The concrete type parameter `P` is erased by casting to
//! `PayloadData<Erased>`. The vtable stored within the `PayloadData`
//! provides the runtime type information needed to safely downcast and
//! format payloads.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{handlers::PayloadHandler, payload::data::PayloadData, util::Erased};

/// A pointer to a [`PayloadData`] that is guaranteed to point to an
/// initialized instance of a [`PayloadData<P>`] for some specific `P`,
/// though we do not know which actual `P` it is.
///
/// However, the pointer is allowed to transition into a non-initialized
/// state inside the [`RawPayload::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<PayloadData<P>>`] directly, because that does not
/// allow us to type-erase the `P`.
#[repr(transparent)]
pub struct RawPayload {
    /// Pointer to the inner payload data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long
    /// as this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<PayloadData<P>>`
    ///    for some `P: Send` using `Box::into_raw`.
    /// 2. The pointer will point to the same `PayloadData<P>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of
    ///    this object, except during the execution of the `Drop`
    ///    implementation.
    ptr: NonNull<PayloadData<Erased>>,
}

impl RawPayload {
    /// Creates a new [`RawPayload`] with the specified handler and payload.
    ///
    /// The returned payload container will embed the specified payload and
    /// use the specified handler for all formatting operations.
    ///
    /// The `P: Send` bound is load-bearing: it is what makes the
    /// `unsafe impl Send for RawPayload` below sound, since this is the only
    /// way to construct a [`RawPayload`].
    #[inline]
    pub fn new<P, H>(payload: P) -> Self
    where
        P: Send + 'static,
        H: PayloadHandler<P>,
    {
        let ptr = Box::new(PayloadData::new::<H>(payload));
        let ptr: *mut PayloadData<P> = Box::into_raw(ptr);
        let ptr: *mut PayloadData<Erased> = ptr.cast::<PayloadData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<PayloadData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Returns a reference to the [`PayloadData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawPayloadRef<'_> {
        RawPayloadRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

impl core::ops::Drop for RawPayload {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawPayload::new`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to
        //    match the data in the `PayloadData`.
        // 3. The pointer is initialized and has not been previously freed as
        //    guaranteed by the invariants on this type. We are correctly
        //    transferring ownership here and the pointer is not used
        //    afterwards, as we are in the drop function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

// SAFETY: `RawPayload::new` is the only constructor and it requires the
// concrete payload type to be `Send`, so the pointee is always a
// `PayloadData<P>` with `P: Send`. The vtable is a `&'static` table of plain
// function pointers. Moving the container to another thread therefore moves
// only `Send` data.
unsafe impl Send for RawPayload {}

/// A lifetime-bound pointer to a [`PayloadData`] that is guaranteed to point
/// to an initialized instance of a [`PayloadData<P>`] for some specific `P`,
/// though we do not know which actual `P` it is.
///
/// We cannot use a [`&'a PayloadData<P>`] directly, because that would
/// require us to know the actual type of the payload, which we do not.
///
/// [`&'a PayloadData<P>`]: PayloadData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawPayloadRef<'a> {
    /// Pointer to the inner payload data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long
    /// as this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<PayloadData<P>>`
    ///    for some `P: Send` using `Box::into_raw`.
    /// 2. The pointer will point to the same `PayloadData<P>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<PayloadData<Erased>>,

    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a PayloadData<Erased>`
    _marker: core::marker::PhantomData<&'a PayloadData<Erased>>,
}

impl<'a> RawPayloadRef<'a> {
    /// Casts the [`RawPayloadRef`] to a [`PayloadData<P>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `P` matches the actual payload type stored in the
    ///    [`PayloadData`].
    #[inline]
    pub(super) unsafe fn cast_inner<P: 'static>(self) -> &'a PayloadData<P> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<P>());

        let this = self.ptr.cast::<PayloadData<P>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable
        //   (guaranteed by RawPayloadRef's type invariants)
        // - The pointee is properly initialized (RawPayloadRef's doc comment
        //   guarantees it points to an initialized PayloadData<P> for some P)
        // - The type `P` matches the actual payload type (guaranteed by
        //   caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawPayloadRef<'a>'s
        //   lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a [`NonNull`] pointer to the [`PayloadData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const PayloadData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the payload.
    #[inline]
    pub fn payload_type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the payload.
    #[inline]
    pub fn payload_type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Attempts to downcast the payload to a reference of the specified
    /// type.
    ///
    /// Returns `Some(&P)` only when `P` is exactly the type the payload was
    /// created with. There is no implicit widening and no subtype matching:
    /// a payload stored as `u32` will not be returned for a requested `i32`.
    #[inline]
    pub fn payload_downcast<P: 'static>(self) -> Option<&'a P> {
        if self.payload_type_id() == TypeId::of::<P>() {
            // SAFETY: We just checked that the type IDs match
            Some(unsafe { self.payload_downcast_unchecked::<P>() })
        } else {
            None
        }
    }

    /// Formats the payload by using the [`PayloadHandler::display`] method
    /// specified by the handler used to create the [`PayloadData`].
    ///
    /// [`PayloadHandler::display`]: crate::handlers::PayloadHandler::display
    #[inline]
    pub fn payload_display(self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match
        //    the data in the `PayloadData`.
        unsafe { vtable.display(self, formatter) }
    }

    /// Formats the payload by using the [`PayloadHandler::debug`] method
    /// specified by the handler used to create the [`PayloadData`].
    ///
    /// [`PayloadHandler::debug`]: crate::handlers::PayloadHandler::debug
    #[inline]
    pub fn payload_debug(self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let vtable = self.vtable();

        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match
        //    the data in the `PayloadData`.
        unsafe { vtable.debug(self, formatter) }
    }
}
