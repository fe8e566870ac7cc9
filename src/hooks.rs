//! Process-wide hooks adjusting how intercepted conditions interact with the
//! panic machinery.
//!
//! Conditions raised through [`throw!`](crate::throw) unwind to the nearest
//! [`invoke`](crate::invoke) boundary, where they are intercepted and turned
//! into results. The default panic hook, however, runs *before* unwinding
//! starts and has no way of knowing the condition is about to be caught, so
//! it prints its usual "thread panicked" message for every throw.
//!
//! That output is purely cosmetic; interception works either way. Programs
//! that throw as part of normal control flow can opt into a quieter hook
//! with [`silence_thrown_conditions`].

use std::{panic, sync::Once};

use crate::CapturedException;

/// Installs a panic hook that stays quiet for thrown conditions.
///
/// The installed hook delegates to the previously registered hook for every
/// panic whose payload is not a [`CapturedException`], so ordinary panics
/// keep their regular reporting. Installation happens at most once per
/// process; repeated calls are no-ops.
///
/// Call this early, before other code replaces the panic hook, if you want
/// the chain to stay intact.
///
/// # Examples
///
/// ```
/// use tripwire::prelude::*;
///
/// tripwire::hooks::silence_thrown_conditions();
///
/// // No "thread panicked" output for this interception
/// let result = invoke(|| -> i32 { throw!(10u32, "quiet throw") });
/// assert!(result.failed());
/// ```
pub fn silence_thrown_conditions() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<CapturedException>().is_none() {
                previous(info);
            }
        }));
    });
}
