//! Module containing the type-erased payload data structure

mod data;
mod raw;
mod vtable;

pub use self::raw::{RawPayload, RawPayloadRef};
