//! Waypost query strings
//!
//! Converts between a flat, insertion-ordered key/value mapping and the
//! `?a=1&b=2` form found in a URL:
//! - `parse` never fails; malformed fragments degrade to literal text
//! - `stringify` emits pairs in insertion order, `""` for an empty mapping
//! - repeated keys collect into [`ParamValue::Multiple`]

mod codec;
mod params;

pub use codec::{parse, stringify};
pub use params::{ParamValue, Params};
