//! The cafe resource.
//!
//! Everything that decides whether inbound text becomes a persisted row or a structured
//! rejection lives here, independent of transport and storage.

pub mod coercion;
pub mod error;
pub mod model;

pub use coercion::{
    coerce_boolean, coerce_price, coerce_required_text, coerce_url, FieldFailure, Price,
};
pub use error::{CafeError, ErrorKind};
pub use model::{Cafe, CafeField, FieldKind, NewCafe, RawParams};
