pub mod cafe_service;

pub use cafe_service::{CafeForm, CafeService, FormErrors, LenientCreateError};
