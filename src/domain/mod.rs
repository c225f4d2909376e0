//! Domain layer: the cafe record model, field coercion and the error taxonomy.

pub mod cafe;
