pub mod html;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod cafes;
    pub mod common;
    pub mod health;
    pub mod pages;
}

pub use router::{create_app, create_router, ApiDoc};
pub use types::AppState;
