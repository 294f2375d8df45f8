pub mod error;
pub mod handlers;
pub mod identity;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
