pub mod handlers;
pub mod params;
pub mod router;
pub mod state;

pub use router::{build_router, create_router};
pub use state::AppState;
