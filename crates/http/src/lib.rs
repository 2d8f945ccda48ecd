mod error;
mod router;
mod server;
mod trace;

pub use error::HttpError;
pub use router::{AppState, build_router};
pub use server::{HttpServer, ServerConfig};
pub use trace::init_tracing;
