mod api_types;
mod auth;
mod router;

pub use router::build_router;
