pub mod errors;
pub mod flash;
pub mod form;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;

pub use routes::build_router;
pub use startup::run;
pub use state::ServerState;
