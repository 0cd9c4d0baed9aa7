//! Refueling records owned by a single user.
//!
//! Every operation takes the acting [`UserId`](crate::auth::UserId); records
//! belonging to someone else behave exactly like records that do not exist.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use domain::{Refueling, RefuelingId, RefuelingParams};
pub use errors::RefuelingError;
pub use service::RefuelingService;
