//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access (repository traits per module).
//! - Reuses validation and entity definitions in `models` crate.
//! - Each module ships a SeaORM repository and an in-memory one.

pub mod auth;
pub mod refueling;
#[cfg(test)]
pub mod test_support;
