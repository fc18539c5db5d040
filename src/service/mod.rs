//! Resource access: generic repository and record validation.

mod repository;
mod validation;
pub use repository::Repository;
pub use validation::RecordValidator;
