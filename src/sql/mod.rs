//! SQL for JSONB collection tables: identifiers quoted, values always bound as parameters.

mod builder;
mod params;
pub use builder::*;
pub use params::PgBindValue;
