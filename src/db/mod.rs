//! Database Layer
//!
//! SQLite-backed session store: connection pool, migrations, models and the
//! session repository.

mod database;
pub mod error;
pub mod models;
pub mod repository;

pub use database::*;
pub use error::StoreError;
pub use models::*;
pub use repository::SessionRepository;
