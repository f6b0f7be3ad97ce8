//! Repository traits and in-memory mock implementations
//!
//! The traits define the durable-store contract consumed by the services.
//! Concrete MySQL implementations live in the `gp_infra` crate; the mocks
//! here back the service unit tests.

pub mod session;
pub mod user;

pub use session::{MockSessionRepository, SessionRepository};
pub use user::{MockUserRepository, UserRepository};
