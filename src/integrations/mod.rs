//! External service integrations.

pub mod registry_client {
    pub use crate::registry_client::*;
}
