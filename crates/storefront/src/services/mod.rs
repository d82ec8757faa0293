//! External service clients.

pub mod orders;
