//! Driven adapters that implement the domain's ports: durable document
//! storage, password hashing, and quiz content.

pub mod password;
pub mod persistence;
pub mod quiz;
