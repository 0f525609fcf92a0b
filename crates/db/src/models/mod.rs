pub mod admin;
pub mod open_entity;

/// Primary keys of the tables this crate reads are `BIGSERIAL` / `INTEGER`.
pub type DbId = i64;
