//! Verification of host-issued admin tokens.

pub mod jwt;
