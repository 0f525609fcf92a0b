pub mod health;
pub mod record_locking;
