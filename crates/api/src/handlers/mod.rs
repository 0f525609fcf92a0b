pub mod record_locking;
