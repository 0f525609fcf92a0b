//! Record-locking coordination core.
//!
//! Tracks which admin users have which documents open for editing:
//!
//! - [`registry::LockRegistry`] -- owns lock state and applies open / close /
//!   disconnect events, gated by [`permissions::can_lock`].
//! - [`status::StatusQueryService`] -- answers "who else is editing this?".
//! - [`store::LockStore`], [`directory::PermissionSource`],
//!   [`directory::UserDirectory`] -- the collaborator seams, with in-process
//!   implementations in [`memory`].

pub mod directory;
pub mod error;
mod guards;
pub mod locking;
pub mod memory;
pub mod permissions;
pub mod protocol;
pub mod registry;
pub mod settings;
pub mod status;
pub mod store;
pub mod types;
