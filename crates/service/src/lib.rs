//! Service layer: auth workflows, client-side session state, and the access
//! guard, independent of the web framework.
//! - `auth` owns registration, login, token verification, password flows.
//! - `session` is the single-writer auth state store consumers subscribe to.
//! - `guard` decides render/redirect from a role set and the current state.
//! - `client` drives the HTTP auth boundary and feeds the session store.

pub mod auth;
pub mod client;
pub mod guard;
pub mod session;
pub mod validation;

#[cfg(test)]
pub mod test_support;
