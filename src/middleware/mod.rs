//! Request-processing middleware.
//!
//! - [`auth`]: bearer-token authentication extractor
//! - [`role`]: role-based authorization layers
//!
//! # Authentication flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] validates the JWT and extracts the claims
//! 3. A role layer ([`role::require_school_admin`], [`role::require_driver`])
//!    rejects callers whose role is not allowed for the nested routes
//! 4. The handler runs with the authenticated claims

pub mod auth;
pub mod role;
