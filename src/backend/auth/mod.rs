//! Authentication Module
//!
//! This module turns bearer credentials into user identities. Registration,
//! login and password handling belong to the identity service; the chat core
//! consumes only "verify token -> identity".
//!
//! # Architecture
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - JWT token generation and validation
//! - **`verifier`** - `IdentityVerifier`, shared by REST and socket handshake
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! └── verifier.rs     - Credential -> identity resolution
//! ```
//!
//! # Security
//!
//! - Tokens are HS256 JWTs signed with `JWT_SECRET`
//! - Tokens expire after 30 days
//! - A valid token for a deleted user is rejected (`UnknownUser`)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Credential verification
pub mod verifier;

pub use verifier::{Identity, IdentityVerifier};
