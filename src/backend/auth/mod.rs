//! Authentication Module
//!
//! Identity for socket handshakes. The chat core never authenticates on its
//! own; it receives an `Identity` from whichever `IdentityGate` the server
//! was built with.
//!
//! # Architecture
//!
//! - **`sessions`** - JWT token generation and validation
//! - **`gate`** - `IdentityGate` trait and the JWT-backed implementation
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT token management
//! └── gate.rs         - Handshake authentication
//! ```
//!
//! # Handshake Flow
//!
//! 1. Client connects to `/messages` with a token (header or `?token=`)
//! 2. Token signature and expiry are verified
//! 3. User is loaded from the store and must be `ACTIVE`
//! 4. The connection proceeds with `Identity { user_id, role }`
//!
//! Any failure answers 401 and the socket is never upgraded.

/// JWT token generation and validation
pub mod sessions;

/// Identity gate
pub mod gate;

pub use gate::{Identity, IdentityGate, JwtIdentityGate};
pub use sessions::{create_token, verify_token, Claims};
