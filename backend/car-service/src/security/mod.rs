/// Security primitives: password hashing and JWT encoding/validation steps
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys};
pub use password::{hash_password, verify_password};
