/// Data models for users, cars and revocation records
pub mod car;
pub mod token;
pub mod user;

pub use car::{Car, CarUpdate, NewCar};
pub use token::RevokedToken;
pub use user::{LoginRequest, RegisterRequest, User};
