/// HTTP request handlers (REST API)
pub mod auth;
pub mod cars;
pub mod health;

// Re-export handlers for easy access
pub use auth::{login, logout, register, LoginResponse, MessageResponse};
pub use cars::{create_car, delete_car, get_car, list_cars, protected, update_car};
pub use health::health_check;
