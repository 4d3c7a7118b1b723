// Authentication module
// Token issuing, password hashing and the bearer-token gate for protected routes

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::login_handler;
pub use middleware::{AuthenticatedUser, Authenticator};
pub use password::PasswordService;
pub use token::{Claims, TokenService};
