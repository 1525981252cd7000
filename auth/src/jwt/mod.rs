pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use claims::MAX_EXPIRATION_HOURS;
pub use errors::JwtError;
pub use handler::JwtHandler;
