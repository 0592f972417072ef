// Domain layer: session model, wire payloads, ports and client-side rules.

pub mod auth;
pub mod bookings;
pub mod drivers;
pub mod errors;
pub mod payments;
pub mod ports;
pub mod ratings;
pub mod rides;
pub mod session;
pub mod users;
pub mod validation;

pub use auth::AuthProvider;
pub use errors::{ApiError, RequestError, SessionError, StorageError, ValidationError};
pub use ports::{Clock, SessionStorage, SystemClock, TokenSource};
pub use session::{Role, Session, UserRecord, redirect_target_for};
