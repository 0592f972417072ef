pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{ApiError, RequestError, Role, Session, SessionError, ValidationError};
pub use frameworks::config::ClientConfig;
pub use frameworks::runner::run;
pub use interface_adapters::{ApiGateway, CallOptions, NormalizedResponse};
pub use use_cases::SessionManager;
