// Use cases layer: session lifecycle, sign-in flows and polling.

pub mod polling;
pub mod session_manager;
pub mod sign_in;

#[cfg(test)]
pub(crate) mod test_support;

pub use polling::{PollHandle, spawn_poller};
pub use session_manager::SessionManager;
pub use sign_in::{AdminLoginUseCase, LoginUseCase, SignedIn, VerifyOtpUseCase};
