// --- Error Handling ---
//
// The registration error taxonomy. Argument errors fail an attempt before
// any side effect; everything else is reported exactly once through the
// attempt's Result.

use pushbridge_common::services::BoxedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A required parameter was missing or empty. Programmer error, never
    /// retried by the engine.
    #[error("Invalid registration parameters: {0} must not be empty")]
    InvalidParameters(&'static str),

    /// The platform channel service cannot be reached at all. Reported before
    /// any network attempt; retrying is the caller's responsibility.
    #[error("Channel provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The channel provider rejected a registration.
    #[error("Channel registration failed: {0}")]
    Channel(#[source] BoxedError),

    /// The application backend rejected an operation. Stored backend fields
    /// are left untouched so a later attempt can retry as an update.
    #[error("Backend registration failed: {0}")]
    Backend(#[source] BoxedError),

    /// The backend reported success but omitted the device id. Local backend
    /// state is cleared so the next attempt re-creates from scratch.
    #[error("Backend reported success without a device id")]
    MalformedResponse,

    /// A state store write or read failed.
    #[error("State store failure: {0}")]
    Store(#[source] BoxedError),
}
