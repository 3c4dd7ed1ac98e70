/// Pluggable backends behind the sign-in and refresh endpoints

mod authentication;
mod credentials;
mod refresh;

pub use authentication::{
    user_is_active, AuthenticationBackend, BackendAuthentication, EmailBackendAuthentication,
    UsernameBackendAuthentication,
};
pub use credentials::{LoginEmailIn, LoginPayload, LoginUserIn, PasswordCredentials};
pub use refresh::{RefreshAuthentication, RefreshBackend};
