use std::net::TcpListener;
use std::sync::Arc;

use simple_jwt::auth::{BcryptHasher, PasswordHasher, TokenIssuer};
use simple_jwt::backends::{
    EmailBackendAuthentication, RefreshAuthentication, UsernameBackendAuthentication,
};
use simple_jwt::configuration::{get_configuration, LoginSchema};
use simple_jwt::startup::run;
use simple_jwt::store::{InMemoryUserStore, UserStore};
use simple_jwt::telemetry::init_telemetry;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    tracing::error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}: {}", context, e))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => return Err(startup_error("Failed to read configuration", e)),
    };

    let jwt_settings = configuration.simple_jwt.clone();

    let issuer = TokenIssuer::from_settings(&jwt_settings)
        .map(Arc::new)
        .map_err(|e| startup_error("Invalid token settings", e))?;

    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new());

    let store = InMemoryUserStore::from_seed(&configuration.users, hasher.as_ref())
        .map_err(|e| startup_error("Failed to seed user store", e))?;
    tracing::info!(users = store.len(), "User store ready");
    let store: Arc<dyn UserStore> = Arc::new(store);

    let refresh = RefreshAuthentication::new(issuer.clone());

    let address = configuration.application.address();
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = match jwt_settings.login_schema {
        LoginSchema::Email => {
            let authentication = EmailBackendAuthentication::new(store, hasher, issuer)
                .map_err(|e| startup_error("Failed to build authentication backend", e))?;
            run(listener, jwt_settings, authentication, refresh)?
        }
        LoginSchema::Username => {
            let authentication = UsernameBackendAuthentication::new(store, hasher, issuer)
                .map_err(|e| startup_error("Failed to build authentication backend", e))?;
            run(listener, jwt_settings, authentication, refresh)?
        }
    };
    tracing::info!("Server started successfully");

    server.await
}
