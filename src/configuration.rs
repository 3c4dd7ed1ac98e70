use jsonwebtoken::Algorithm;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub simple_jwt: JwtSettings,
    /// Accounts loaded into the in-memory user store at startup
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which credential payload the sign-in endpoint accepts
#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoginSchema {
    #[default]
    Email,
    Username,
}

/// JWT issuance and routing settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    /// HMAC secret, or a PEM private key for asymmetric algorithms
    pub signing_key: String,
    /// PEM public key; required for asymmetric algorithms
    #[serde(default)]
    pub verifying_key: Option<String>,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_access_token_lifetime")]
    pub access_token_lifetime: i64, // seconds (e.g., 300 for 5 minutes)
    #[serde(default = "default_refresh_token_lifetime")]
    pub refresh_token_lifetime: i64, // seconds (e.g., 86400 for 1 day)
    #[serde(default = "default_access_token_name")]
    pub access_token_name: String,
    #[serde(default = "default_refresh_token_name")]
    pub refresh_token_name: String,
    /// Prefix the endpoints are mounted under
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_signin_url")]
    pub signin_url: String,
    #[serde(default = "default_refresh_url")]
    pub refresh_url: String,
    #[serde(default)]
    pub login_schema: LoginSchema,
}

impl JwtSettings {
    /// Settings with every default applied and an HMAC secret
    pub fn with_signing_key(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            verifying_key: None,
            algorithm: default_algorithm(),
            access_token_lifetime: default_access_token_lifetime(),
            refresh_token_lifetime: default_refresh_token_lifetime(),
            access_token_name: default_access_token_name(),
            refresh_token_name: default_refresh_token_name(),
            path: default_path(),
            signin_url: default_signin_url(),
            refresh_url: default_refresh_url(),
            login_schema: LoginSchema::default(),
        }
    }
}

/// An account seeded into the in-memory store
#[derive(serde::Deserialize, Clone)]
pub struct SeedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Plain text; hashed with bcrypt when the store is built
    pub password: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_algorithm() -> Algorithm {
    Algorithm::HS256
}

fn default_access_token_lifetime() -> i64 {
    5 * 60
}

fn default_refresh_token_lifetime() -> i64 {
    24 * 60 * 60
}

fn default_access_token_name() -> String {
    "access_token".to_string()
}

fn default_refresh_token_name() -> String {
    "refresh_token".to_string()
}

fn default_path() -> String {
    "/simple-jwt".to_string()
}

fn default_signin_url() -> String {
    "/signin".to_string()
}

fn default_refresh_url() -> String {
    "/refresh-access".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(yaml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .expect("Failed to build config")
            .try_deserialize::<Settings>()
            .expect("Failed to deserialize settings")
    }

    #[test]
    fn test_defaults_applied() {
        let settings = parse(
            r#"
application:
  port: 8000
simple_jwt:
  signing_key: "secret"
"#,
        );

        let jwt = settings.simple_jwt;
        assert_eq!(jwt.algorithm, Algorithm::HS256);
        assert_eq!(jwt.access_token_lifetime, 300);
        assert_eq!(jwt.refresh_token_lifetime, 86400);
        assert_eq!(jwt.access_token_name, "access_token");
        assert_eq!(jwt.refresh_token_name, "refresh_token");
        assert_eq!(jwt.path, "/simple-jwt");
        assert_eq!(jwt.signin_url, "/signin");
        assert_eq!(jwt.refresh_url, "/refresh-access");
        assert_eq!(jwt.login_schema, LoginSchema::Email);
        assert!(settings.users.is_empty());
        assert_eq!(settings.application.address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_overrides_and_users() {
        let settings = parse(
            r#"
application:
  host: "0.0.0.0"
  port: 9000
simple_jwt:
  signing_key: "secret"
  algorithm: "HS512"
  access_token_lifetime: 60
  signin_url: "/login"
  refresh_url: "/refresh"
  login_schema: "username"
users:
  - id: "1"
    username: "test"
    password: "12345"
    is_active: false
"#,
        );

        assert_eq!(settings.simple_jwt.algorithm, Algorithm::HS512);
        assert_eq!(settings.simple_jwt.access_token_lifetime, 60);
        assert_eq!(settings.simple_jwt.signin_url, "/login");
        assert_eq!(settings.simple_jwt.login_schema, LoginSchema::Username);
        assert_eq!(settings.users.len(), 1);
        assert_eq!(settings.users[0].is_active, Some(false));
        assert!(settings.users[0].email.is_none());
    }

    #[test]
    fn test_with_signing_key_matches_file_defaults() {
        let jwt = JwtSettings::with_signing_key("secret");
        assert_eq!(jwt.signing_key, "secret");
        assert_eq!(jwt.access_token_name, "access_token");
        assert!(jwt.verifying_key.is_none());
    }
}
