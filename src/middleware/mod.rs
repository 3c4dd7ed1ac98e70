/// Middleware module
///
/// Access-token guard for host routes.

mod jwt_middleware;

pub use jwt_middleware::JwtMiddleware;
