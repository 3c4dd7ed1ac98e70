use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer, Scope};
use std::net::TcpListener;

use crate::backends::{AuthenticationBackend, RefreshBackend};
use crate::configuration::JwtSettings;
use crate::logger::LoggerMiddleware;
use crate::routes::{health_check, json_error_handler, refresh_access, signin};

/// Build the mountable token scope.
///
/// Registers `POST {path}{signin_url}` and `POST {path}{refresh_url}`.
/// Any other method on those paths is answered with 405.
pub fn simple_jwt_scope<A, R>(
    settings: &JwtSettings,
    authentication: web::Data<A>,
    refresh: web::Data<R>,
) -> Scope
where
    A: AuthenticationBackend,
    R: RefreshBackend,
{
    web::scope(&settings.path)
        .app_data(authentication)
        .app_data(refresh)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::resource(settings.signin_url.as_str()).route(web::post().to(signin::<A>)))
        .service(
            web::resource(settings.refresh_url.as_str())
                .route(web::post().to(refresh_access::<R>)),
        )
}

pub fn run<A, R>(
    listener: TcpListener,
    settings: JwtSettings,
    authentication: A,
    refresh: R,
) -> Result<Server, std::io::Error>
where
    A: AuthenticationBackend,
    R: RefreshBackend,
{
    let authentication = web::Data::new(authentication);
    let refresh = web::Data::new(refresh);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)
            .route("/health_check", web::get().to(health_check))
            .service(simple_jwt_scope(
                &settings,
                authentication.clone(),
                refresh.clone(),
            ))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
