//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use patronage::ApiDoc;
use patronage::domain::ports::SharedDirectory;
use patronage::inbound::http::health::{HealthState, live, ready};
use patronage::inbound::http::participants::{change_username, current_participant};
use patronage::inbound::http::session::SessionTokens;
use patronage::inbound::http::state::HttpState;
use patronage::middleware::Authenticate;

/// Build the actix application with authentication and routes wired.
fn build_app(
    health_state: web::Data<HealthState>,
    directory: SharedDirectory,
    tokens: SessionTokens,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(current_participant)
        .service(change_username);

    let app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(HttpState::new(directory.clone())))
        .wrap(Authenticate::new(directory, tokens))
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Create the HTTP server from validated configuration.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        settings,
        bind_addr,
        directory,
    } = config;
    let tokens = SessionTokens::new(settings.key, settings.cookie_secure, settings.same_site);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            directory.clone(),
            tokens.clone(),
        )
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    Ok(server.run())
}
