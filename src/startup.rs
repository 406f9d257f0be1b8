use actix_cors::Cors;
use actix_session::{SessionMiddleware, storage::RedisSessionStore};
use actix_web::{App, HttpServer, cookie::Key, dev::Server, http, middleware::from_fn, web, web::Data};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::ajax::reject_non_ajax_requests;
use crate::configuration::{CorsSettings, DatabaseSettings, ListingSettings, Settings};
use crate::errors::ListError;
use crate::routes::{health_check, home, load_comments, load_tricks, trick_detail};

// locales the site answers on, the lists themselves do not depend on them
pub struct SupportedLocales(pub Vec<String>);

impl SupportedLocales {
    #[allow(clippy::missing_errors_doc)]
    pub fn ensure(&self, locale: &str) -> Result<(), ListError> {
        if self.0.iter().any(|known| known == locale) {
            Ok(())
        } else {
            Err(ListError::UnknownLocale(locale.to_string()))
        }
    }
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    #[allow(clippy::missing_errors_doc)]
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port,
        );

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            configuration.application.hmac_secret,
            configuration.redis_uri,
            SupportedLocales(configuration.application.locales),
            configuration.listing,
            configuration.cors,
        )
        .await?;

        Ok(Self { port, server })
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[allow(clippy::missing_errors_doc)]
    // only return when the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

// run the actual server
#[allow(clippy::too_many_arguments)]
async fn run(
    listener: TcpListener,
    db_pool: PgPool,
    hmac_secret: SecretString,
    redis_uri: SecretString,
    locales: SupportedLocales,
    listing: ListingSettings,
    cors: CorsSettings,
) -> Result<Server, anyhow::Error> {
    let db_pool = Data::new(db_pool);
    let locales = Data::new(locales);
    let listing = Data::new(listing);
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());
    let redis_store = RedisSessionStore::new(redis_uri.expose_secret()).await?;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(
                redis_store.clone(),
                secret_key.clone(),
            ))
            .wrap(TracingLogger::default())
            .wrap(cors_middleware(&cors))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource([
                    "/{locale}/home-load-tricks/{offset}",
                    "/{locale}/home-load-tricks/{offset}/{limit}",
                ])
                .wrap(from_fn(reject_non_ajax_requests))
                .route(web::get().to(load_tricks)),
            )
            .service(
                web::resource("/load-trick-comments/{trick_token}/{offset}/{limit}")
                    .wrap(from_fn(reject_non_ajax_requests))
                    .route(web::get().to(load_comments)),
            )
            .route("/{locale}/trick/{trick_token}", web::get().to(trick_detail))
            .route("/{locale}/", web::get().to(home))
            .route("/{locale}", web::get().to(home))
            .app_data(db_pool.clone())
            .app_data(locales.clone())
            .app_data(listing.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn cors_middleware(cors: &CorsSettings) -> Cors {
    let policy = cors
        .allowed_origins
        .iter()
        .fold(Cors::default(), |policy, origin| policy.allowed_origin(origin));
    policy
        .allowed_methods(vec!["GET"])
        .allowed_headers(vec![
            http::header::ACCEPT,
            http::header::CONTENT_TYPE,
            http::header::HeaderName::from_static("x-requested-with"),
        ])
        .supports_credentials()
        .max_age(cors.max_age)
}

#[must_use]
pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.connect_options())
}
