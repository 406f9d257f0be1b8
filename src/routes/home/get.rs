use actix_web::{HttpResponse, http::header::ContentType, web};
use anyhow::Context;
use sqlx::PgPool;

use crate::{
    configuration::ListingSettings,
    errors::ListError,
    listing::{PgTrickSource, load_first_window, render},
    session_state::TypedSession,
    startup::SupportedLocales,
};

#[derive(serde::Deserialize, Debug)]
pub struct LocalePath {
    locale: String,
}

#[allow(clippy::future_not_send, clippy::missing_errors_doc)]
#[tracing::instrument(
    name = "Render home page",
    skip(pool, settings, locales, session),
    fields(locale = %path.locale)
)]
pub async fn home(
    path: web::Path<LocalePath>,
    pool: web::Data<PgPool>,
    settings: web::Data<ListingSettings>,
    locales: web::Data<SupportedLocales>,
    session: TypedSession,
) -> Result<HttpResponse, ListError> {
    locales.ensure(&path.locale)?;
    let list = settings.tricks;

    let batch = load_first_window(
        &PgTrickSource::new(pool.get_ref()),
        &session,
        &list.resolver(),
        list.direction,
    )
    .await?;

    tracing::info!(
        "Rendered home page with {} of {} tricks",
        batch.page.len(),
        batch.total_count
    );

    let body = render::home_page(&batch, &path.locale, list.default_limit)
        .context("Failed to render the home page")?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
