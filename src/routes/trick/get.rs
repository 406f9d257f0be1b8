use actix_web::{HttpResponse, http::header::ContentType, web};
use anyhow::Context;
use sqlx::PgPool;

use crate::{
    configuration::ListingSettings,
    encoded_id::decode_id,
    errors::ListError,
    listing::{PgCommentSource, find_trick, load_first_window, render},
    session_state::TypedSession,
    startup::SupportedLocales,
};

#[derive(serde::Deserialize, Debug)]
pub struct TrickPath {
    locale: String,
    trick_token: String,
}

#[allow(clippy::future_not_send, clippy::missing_errors_doc)]
#[tracing::instrument(
    name = "Render trick page",
    skip(pool, settings, locales, session),
    fields(locale = %path.locale, trick_token = %path.trick_token)
)]
pub async fn trick_detail(
    path: web::Path<TrickPath>,
    pool: web::Data<PgPool>,
    settings: web::Data<ListingSettings>,
    locales: web::Data<SupportedLocales>,
    session: TypedSession,
) -> Result<HttpResponse, ListError> {
    locales.ensure(&path.locale)?;
    let trick_id = decode_id(&path.trick_token).map_err(ListError::InvalidToken)?;
    let trick = find_trick(pool.get_ref(), trick_id)
        .await?
        .ok_or(ListError::TrickNotFound)?;

    let list = settings.comments;
    let comments = load_first_window(
        &PgCommentSource::new(pool.get_ref(), trick_id, list.child_ranking),
        &session,
        &list.list().resolver(),
        list.direction,
    )
    .await?;

    let body = render::trick_page(&trick, &comments, list.default_limit)
        .context("Failed to render the trick page")?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
