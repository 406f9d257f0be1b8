use actix_web::{HttpRequest, HttpResponse, web};
use sqlx::PgPool;

use super::super::{OrderQuery, list_response};
use crate::{
    configuration::ListingSettings,
    errors::ListError,
    listing::{BatchPayload, PgTrickSource, load_batch, render},
    pagination::WindowRequest,
    session_state::TypedSession,
    startup::SupportedLocales,
};

// limit is optional: /{locale}/home-load-tricks/{offset} uses the configured default
#[derive(serde::Deserialize, Debug)]
pub struct LoadTricksPath {
    locale: String,
    offset: i64,
    limit: Option<i64>,
}

#[allow(clippy::future_not_send, clippy::missing_errors_doc)]
#[tracing::instrument(
    name = "Load more tricks",
    skip(query, request, pool, settings, locales, session),
    fields(locale = %path.locale, offset = %path.offset, limit = ?path.limit)
)]
pub async fn load_tricks(
    path: web::Path<LoadTricksPath>,
    query: web::Query<OrderQuery>,
    request: HttpRequest,
    pool: web::Data<PgPool>,
    settings: web::Data<ListingSettings>,
    locales: web::Data<SupportedLocales>,
    session: TypedSession,
) -> Result<HttpResponse, ListError> {
    locales.ensure(&path.locale)?;
    let list = settings.tricks;
    let window_request = WindowRequest::new(path.offset, path.limit, query.order_or(list.direction));

    let batch = load_batch(
        &PgTrickSource::new(pool.get_ref()),
        &session,
        &list.resolver(),
        &window_request,
    )
    .await?;

    list_response(
        &request,
        || BatchPayload::from(&batch),
        || render::trick_fragment(&batch, &path.locale),
    )
}
