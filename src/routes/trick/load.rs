use actix_web::{HttpRequest, HttpResponse, web};
use sqlx::PgPool;

use super::super::{OrderQuery, list_response};
use crate::{
    configuration::ListingSettings,
    encoded_id::decode_id,
    errors::ListError,
    listing::{BatchPayload, PgCommentSource, find_trick, load_batch, render},
    pagination::WindowRequest,
    session_state::TypedSession,
};

#[derive(serde::Deserialize, Debug)]
pub struct LoadCommentsPath {
    trick_token: String,
    offset: i64,
    limit: i64,
}

#[allow(clippy::future_not_send, clippy::missing_errors_doc)]
#[tracing::instrument(
    name = "Load more comments",
    skip(query, request, pool, settings, session),
    fields(trick_token = %path.trick_token, offset = %path.offset, limit = %path.limit)
)]
pub async fn load_comments(
    path: web::Path<LoadCommentsPath>,
    query: web::Query<OrderQuery>,
    request: HttpRequest,
    pool: web::Data<PgPool>,
    settings: web::Data<ListingSettings>,
    session: TypedSession,
) -> Result<HttpResponse, ListError> {
    let trick_id = decode_id(&path.trick_token).map_err(ListError::InvalidToken)?;
    if find_trick(pool.get_ref(), trick_id).await?.is_none() {
        tracing::warn!(%trick_id, "Comments requested for a trick that does not exist");
        return Err(ListError::TrickNotFound);
    }

    let list = settings.comments;
    let window_request =
        WindowRequest::new(path.offset, Some(path.limit), query.order_or(list.direction));

    let batch = load_batch(
        &PgCommentSource::new(pool.get_ref(), trick_id, list.child_ranking),
        &session,
        &list.list().resolver(),
        &window_request,
    )
    .await?;

    list_response(
        &request,
        || BatchPayload::from(&batch),
        || render::comment_fragment(&batch),
    )
}
