use trick_board::encoded_id::encode_id;
use trick_board::pagination::{ListWindow, SortDirection};
use uuid::Uuid;

use crate::helpers::spawn_app;

#[tokio::test]
async fn comments_of_an_unknown_trick_are_not_found() {
    let app = spawn_app().await;
    let token = encode_id(&Uuid::new_v4());

    let response = app
        .get_ajax(&format!("/load-trick-comments/{token}/0/5"))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn malformed_trick_token_is_not_found() {
    let app = spawn_app().await;

    let response = app.get_ajax("/load-trick-comments/not-a-token/0/5").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(app.get("/en/trick/not-a-token").await.status().as_u16(), 404);
}

#[tokio::test]
async fn comment_load_more_requires_the_ajax_header() {
    let app = spawn_app().await;
    let trick_id = app.seed_tricks(1).await[0];

    let response = app
        .get(&format!("/load-trick-comments/{}/0/5", encode_id(&trick_id)))
        .await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn only_root_comments_are_paged_and_replies_follow_their_parent() {
    // arrange
    let app = spawn_app().await;
    let trick_id = app.seed_tricks(1).await[0];
    let mut roots = Vec::new();
    for minute in 0..7 {
        roots.push(app.seed_comment(trick_id, None, minute * 10).await);
    }
    // two replies on the newest root, written after it
    app.seed_comment(trick_id, Some(roots[6]), 61).await;
    app.seed_comment(trick_id, Some(roots[6]), 62).await;

    // act
    let batch = app
        .get_batch(&format!("/load-trick-comments/{}/2/5", encode_id(&trick_id)))
        .await;

    // assert
    assert_eq!(batch.total_count, 7);
    assert_eq!(batch.window, ListWindow::new(2, 5, SortDirection::Desc));
    let root_ranks: Vec<_> = batch.items.iter().filter_map(|item| item.rank).collect();
    assert_eq!(root_ranks, vec![6, 5, 4, 3, 2]);

    let newest = &batch.items[0];
    assert_eq!(newest.token, encode_id(&roots[6]));
    let reply_ranks: Vec<_> = newest.replies.iter().filter_map(|reply| reply.rank).collect();
    assert_eq!(reply_ranks, vec![0, 1]);
    assert!(batch.items[1..].iter().all(|item| item.replies.is_empty()));
}

#[tokio::test]
async fn comment_fragment_nests_replies() {
    // arrange
    let app = spawn_app().await;
    let trick_id = app.seed_tricks(1).await[0];
    let root = app.seed_comment(trick_id, None, 0).await;
    app.seed_comment(trick_id, Some(root), 1).await;

    // act
    let html = app
        .get_ajax(&format!("/load-trick-comments/{}/0/5", encode_id(&trick_id)))
        .await
        .text()
        .await
        .unwrap();

    // assert
    assert_eq!(html.matches(r#"class="comment-box""#).count(), 1);
    assert_eq!(html.matches(r#"class="reply-box""#).count(), 1);
    assert!(html.contains(r#"data-offset="0" data-count="1""#));
}

#[tokio::test]
async fn trick_page_opens_on_the_newest_comments() {
    // arrange
    let app = spawn_app().await;
    let trick_id = app.seed_tricks(1).await[0];
    for minute in 0..8 {
        app.seed_comment(trick_id, None, minute).await;
    }

    // act
    let response = app.get(&format!("/fr/trick/{}", encode_id(&trick_id))).await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("<h1>Trick 0</h1>"));
    assert_eq!(html.matches(r#"class="comment-box""#).count(), 5);
    assert!(html.contains(r#"data-offset="7" data-count="8""#));
    assert!(!html.contains(r#"data-offset="2" "#));
}

#[tokio::test]
async fn new_comment_after_the_page_was_loaded_resets_the_window() {
    // arrange
    let app = spawn_app().await;
    let trick_id = app.seed_tricks(1).await[0];
    for minute in 0..8 {
        app.seed_comment(trick_id, None, minute).await;
    }
    let token = encode_id(&trick_id);
    app.get(&format!("/en/trick/{token}")).await;
    app.seed_comment(trick_id, None, 30).await;

    // act
    let batch = app
        .get_batch(&format!("/load-trick-comments/{token}/0/3"))
        .await;

    // assert
    assert_eq!(batch.notice.map(|n| n.as_str()), Some("outdated"));
    assert_eq!(batch.window, ListWindow::new(4, 5, SortDirection::Desc));
}

#[tokio::test]
async fn unknown_trick_page_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .get(&format!("/en/trick/{}", encode_id(&Uuid::new_v4())))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}
