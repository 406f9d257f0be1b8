use trick_board::pagination::{ListWindow, SortDirection};

use crate::helpers::spawn_app;

fn ranks(batch: &trick_board::listing::BatchPayload) -> Vec<i64> {
    batch.items.iter().filter_map(|item| item.rank).collect()
}

#[tokio::test]
async fn load_more_without_the_ajax_header_is_forbidden() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(3).await;

    // act
    let response = app.get("/en/home-load-tricks/0/10").await;

    // assert
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn unknown_locale_is_not_found() {
    let app = spawn_app().await;

    assert_eq!(app.get("/xx/").await.status().as_u16(), 404);
    assert_eq!(
        app.get_ajax("/xx/home-load-tricks/0/10").await.status().as_u16(),
        404
    );
}

#[tokio::test]
async fn homepage_shows_the_newest_tricks_first() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(12).await;

    // act
    let response = app.get("/en/").await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"data-offset="11" data-count="12""#));
    assert!(html.contains(r#"data-offset="2" data-count="12""#));
    assert!(!html.contains(r#"data-offset="1" "#));
    assert!(html.find(r#"data-offset="11""#) < html.find(r#"data-offset="2""#));
}

#[tokio::test]
async fn desc_request_past_the_newest_rank_returns_the_ranks_left_in_the_list() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(25).await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/20/10").await;

    // assert
    assert_eq!(batch.window, ListWindow::new(20, 5, SortDirection::Desc));
    assert_eq!(batch.total_count, 25);
    assert_eq!(ranks(&batch), vec![24, 23, 22, 21, 20]);
    assert!(batch.notice.is_none());
}

#[tokio::test]
async fn asc_request_near_the_end_shrinks_its_limit() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(25).await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/20/10?order=ASC").await;

    // assert
    assert_eq!(batch.window, ListWindow::new(20, 5, SortDirection::Asc));
    assert_eq!(ranks(&batch), vec![20, 21, 22, 23, 24]);
}

#[tokio::test]
async fn unknown_order_falls_back_to_the_default_desc_window() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(25).await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/3/4?order=XYZ").await;

    // assert
    assert_eq!(batch.window, ListWindow::new(15, 10, SortDirection::Desc));
    assert_eq!(batch.notice.map(|n| n.as_str()), Some("reset"));
    assert_eq!(ranks(&batch).first(), Some(&24));
}

#[tokio::test]
async fn invalid_limit_is_flagged_in_the_fragment() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(12).await;

    // act
    let response = app.get_ajax("/en/home-load-tricks/0/0").await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.starts_with(r#"<div class="list-error" data-error="reset" data-count="12">"#));
    assert_eq!(html.matches("trick-card").count(), 10);
}

#[tokio::test]
async fn extreme_offsets_and_limits_fall_back_to_the_default_window() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(25).await;

    for path in [
        "/en/home-load-tricks/1/9223372036854775807",
        "/en/home-load-tricks/9223372036854775807/10",
        "/en/home-load-tricks/-9223372036854775808/9223372036854775807",
    ] {
        // act
        let batch = app.get_batch(path).await;

        // assert
        assert_eq!(batch.window, ListWindow::new(15, 10, SortDirection::Desc), "{path}");
        assert_eq!(batch.notice.map(|n| n.as_str()), Some("reset"), "{path}");
        assert_eq!(ranks(&batch).first(), Some(&24), "{path}");
    }
}

#[tokio::test]
async fn limit_defaults_to_the_configured_page_size() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(30).await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/5").await;

    // assert
    assert_eq!(batch.window, ListWindow::new(5, 10, SortDirection::Desc));
    assert_eq!(batch.items.len(), 10);
}

#[tokio::test]
async fn new_tricks_since_the_page_was_loaded_reset_the_window() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(25).await;
    app.get("/en/").await;
    app.seed_tricks(2).await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/5/10").await;

    // assert
    assert_eq!(batch.notice.map(|n| n.as_str()), Some("outdated"));
    assert_eq!(batch.total_count, 27);
    assert_eq!(batch.window, ListWindow::new(17, 10, SortDirection::Desc));

    // the new count is now the known one
    let batch = app.get_batch("/en/home-load-tricks/7/10").await;
    assert!(batch.notice.is_none());
    assert_eq!(batch.window, ListWindow::new(7, 10, SortDirection::Desc));
}

#[tokio::test]
async fn outdated_notice_is_rendered_as_a_data_error() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(5).await;
    app.get("/en/").await;
    app.seed_tricks(1).await;

    // act
    let html = app
        .get_ajax("/en/home-load-tricks/0/10")
        .await
        .text()
        .await
        .unwrap();

    // assert
    assert!(html.contains(r#"data-error="outdated" data-count="6""#));
}

#[tokio::test]
async fn last_desc_page_reaches_rank_zero() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(12).await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/-8/10").await;

    // assert
    assert_eq!(batch.window, ListWindow::new(0, 2, SortDirection::Desc));
    assert_eq!(ranks(&batch), vec![1, 0]);
}

#[tokio::test]
async fn empty_list_answers_with_an_empty_window() {
    // arrange
    let app = spawn_app().await;

    // act
    let batch = app.get_batch("/en/home-load-tricks/0/10").await;

    // assert
    assert_eq!(batch.total_count, 0);
    assert!(batch.window.is_empty());
    assert!(batch.items.is_empty());
}
