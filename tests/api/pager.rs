use std::sync::Mutex;
use std::time::Duration;

use trick_board::client::{
    ClientPager, HttpTransport, ListEndpoint, LoadOutcome, PageRenderer, PagerError, PagerSeed,
    PagerSettings, Toast, ToastLevel, TriggerState,
};
use trick_board::encoded_id::encode_id;
use trick_board::listing::EntryPayload;
use trick_board::pagination::SortDirection;
use uuid::Uuid;

use crate::helpers::spawn_app;

#[derive(Default)]
struct ListView {
    ranks: Mutex<Vec<Option<i64>>>,
    toasts: Mutex<Vec<Toast>>,
    trigger: Mutex<Option<TriggerState>>,
}

impl PageRenderer for ListView {
    fn clear_list(&self) {
        self.ranks.lock().unwrap().clear();
    }

    fn insert(&self, entry: &EntryPayload) {
        self.ranks.lock().unwrap().push(entry.rank);
    }

    fn set_busy(&self, _busy: bool) {}

    fn set_trigger(&self, state: TriggerState) {
        *self.trigger.lock().unwrap() = Some(state);
    }

    fn toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

fn settings(direction: SortDirection) -> PagerSettings {
    PagerSettings {
        reveal_step: Duration::ZERO,
        ..PagerSettings::new(10, direction)
    }
}

#[tokio::test]
async fn pager_walks_the_trick_list_down_to_rank_zero() {
    // arrange
    let app = spawn_app().await;
    app.seed_tricks(23).await;
    let first = app.get_batch("/en/home-load-tricks/13/10").await;
    let transport = HttpTransport::new(
        app.api_client.clone(),
        &app.address,
        ListEndpoint::Tricks {
            locale: "en".to_string(),
        },
    );
    let pager = ClientPager::new(
        transport,
        ListView::default(),
        settings(SortDirection::Desc),
        PagerSeed::from(&first),
    );

    // act
    let mut loads = 0;
    while let LoadOutcome::Loaded { .. } = pager.load_more().await {
        loads += 1;
    }

    // assert
    assert_eq!(loads, 2);
    let view = pager.renderer();
    let ranks: Vec<i64> = view.ranks.lock().unwrap().iter().flatten().copied().collect();
    assert_eq!(ranks, (0..13).rev().collect::<Vec<_>>());
    let toasts = view.toasts.lock().unwrap().clone();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Info);
    assert_eq!(*view.trigger.lock().unwrap(), Some(TriggerState::Hidden));
}

#[tokio::test]
async fn pager_walks_comments_in_ascending_order() {
    // arrange
    let app = spawn_app().await;
    let trick_id = app.seed_tricks(1).await[0];
    for minute in 0..12 {
        app.seed_comment(trick_id, None, minute).await;
    }
    let token = encode_id(&trick_id);
    let first = app
        .get_batch(&format!("/load-trick-comments/{token}/0/5?order=ASC"))
        .await;
    let transport = HttpTransport::new(
        app.api_client.clone(),
        &app.address,
        ListEndpoint::Comments { trick_token: token },
    );
    let pager = ClientPager::new(
        transport,
        ListView::default(),
        PagerSettings {
            reveal_step: Duration::ZERO,
            ..PagerSettings::new(5, SortDirection::Asc)
        },
        PagerSeed::from(&first),
    );

    // act
    while let LoadOutcome::Loaded { .. } = pager.load_more().await {}

    // assert
    let ranks: Vec<i64> = pager
        .renderer()
        .ranks
        .lock()
        .unwrap()
        .iter()
        .flatten()
        .copied()
        .collect();
    assert_eq!(ranks, (5..12).collect::<Vec<_>>());
    assert!(pager.is_ended().await);
}

#[tokio::test]
async fn pager_surfaces_the_http_status_of_a_failed_load() {
    // arrange
    let app = spawn_app().await;
    let transport = HttpTransport::new(
        app.api_client.clone(),
        &app.address,
        ListEndpoint::Comments {
            trick_token: encode_id(&Uuid::new_v4()),
        },
    );
    let pager = ClientPager::new(
        transport,
        ListView::default(),
        settings(SortDirection::Desc),
        PagerSeed {
            window: trick_board::pagination::ListWindow::new(10, 10, SortDirection::Desc),
            total_count: 20,
        },
    );

    // act
    let outcome = pager.load_more().await;

    // assert
    assert!(matches!(outcome, LoadOutcome::Failed(PagerError::Status(404))));
    let toasts = pager.renderer().toasts.lock().unwrap().clone();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].persistent);
    assert_eq!(
        *pager.renderer().trigger.lock().unwrap(),
        Some(TriggerState::Enabled)
    );
}
