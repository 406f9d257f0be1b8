use chrono::{Duration, Utc};
use secrecy::SecretString;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::LazyLock;
use uuid::Uuid;

use trick_board::{
    ajax::{REQUESTED_WITH, XML_HTTP_REQUEST},
    configuration::{DatabaseSettings, get_configuration},
    listing::BatchPayload,
    startup::{Application, get_connection_pool},
    telemetry::{get_subscriber, init_subscriber},
};

// ensure the `tracing` task is only initialized once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub _port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    // what the page scripts send: html fragment back
    pub async fn get_ajax(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .header(REQUESTED_WITH, XML_HTTP_REQUEST)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_batch(&self, path: &str) -> BatchPayload {
        let response = self
            .api_client
            .get(format!("{}{}", &self.address, path))
            .header(REQUESTED_WITH, XML_HTTP_REQUEST)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to decode the batch.")
    }

    /// Insert `count` tricks one minute apart, returned oldest first.
    pub async fn seed_tricks(&self, count: i64) -> Vec<Uuid> {
        let start = Utc::now() - Duration::hours(2);
        let mut ids = Vec::new();
        for i in 0..count {
            let trick_id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO tricks (trick_id, name, slug, description, created_at)
                VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(trick_id)
            .bind(format!("Trick {i}"))
            .bind(format!("trick-{trick_id}"))
            .bind("A grab or a spin")
            .bind(start + Duration::minutes(i))
            .execute(&self.db_pool)
            .await
            .expect("Failed to store test trick.");
            ids.push(trick_id);
        }
        ids
    }

    // `minute` orders the comments of a trick, lower is older
    pub async fn seed_comment(&self, trick_id: Uuid, parent_id: Option<Uuid>, minute: i64) -> Uuid {
        let comment_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO comments (comment_id, trick_id, parent_id, author, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(comment_id)
        .bind(trick_id)
        .bind(parent_id)
        .bind("rider")
        .bind(format!("comment at minute {minute}"))
        .bind(Utc::now() - Duration::hours(2) + Duration::minutes(minute))
        .execute(&self.db_pool)
        .await
        .expect("Failed to store test comment.");
        comment_id
    }
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.database.database_name = Uuid::new_v4().to_string();
        c.application.port = 0;
        c
    };

    //create and migrate the database
    configure_database(&configuration.database).await;

    // launch as background task
    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build configuration.");

    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address: format!("http://localhost:{}", application_port),
        _port: application_port,
        db_pool: get_connection_pool(&configuration.database),
        api_client: client,
    }
}

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let maintenance_settings = DatabaseSettings {
        database_name: "postgres".to_string(),
        username: "postgres".to_string(),
        password: SecretString::new("password".into()),
        ..config.clone()
    };

    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");

    connection_pool
}
