use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::pagination::{ChildRankPolicy, OffsetLimitResolver, SortDirection};

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. \
                Use either `local` or `production`."
            )),
        }
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub redis_uri: SecretString,
    pub cors: CorsSettings,
    #[serde(default)]
    pub listing: ListingSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub hmac_secret: SecretString,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string()]
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ListingSettings {
    #[serde(default = "default_trick_list")]
    pub tricks: ListSettings,
    #[serde(default = "default_comment_list")]
    pub comments: CommentListSettings,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            tricks: default_trick_list(),
            comments: default_comment_list(),
        }
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug)]
pub struct ListSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub default_limit: i64,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ListSettings {
    #[must_use]
    pub fn resolver(&self) -> OffsetLimitResolver {
        OffsetLimitResolver::new(self.default_limit)
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug)]
pub struct CommentListSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub default_limit: i64,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub child_ranking: ChildRankPolicy,
}

impl CommentListSettings {
    #[must_use]
    pub const fn list(&self) -> ListSettings {
        ListSettings {
            default_limit: self.default_limit,
            direction: self.direction,
        }
    }
}

const fn default_trick_list() -> ListSettings {
    ListSettings {
        default_limit: 10,
        direction: SortDirection::Desc,
    }
}

const fn default_comment_list() -> CommentListSettings {
    CommentListSettings {
        default_limit: 5,
        direction: SortDirection::Desc,
        child_ranking: ChildRankPolicy::Sibling,
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub max_age: usize,
}

#[allow(clippy::missing_errors_doc)]
/// # Panics
/// panics when the working directory or `APP_ENVIRONMENT` cannot be read
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // detect environment
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");

    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
