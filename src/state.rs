use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::jwt::SessionKeys;
use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::error_log::{ErrorLogStore, PgErrorLogStore};
use crate::mail::{Mailer, SmtpMailer};
use crate::todos::repo::{PgTodoStore, TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: SessionKeys,
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub error_logs: Arc<dyn ErrorLogStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Connect to PostgreSQL, apply migrations and wire the real backends.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let mailer = Arc::new(
            SmtpMailer::new(&config.smtp, &config.frontend_url).context("configure smtp")?,
        ) as Arc<dyn Mailer>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgTodoStore::new(db.clone())),
            Arc::new(PgErrorLogStore::new(db)),
            mailer,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        error_logs: Arc<dyn ErrorLogStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let keys = SessionKeys::from_config(&config.jwt);
        Self {
            config,
            keys,
            users,
            todos,
            error_logs,
            mailer,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::testing::Fakes::new().state()
    }
}
