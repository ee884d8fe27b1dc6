use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewTodo, Todo, TodoChanges};

/// Owner-scoped todo persistence. Every query filters on `owner_id`.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create(&self, owner_id: Uuid, todo: NewTodo) -> anyhow::Result<Todo>;
    /// Newest first.
    async fn list(&self, owner_id: Uuid) -> anyhow::Result<Vec<Todo>>;
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> anyhow::Result<Option<Todo>>;
    /// `false` when no todo with `id` belongs to `owner_id`.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgTodoStore {
    db: PgPool,
}

impl PgTodoStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn create(&self, owner_id: Uuid, todo: NewTodo) -> anyhow::Result<Todo> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, owner_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&todo.title)
        .bind(&todo.description)
        .fetch_one(&self.db)
        .await
        .context("insert todo")?;
        Ok(row)
    }

    async fn list(&self, owner_id: Uuid) -> anyhow::Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, title, description, completed, created_at, updated_at
              FROM todos
             WHERE owner_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list todos")?;
        Ok(rows)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> anyhow::Result<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
               SET title = COALESCE($3, title),
                   description = COALESCE($4, description),
                   completed = COALESCE($5, completed),
                   updated_at = now()
             WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.completed)
        .fetch_optional(&self.db)
        .await
        .context("update todo")?;
        Ok(row)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
             WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.db)
        .await
        .context("delete todo")?;
        Ok(result.rows_affected() > 0)
    }
}
