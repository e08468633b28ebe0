use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, InterruptHandle, OpenFlags, OptionalExtension, params};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{RoleResolver, StoreError};
use crate::context::RequestContext;
use crate::models::RoleRow;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Upper bound on waiting for a pooled connection. The checkout runs on a
/// blocking thread that cannot be interrupted, so it must always time out.
const MAX_CHECKOUT_WAIT: Duration = Duration::from_secs(5);

const TEAM_ROLE_SQL: &str =
    "SELECT role_code FROM team_member WHERE user_id = ?1 AND team_id = ?2";
const PROJECT_ROLE_SQL: &str =
    "SELECT role_code FROM project_member WHERE user_id = ?1 AND project_id = ?2";

/// Role resolver backed by an SQLite database owned by another service.
///
/// Connections are opened read-only. Queries run on the blocking pool and
/// are interrupted if the calling future is dropped mid-query.
#[derive(Clone)]
pub struct SqliteRoleResolver {
    pool: DbPool,
}

impl SqliteRoleResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn open_read_only(path: impl AsRef<Path>, pool_size: u32) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(path).with_flags(
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        );
        let pool = Pool::builder().max_size(pool_size).build(manager)?;
        Ok(Self::new(pool))
    }

    async fn lookup(
        &self,
        ctx: &RequestContext,
        sql: &'static str,
        user_id: Uuid,
        scope_id: Uuid,
    ) -> Result<RoleRow, StoreError> {
        let pool = self.pool.clone();
        let checkout = checkout_wait(ctx.remaining());
        let conn = tokio::task::spawn_blocking(move || pool.get_timeout(checkout)).await??;

        let interrupt = InterruptOnDrop::new(conn.get_interrupt_handle());
        let mut query = InterruptibleQuery {
            interrupt,
            task: tokio::task::spawn_blocking(move || {
                let row = query_role(&conn, sql, user_id, scope_id);
                (conn, row)
            }),
        };
        let (conn, row) = (&mut query.task).await?;
        query.interrupt.disarm();
        drop(conn);
        row
    }
}

#[async_trait]
impl RoleResolver for SqliteRoleResolver {
    async fn project_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<RoleRow, StoreError> {
        self.lookup(ctx, PROJECT_ROLE_SQL, user_id, project_id).await
    }

    async fn team_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        team_id: Uuid,
    ) -> Result<RoleRow, StoreError> {
        self.lookup(ctx, TEAM_ROLE_SQL, user_id, team_id).await
    }
}

fn checkout_wait(remaining: Option<Duration>) -> Duration {
    remaining.map_or(MAX_CHECKOUT_WAIT, |remaining| remaining.min(MAX_CHECKOUT_WAIT))
}

fn query_role(
    conn: &Connection,
    sql: &str,
    user_id: Uuid,
    scope_id: Uuid,
) -> Result<RoleRow, StoreError> {
    let role_code: Option<String> = conn
        .prepare_cached(sql)?
        .query_row(params![user_id.to_string(), scope_id.to_string()], |row| {
            row.get(0)
        })
        .optional()?;

    role_code
        .map(|role_code| RoleRow {
            user_id,
            scope_id,
            role_code,
        })
        .ok_or(StoreError::NotFound)
}

type QueryOutput = (r2d2::PooledConnection<SqliteConnectionManager>, Result<RoleRow, StoreError>);

/// A running query and the interrupt guard for its connection.
///
/// Fields drop in declaration order: the interrupt fires while the task
/// still owns the connection, and only then is the task output (and with it
/// the connection) released back to the pool.
struct InterruptibleQuery {
    interrupt: InterruptOnDrop,
    task: JoinHandle<QueryOutput>,
}

/// Interrupts the connection's running statement unless disarmed.
struct InterruptOnDrop(Option<InterruptHandle>);

impl InterruptOnDrop {
    fn new(handle: InterruptHandle) -> Self {
        Self(Some(handle))
    }

    fn disarm(&mut self) {
        self.0.take();
    }
}

impl Drop for InterruptOnDrop {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            tracing::debug!("role lookup dropped mid-query, interrupting statement");
            handle.interrupt();
        }
    }
}
