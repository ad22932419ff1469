//! Fixtures shared by the relationship tests: models, a seeded in-memory
//! database and a pool that records every statement it runs.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backends::sqlite::SqlitePool;
use crate::backends::{DatabasePool, DatabasePoolStats, DatabaseRow, DatabaseValue, SqlDialect};
use crate::error::OrmResult;
use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub referrer_id: Option<i64>,
}

impl Model for User {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "users"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: String,
}

impl Model for Post {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "posts"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        Some(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
}

impl Model for Profile {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "profiles"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        Some(self.id)
    }
}

/// UUID-keyed parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
}

impl Model for Team {
    type PrimaryKey = Uuid;

    fn table_name() -> &'static str {
        "teams"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        Some(self.id)
    }
}

/// Holds a UUID foreign key, read back with its native type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub team_id: Option<Uuid>,
    pub name: String,
}

impl Model for Member {
    type PrimaryKey = i64;

    fn table_name() -> &'static str {
        "members"
    }

    fn primary_key(&self) -> Option<Self::PrimaryKey> {
        Some(self.id)
    }

    fn get_attribute(&self, column: &str) -> Option<DatabaseValue> {
        match column {
            "id" => Some(DatabaseValue::Int64(self.id)),
            "team_id" => self.team_id.map(DatabaseValue::Uuid),
            _ => self.serialized_attribute(column),
        }
    }
}

pub const CORE_TEAM: Uuid = Uuid::from_u128(0x6f1c8a4e_2b3d_4c5e_9f70_81a2b3c4d5e6);
pub const IDLE_TEAM: Uuid = Uuid::from_u128(0x0b7e91d2_55aa_4f10_8c3e_d4f5a6b7c8d9);

pub fn user(id: i64, name: &str) -> User {
    User { id: Some(id), name: name.to_string(), referrer_id: None }
}

pub fn post(id: i64, user_id: Option<i64>) -> Post {
    Post { id, user_id, title: format!("Post {}", id) }
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, referrer_id INTEGER NULL)",
    "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER NULL, title TEXT NOT NULL)",
    "CREATE TABLE profiles (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, bio TEXT NOT NULL)",
    "INSERT INTO users (id, name, referrer_id) VALUES (5, 'alice', NULL), (9, 'bob', 5), (12, 'carol', 5)",
    "INSERT INTO posts (id, user_id, title) VALUES (1, 5, 'Post 1'), (2, 5, 'Post 2'), (3, 9, 'Post 3'), (4, NULL, 'Post 4')",
    "INSERT INTO profiles (id, user_id, bio) VALUES (1, 5, 'Writes about Rust')",
    "CREATE TABLE teams (id TEXT PRIMARY KEY, name TEXT NOT NULL)",
    "CREATE TABLE members (id INTEGER PRIMARY KEY, team_id TEXT NULL, name TEXT NOT NULL)",
    "INSERT INTO teams (id, name) VALUES ('6f1c8a4e-2b3d-4c5e-9f70-81a2b3c4d5e6', 'core'), ('0b7e91d2-55aa-4f10-8c3e-d4f5a6b7c8d9', 'idle')",
    "INSERT INTO members (id, team_id, name) VALUES (1, '6f1c8a4e-2b3d-4c5e-9f70-81a2b3c4d5e6', 'ana'), (2, '6f1c8a4e-2b3d-4c5e-9f70-81a2b3c4d5e6', 'ben'), (3, NULL, 'cy')",
];

/// Pool over a seeded in-memory database that keeps the SQL it executed
pub struct RecordingPool {
    inner: SqlitePool,
    statements: Mutex<Vec<String>>,
}

impl RecordingPool {
    pub async fn seeded() -> Self {
        let inner = SqlitePool::in_memory().await.expect("in-memory sqlite");
        for statement in SCHEMA {
            inner.execute(statement, &[]).await.expect("seed statement");
        }
        Self {
            inner,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Statements issued since seeding
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().expect("statements lock").clone()
    }

    fn record(&self, sql: &str) {
        self.statements.lock().expect("statements lock").push(sql.to_string());
    }
}

#[async_trait]
impl DatabasePool for RecordingPool {
    async fn execute(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<u64> {
        self.record(sql);
        self.inner.execute(sql, params).await
    }

    async fn fetch_all(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Vec<Box<dyn DatabaseRow>>> {
        self.record(sql);
        self.inner.fetch_all(sql, params).await
    }

    async fn fetch_optional(&self, sql: &str, params: &[DatabaseValue]) -> OrmResult<Option<Box<dyn DatabaseRow>>> {
        self.record(sql);
        self.inner.fetch_optional(sql, params).await
    }

    fn sql_dialect(&self) -> SqlDialect {
        self.inner.sql_dialect()
    }

    async fn close(&self) -> OrmResult<()> {
        self.inner.close().await
    }

    fn stats(&self) -> DatabasePoolStats {
        self.inner.stats()
    }

    async fn health_check(&self) -> OrmResult<std::time::Duration> {
        self.inner.health_check().await
    }
}
