//! Relation SQL Benchmarks
//!
//! Measures constraint application and SQL generation for each relation kind

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elif_relations::{HasRelations, Model, Relation, RelationshipMeta, RelationshipType, SqlDialect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: Option<i64>,
    name: String,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Post {
    id: i64,
    user_id: Option<i64>,
    title: String,
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

fn bench_constraint_sql(c: &mut Criterion) {
    let user = User { id: Some(42), name: "bench".to_string() };
    let post = Post { id: 7, user_id: Some(42), title: "bench".to_string() };
    let mut group = c.benchmark_group("constraint_sql");

    for dialect in [SqlDialect::PostgreSQL, SqlDialect::SQLite] {
        group.bench_with_input(BenchmarkId::new("belongs_to", format!("{:?}", dialect)), &dialect, |b, &dialect| {
            b.iter(|| black_box(post.belongs_to::<User>("user_id").to_sql(dialect)))
        });

        group.bench_with_input(BenchmarkId::new("has_one", format!("{:?}", dialect)), &dialect, |b, &dialect| {
            b.iter(|| black_box(user.has_one::<Post>("user_id").to_sql(dialect)))
        });

        group.bench_with_input(BenchmarkId::new("has_many", format!("{:?}", dialect)), &dialect, |b, &dialect| {
            b.iter(|| {
                let mut relation = user
                    .has_many::<Post>("user_id")
                    .constrain(|query| query.order_by_desc("id").limit(20));
                black_box(relation.to_sql(dialect))
            })
        });
    }

    group.finish();
}

fn bench_relation_from_meta(c: &mut Criterion) {
    let user = User { id: Some(42), name: "bench".to_string() };
    let meta = RelationshipMeta::new(RelationshipType::HasMany, "user_id", "id", "posts");

    c.bench_function("relation_from_meta", |b| {
        b.iter(|| {
            let relation = user.relation::<Post>(black_box(&meta));
            black_box(relation.map(|mut r| r.to_sql(SqlDialect::PostgreSQL)))
        })
    });
}

criterion_group!(benches, bench_constraint_sql, bench_relation_from_meta);
criterion_main!(benches);
