//! Relationship resolution tests against a seeded in-memory SQLite database.

use super::test_support::{post, user, Member, Post, Profile, RecordingPool, Team, User, CORE_TEAM, IDLE_TEAM};
use super::*;
use crate::backends::{DatabaseValue, SqlDialect};
use crate::error::{ModelError, RelationshipError};
use crate::model::Model;
use crate::query::QueryBuilder;

fn ids(posts: &[Post]) -> Vec<i64> {
    let mut ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_accessors_return_construction_keys() {
    let alice = user(5, "alice");
    let first_post = post(1, Some(5));

    let belongs_to = BelongsTo::<Post, User>::new(QueryBuilder::for_model(), &first_post, "user_id", "id");
    assert_eq!(belongs_to.foreign_key(), "user_id");
    assert_eq!(belongs_to.owner_key(), "id");

    let has_one = HasOne::<User, Profile>::new(QueryBuilder::for_model(), &alice, "user_id", "id");
    assert_eq!(has_one.foreign_key(), "user_id");
    assert_eq!(has_one.local_key(), "id");

    let has_many = HasMany::<User, Post>::new(QueryBuilder::for_model(), &alice, "author_ref", "legacy_id");
    assert_eq!(has_many.foreign_key(), "author_ref");
    assert_eq!(has_many.local_key(), "legacy_id");
    assert_eq!(has_many.meta().related_table, "posts");
    assert_eq!(has_many.meta().relationship_type, RelationshipType::HasMany);
}

#[test]
fn test_model_constructors_default_keys() {
    let alice = user(5, "alice");
    let first_post = post(1, Some(5));

    let author = first_post.belongs_to::<User>("user_id");
    assert_eq!(author.owner_key(), "id");
    assert_eq!(author.query().table(), Some("users"));

    let posts = alice.has_many::<Post>("user_id");
    assert_eq!(posts.local_key(), "id");
    assert_eq!(posts.query().table(), Some("posts"));
}

#[test]
fn test_add_constraints_applies_once() {
    let alice = user(5, "alice");
    let mut posts = alice.has_many::<Post>("user_id");
    assert_eq!(posts.state(), RelationState::Created);
    assert!(posts.query().where_conditions().is_empty());

    posts.add_constraints();
    posts.add_constraints();

    assert_eq!(posts.state(), RelationState::Constrained);
    assert_eq!(posts.query().where_conditions().len(), 1);
    assert_eq!(posts.query().where_conditions()[0].column, "user_id");
    assert_eq!(posts.query().where_conditions()[0].value(), Some(&DatabaseValue::Int64(5)));
}

#[test]
fn test_pre_constrained_base_query_is_not_duplicated() {
    let alice = user(5, "alice");
    let base = QueryBuilder::<Profile>::for_model().where_eq("user_id", 5i64);
    let mut profile = HasOne::new(base, &alice, "user_id", "id");

    profile.add_constraints();

    assert_eq!(profile.query().where_conditions().len(), 1);
}

#[test]
fn test_belongs_to_constrains_owner_key() {
    let first_post = post(1, Some(5));
    let mut author = first_post.belongs_to::<User>("user_id");

    let (sql, params) = author.to_sql(SqlDialect::PostgreSQL).unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE id = $1");
    assert_eq!(params, vec![DatabaseValue::Int64(5)]);
}

#[test]
fn test_null_foreign_key_has_no_sql() {
    let orphan = post(4, None);
    let mut author = orphan.belongs_to::<User>("user_id");

    assert!(author.to_sql(SqlDialect::SQLite).is_none());
    assert_eq!(author.state(), RelationState::Constrained);
    assert!(author.query().where_conditions().is_empty());
}

#[tokio::test]
async fn test_has_many_returns_matching_posts() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");

    let posts = alice.has_many::<Post>("user_id").get_results(&pool).await.unwrap();

    assert_eq!(ids(&posts), vec![1, 2]);
    assert!(posts.iter().all(|p| p.user_id == Some(5)));
}

#[tokio::test]
async fn test_has_many_without_matches_is_empty() {
    let pool = RecordingPool::seeded().await;
    let carol = user(12, "carol");

    let posts = carol.has_many::<Post>("user_id").get_results(&pool).await.unwrap();

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_belongs_to_resolves_owner() {
    let pool = RecordingPool::seeded().await;
    let first_post = post(1, Some(5));

    let author = first_post.belongs_to::<User>("user_id").get_results(&pool).await.unwrap();

    assert_eq!(author, Some(User { id: Some(5), name: "alice".to_string(), referrer_id: None }));
}

#[tokio::test]
async fn test_belongs_to_missing_owner_is_none() {
    let pool = RecordingPool::seeded().await;
    let dangling = post(99, Some(404));

    let author = dangling.belongs_to::<User>("user_id").get_results(&pool).await.unwrap();

    assert_eq!(author, None);
}

#[tokio::test]
async fn test_belongs_to_null_foreign_key_skips_query() {
    let pool = RecordingPool::seeded().await;
    let orphan = post(4, None);

    let author = orphan.belongs_to::<User>("user_id").get_results(&pool).await.unwrap();

    assert_eq!(author, None);
    assert!(pool.statements().is_empty());
}

#[tokio::test]
async fn test_unsaved_parent_has_no_children() {
    let pool = RecordingPool::seeded().await;
    let draft = User { id: None, name: "draft".to_string(), referrer_id: None };

    let posts = draft.has_many::<Post>("user_id").get_results(&pool).await.unwrap();
    let profile = draft.has_one::<Profile>("user_id").get_results(&pool).await.unwrap();

    // post 4 has a NULL user_id and must not be matched
    assert!(posts.is_empty());
    assert_eq!(profile, None);
    assert!(pool.statements().is_empty());
}

#[tokio::test]
async fn test_has_one_is_first_of_has_many() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");

    let first = alice.has_one::<Post>("user_id").get_results(&pool).await.unwrap();
    let all = alice.has_many::<Post>("user_id").get_results(&pool).await.unwrap();

    assert_eq!(first.map(|p| p.id), Some(1));
    assert_eq!(all.first().map(|p| p.id), Some(1));
}

#[tokio::test]
async fn test_has_one_issues_single_constraint() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");
    let mut profile = alice.has_one::<Profile>("user_id");
    profile.add_constraints();

    let profile = profile.get_results(&pool).await.unwrap();

    assert_eq!(profile.map(|p| p.bio), Some("Writes about Rust".to_string()));
    assert_eq!(
        pool.statements(),
        vec!["SELECT * FROM profiles WHERE user_id = ? LIMIT 1".to_string()]
    );
}

#[tokio::test]
async fn test_constrain_adds_ordering() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");

    let posts = alice
        .has_many::<Post>("user_id")
        .constrain(|query| query.order_by_desc("id"))
        .get_results(&pool)
        .await
        .unwrap();

    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
}

#[tokio::test]
async fn test_count_and_exists() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");
    let carol = user(12, "carol");

    assert_eq!(alice.has_many::<Post>("user_id").count(&pool).await.unwrap(), 2);
    assert!(alice.has_many::<Post>("user_id").exists(&pool).await.unwrap());
    assert_eq!(carol.has_many::<Post>("user_id").count(&pool).await.unwrap(), 0);
    assert!(!carol.has_one::<Profile>("user_id").exists(&pool).await.unwrap());
}

#[tokio::test]
async fn test_self_referential_relations() {
    let pool = RecordingPool::seeded().await;
    let alice = User { id: Some(5), name: "alice".to_string(), referrer_id: None };
    let bob = User { id: Some(9), name: "bob".to_string(), referrer_id: Some(5) };

    let referrer = bob.belongs_to::<User>("referrer_id").get_results(&pool).await.unwrap();
    let referrals = alice
        .has_many::<User>("referrer_id")
        .constrain(|query| query.order_by("id"))
        .get_results(&pool)
        .await
        .unwrap();

    assert_eq!(referrer.and_then(|u| u.id), Some(5));
    assert_eq!(referrals.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(), vec!["bob", "carol"]);
}

#[tokio::test]
async fn test_unknown_column_surfaces_query_error() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");

    let result = alice.has_many::<Post>("author_id").get_results(&pool).await;

    assert!(matches!(result, Err(ModelError::Query(_))));
}

#[tokio::test]
async fn test_any_relation_dispatches_by_kind() {
    let pool = RecordingPool::seeded().await;
    let alice = user(5, "alice");
    let first_post = post(1, Some(5));

    let posts_meta = RelationshipMeta::new(RelationshipType::HasMany, "user_id", "id", "posts");
    let posts = alice.relation::<Post>(&posts_meta).unwrap();
    assert_eq!(posts.relationship_type(), RelationshipType::HasMany);
    let posts = posts.get_results(&pool).await.unwrap().into_many().unwrap();
    assert_eq!(ids(&posts), vec![1, 2]);

    let author_meta = RelationshipMeta::new(RelationshipType::BelongsTo, "user_id", "id", "users");
    let author = first_post.relation::<User>(&author_meta).unwrap().get_results(&pool).await.unwrap();
    assert_eq!(author.len(), 1);
    assert!(author.clone().into_many().is_err());
    assert_eq!(author.into_one().unwrap().map(|u| u.name), Some("alice".to_string()));
}

#[test]
fn test_any_relation_rejects_bad_metadata() {
    let alice = user(5, "alice");

    let empty_key = RelationshipMeta::new(RelationshipType::HasOne, "", "id", "profiles");
    assert!(matches!(
        alice.relation::<Profile>(&empty_key),
        Err(RelationshipError::InvalidConfiguration(_))
    ));

    let wrong_table = RelationshipMeta::new(RelationshipType::HasMany, "user_id", "id", "comments");
    assert!(matches!(
        alice.relation::<Post>(&wrong_table),
        Err(RelationshipError::TypeMismatch { .. })
    ));
}

#[test]
fn test_any_relation_from_concrete() {
    let alice = user(5, "alice");
    let mut relation: AnyRelation<'_, User, Post> = alice.has_many::<Post>("user_id").into();

    assert_eq!(relation.state(), RelationState::Created);
    relation.add_constraints();
    assert_eq!(relation.state(), RelationState::Constrained);

    let (sql, _) = relation.to_sql(SqlDialect::SQLite).unwrap();
    assert_eq!(sql, "SELECT * FROM posts WHERE user_id = ?");
}

#[test]
fn test_relation_results_into_vec() {
    let one: RelationResults<i64> = RelationResults::One(Some(3));
    let none: RelationResults<i64> = RelationResults::One(None);
    let many: RelationResults<i64> = RelationResults::Many(vec![1, 2]);

    assert_eq!(one.into_vec(), vec![3]);
    assert!(none.is_empty());
    assert_eq!(many.len(), 2);
}

#[test]
fn test_uuid_keys_bind_as_uuid() {
    let core = Team { id: CORE_TEAM, name: "core".to_string() };
    let (_, params) = core.has_many::<Member>("team_id").to_sql(SqlDialect::PostgreSQL).unwrap();
    assert_eq!(params, vec![DatabaseValue::Uuid(CORE_TEAM)]);

    let ana = Member { id: 1, team_id: Some(CORE_TEAM), name: "ana".to_string() };
    let (sql, params) = ana.belongs_to::<Team>("team_id").to_sql(SqlDialect::PostgreSQL).unwrap();
    assert_eq!(sql, "SELECT * FROM teams WHERE id = $1");
    assert_eq!(params, vec![DatabaseValue::Uuid(CORE_TEAM)]);
}

#[tokio::test]
async fn test_uuid_keyed_relations_resolve() {
    let pool = RecordingPool::seeded().await;
    let core = Team { id: CORE_TEAM, name: "core".to_string() };
    let idle = Team { id: IDLE_TEAM, name: "idle".to_string() };

    let members = core.has_many::<Member>("team_id").get_results(&pool).await.unwrap();
    let mut names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["ana", "ben"]);
    assert!(members.iter().all(|m| m.team_id == Some(CORE_TEAM)));

    assert!(idle.has_many::<Member>("team_id").get_results(&pool).await.unwrap().is_empty());

    let team = members[0].belongs_to::<Team>("team_id").get_results(&pool).await.unwrap();
    assert_eq!(team, Some(core));
}

#[tokio::test]
async fn test_missing_parent_column_resolves_to_nothing() {
    let pool = RecordingPool::seeded().await;
    let first_post = post(1, Some(5));
    assert!(!first_post.has_attribute("usr_id"));

    let mut author = first_post.belongs_to::<User>("usr_id");
    assert!(author.to_sql(SqlDialect::SQLite).is_none());

    let author = first_post.belongs_to::<User>("usr_id").get_results(&pool).await.unwrap();
    assert!(author.is_none());
    assert!(pool.statements().is_empty());
}
