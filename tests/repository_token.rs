use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use storefront::domain::repositories::{TokenLookup, TokenRepository};
use storefront::error::ErrorKind;
use storefront::infrastructure::persistence::PgTokenRepository;

fn repo(pool: &PgPool) -> PgTokenRepository {
    PgTokenRepository::new(Arc::new(pool.clone()))
}

async fn column(pool: &PgPool, column: &str, id: i64) -> Option<DateTime<Utc>> {
    sqlx::query_scalar(&format!("SELECT {column} FROM api_tokens WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn test_back_office_token_lifecycle(pool: PgPool) {
    let repo = repo(&pool);

    let token = repo.create_token("Back office", "bo-hash").await.unwrap();
    assert_eq!(token.name, "Back office");
    assert_eq!(token.token_hash, "bo-hash");
    assert!(!token.is_revoked());
    assert!(token.last_used_at.is_none());

    let active = repo.find_active("bo-hash").await.unwrap().unwrap();
    assert_eq!(active.id, token.id);

    repo.update_last_used(token.id).await.unwrap();
    assert!(column(&pool, "last_used_at", token.id).await.is_some());

    repo.revoke_token(token.id).await.unwrap();
    assert!(column(&pool, "revoked_at", token.id).await.is_some());
    assert!(repo.find_active("bo-hash").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_unknown_hash_does_not_validate(pool: PgPool) {
    let repo = repo(&pool);
    repo.create_token("Support tools", "support-hash").await.unwrap();

    assert!(repo.find_active("someone-elses-hash").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_tokens_listed_oldest_first(pool: PgPool) {
    let repo = repo(&pool);

    for name in ["Warehouse", "Back office", "Support tools"] {
        repo.create_token(name, &format!("{name}-hash")).await.unwrap();
    }

    let names: Vec<_> = repo
        .list_tokens()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["Warehouse", "Back office", "Support tools"]);
}

#[sqlx::test]
async fn test_find_by_id_and_name(pool: PgPool) {
    let repo = repo(&pool);
    let created = repo.create_token("Warehouse", "wh-hash").await.unwrap();

    let by_id = repo.find(TokenLookup::Id(created.id)).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Warehouse");

    let by_name = repo.find(TokenLookup::parse(" Warehouse ")).await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);

    assert!(repo.find(TokenLookup::parse("Nobody")).await.unwrap().is_none());
    assert!(repo.find(TokenLookup::Id(created.id + 100)).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_second_revoke_is_not_found(pool: PgPool) {
    let repo = repo(&pool);
    let token = repo.create_token("Temp", "temp-hash").await.unwrap();

    repo.revoke_token(token.id).await.unwrap();
    let err = repo.revoke_token(token.id).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[sqlx::test]
async fn test_duplicate_name_conflicts(pool: PgPool) {
    let repo = repo(&pool);

    repo.create_token("Back office", "hash-a").await.unwrap();
    let err = repo.create_token("Back office", "hash-b").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.details()["field"], "name");
}

#[sqlx::test]
async fn test_revoked_token_usage_is_not_recorded(pool: PgPool) {
    let repo = repo(&pool);

    let token = repo.create_token("Retired", "retired-hash").await.unwrap();
    repo.revoke_token(token.id).await.unwrap();
    repo.update_last_used(token.id).await.unwrap();

    let found = repo.find(TokenLookup::Id(token.id)).await.unwrap().unwrap();
    assert!(found.last_used_at.is_none());
}
