mod common;

use census_registry::features::duplicates::dtos::ResolveGroupDto;
use sqlx::PgPool;

use common::app;

async fn insert_family(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO families (name) VALUES ('Famille Test') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_member(pool: &PgPool, family_id: i64, first: &str, last: &str, dob: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO members (family_id, first_name, last_name, date_of_birth) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(family_id)
    .bind(first)
    .bind(last)
    .bind(dob)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn grouping_is_case_insensitive_but_date_exact(pool: PgPool) {
    let app = app(pool.clone()).await;
    let family_id = insert_family(&pool).await;

    let first = insert_member(&pool, family_id, "Jean", "Mba", "1990-01-01").await;
    let second = insert_member(&pool, family_id, "jean", "MBA", "1990-01-01").await;
    insert_member(&pool, family_id, "Jean", "Mba", "1990-1-1").await;

    let groups = app.services.duplicates.find_duplicate_groups().await.unwrap();
    assert_eq!(groups.len(), 1);

    let group = &groups[0];
    assert_eq!(group.count, 2);
    assert_eq!(group.first_name, "jean");
    assert_eq!(group.last_name, "mba");
    let ids: Vec<i64> = group.members.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first, second]);

    assert_eq!(
        app.services
            .duplicates
            .count_duplicate_groups()
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn resolve_group_keeps_earliest(pool: PgPool) {
    let app = app(pool.clone()).await;
    let family_id = insert_family(&pool).await;

    let earliest = insert_member(&pool, family_id, "Jean", "Mba", "1990-01-01").await;
    insert_member(&pool, family_id, "JEAN", "mba", "1990-01-01").await;
    insert_member(&pool, family_id, "jean", "Mba", "1990-01-01").await;

    let outcome = app
        .services
        .duplicates
        .resolve_group(ResolveGroupDto {
            first_name: "jean".to_string(),
            last_name: "mba".to_string(),
            date_of_birth: Some("1990-01-01".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(outcome.kept_member_id, Some(earliest));
    assert_eq!(outcome.deleted, 2);

    let left: Vec<i64> = sqlx::query_scalar("SELECT id FROM members")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(left, vec![earliest]);

    // Nothing left to resolve
    let again = app
        .services
        .duplicates
        .resolve_group(ResolveGroupDto {
            first_name: "jean".to_string(),
            last_name: "mba".to_string(),
            date_of_birth: Some("1990-01-01".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(again.deleted, 0);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn resolve_single_is_idempotent(pool: PgPool) {
    let app = app(pool.clone()).await;
    let family_id = insert_family(&pool).await;
    let member = insert_member(&pool, family_id, "Awa", "Nzé", "1988-03-14").await;

    let duplicates = &app.services.duplicates;
    assert_eq!(duplicates.resolve_single(member).await.unwrap(), 1);
    assert_eq!(duplicates.resolve_single(member).await.unwrap(), 0);

    let family_left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM families WHERE id = $1")
        .bind(family_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(family_left, 1);
}
