mod common;

use census_registry::features::auth::Role;
use census_registry::features::families::models::SubmissionChannel;
use census_registry::features::statistics::dtos::PageStatsQuery;
use census_registry::shared::constants::TARGET_PERSON_ROLE;
use sqlx::PgPool;

use common::{app, family, insert_user, root_person, TestApp};

async fn register(app: &TestApp, name: &str, dob: &str, city: &str, creator: Option<i64>) {
    let mut root = root_person("Inès", name, dob);
    root.city = city.to_string();
    let channel = if creator.is_some() {
        SubmissionChannel::Agent
    } else {
        SubmissionChannel::Public
    };

    app.services
        .families
        .create_family(family(name, root), None, creator, channel)
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn page_stats_buckets_members(pool: PgPool) {
    let app = app(pool.clone()).await;
    register(&app, "Obame", "1988-03-14", "Libreville", None).await;
    register(&app, "Ndong", "2001-07-02", "Port-Gentil", None).await;

    let stats = app
        .services
        .statistics
        .page_stats(&PageStatsQuery::default())
        .await
        .unwrap();

    assert_eq!(stats.total_families, 2);
    assert_eq!(stats.total_members, 2);
    assert_eq!(stats.genders.get("F"), Some(&2));
    assert_eq!(stats.provinces.get("Estuaire"), Some(&2));
    assert_eq!(stats.roles.get(TARGET_PERSON_ROLE), Some(&2));
    assert_eq!(stats.cities.get("Libreville"), Some(&1));
    assert_eq!(stats.cities.get("Port-Gentil"), Some(&1));
    assert_eq!(stats.birth_years.get("1988"), Some(&1));
    assert_eq!(stats.birth_years.get("2001"), Some(&1));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn year_filter_applies_to_members_only(pool: PgPool) {
    let app = app(pool.clone()).await;
    register(&app, "Obame", "1988-03-14", "Libreville", None).await;
    register(&app, "Ndong", "2001-07-02", "Port-Gentil", None).await;

    let stats = app
        .services
        .statistics
        .page_stats(&PageStatsQuery {
            year: Some(1988),
            since: Some(5),
        })
        .await
        .unwrap();

    assert_eq!(stats.total_families, 2);
    assert_eq!(stats.total_members, 1);
    assert_eq!(stats.cities.get("Libreville"), Some(&1));
    assert!(stats.cities.get("Port-Gentil").is_none());
    assert_eq!(stats.birth_years.len(), 1);
    assert_eq!(stats.year_filter, Some(1988));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn overview_and_agent_activity(pool: PgPool) {
    let app = app(pool.clone()).await;
    let busy = insert_user(&pool, "agent_busy", Role::FieldAgent, None).await;
    insert_user(&pool, "agent_idle", Role::FieldAgent, None).await;

    register(&app, "Obame", "1988-03-14", "Libreville", Some(busy.user_id)).await;
    register(&app, "Obame", "1988-03-14", "libreville", Some(busy.user_id)).await;
    register(&app, "Ndong", "2001-07-02", "Port-Gentil", None).await;

    let overview = app.services.statistics.overview(None).await.unwrap();
    assert_eq!(overview.total_users, 2);
    assert_eq!(overview.total_families, 3);
    assert_eq!(overview.total_members, 3);
    assert_eq!(overview.city, "Libreville");
    assert_eq!(overview.city_members, 2);
    assert_eq!(overview.duplicate_groups, 1);

    let elsewhere = app
        .services
        .statistics
        .overview(Some("  port-gentil "))
        .await
        .unwrap();
    assert_eq!(elsewhere.city, "port-gentil");
    assert_eq!(elsewhere.city_members, 1);

    let activity = app.services.statistics.agent_activity().await.unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].username, "agent_busy");
    assert_eq!(activity[0].families, 2);
    assert_eq!(activity[1].families, 0);
}
