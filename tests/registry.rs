mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use census_registry::core::error::AppError;
use census_registry::features::auth::Role;
use census_registry::features::families::dtos::{
    CreateMemberDto, UpdateFamilyDto, UpdateMemberDto,
};
use census_registry::features::families::models::{PhotoUpload, SubmissionChannel};
use census_registry::features::families::FamilyService;
use census_registry::modules::storage::PhotoStore;
use census_registry::shared::constants::TARGET_PERSON_ROLE;
use census_registry::shared::types::PaginationQuery;
use sqlx::PgPool;

use common::{app, family, insert_user, root_person};

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn agent_intake_creates_matching_target_person(pool: PgPool) {
    let app = app(pool.clone()).await;
    let agent = insert_user(&pool, "agent_01", Role::FieldAgent, None).await;

    let created = app
        .services
        .families
        .create_family(
            family("Famille Nzé", root_person("Awa", "Nzé", "1988-03-14")),
            None,
            Some(agent.user_id),
            SubmissionChannel::Agent,
        )
        .await
        .unwrap();

    assert!(created.family.is_validated);
    assert!(!created.family.is_synced);
    assert_eq!(created.family.created_by_id, Some(agent.user_id));

    let targets: Vec<_> = created
        .members
        .iter()
        .filter(|m| m.role.as_deref() == Some(TARGET_PERSON_ROLE))
        .collect();
    assert_eq!(targets.len(), 1);

    let member = targets[0];
    let snapshot = &created.family;
    assert_eq!(Some(member.first_name.clone()), snapshot.first_name);
    assert_eq!(Some(member.last_name.clone()), snapshot.last_name);
    assert_eq!(member.date_of_birth, snapshot.date_of_birth);
    assert_eq!(member.gender, snapshot.gender);
    assert_eq!(member.nationality, snapshot.nationality);
    assert_eq!(member.id_type, snapshot.id_type);
    assert_eq!(member.id_number, snapshot.id_number);
    assert_eq!(member.place_of_birth, snapshot.place_of_birth);
    assert_eq!(member.province, snapshot.province);
    assert_eq!(member.city, snapshot.city);
    assert_eq!(member.district, snapshot.district);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn public_intake_is_unvalidated_and_unsynced(pool: PgPool) {
    let app = app(pool).await;

    let created = app
        .services
        .families
        .create_family(
            family("Famille Obiang", root_person("Marie", "Obiang", "1975-07-02")),
            None,
            None,
            SubmissionChannel::Public,
        )
        .await
        .unwrap();

    assert!(!created.family.is_validated);
    assert!(!created.family.is_synced);
    assert_eq!(created.family.created_by_id, None);
    assert_eq!(created.members.len(), 1);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn photo_is_stored_under_generated_name(pool: PgPool) {
    let app = app(pool).await;
    let photo = PhotoUpload::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap();

    let created = app
        .services
        .families
        .create_family(
            family("Famille Photo", root_person("Paul", "Ella", "2001-01-01")),
            Some(photo),
            None,
            SubmissionChannel::Public,
        )
        .await
        .unwrap();

    let stored = created.family.photo_path.expect("photo path");
    let prefix = format!("family_{}_", created.family.id);
    assert!(stored.contains(&prefix), "{}", stored);
    assert!(stored.ends_with(".jpg"), "{}", stored);
}

/// Records how many families existed while the upload was running
struct ObservingStore {
    pool: PgPool,
    fail: bool,
    families_during_upload: Mutex<Option<i64>>,
}

#[async_trait]
impl PhotoStore for ObservingStore {
    async fn save(&self, _data: Vec<u8>, name: &str, _content_type: &str) -> Result<String, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM families")
            .fetch_one(&self.pool)
            .await
            .unwrap();
        *self.families_during_upload.lock().unwrap() = Some(count);

        if self.fail {
            Err(AppError::Storage("bucket unreachable".to_string()))
        } else {
            Ok(format!("uploads/{}", name))
        }
    }

    async fn delete(&self, _stored_path: &str) -> Result<(), AppError> {
        Ok(())
    }
}

fn observing_service(pool: &PgPool, fail: bool) -> (FamilyService, Arc<ObservingStore>) {
    let store = Arc::new(ObservingStore {
        pool: pool.clone(),
        fail,
        families_during_upload: Mutex::new(None),
    });
    let service = FamilyService::new(pool.clone(), store.clone());
    (service, store)
}

fn jpeg() -> PhotoUpload {
    PhotoUpload::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap()
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn photo_upload_happens_before_family_rows_exist(pool: PgPool) {
    let (service, store) = observing_service(&pool, false);

    let created = service
        .create_family(
            family("Famille Ordre", root_person("Lise", "Ondo", "1999-09-09")),
            Some(jpeg()),
            None,
            SubmissionChannel::Public,
        )
        .await
        .unwrap();

    assert_eq!(*store.families_during_upload.lock().unwrap(), Some(0));
    let stored = created.family.photo_path.unwrap();
    assert!(stored.starts_with(&format!("uploads/family_{}_", created.family.id)));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn failed_photo_upload_writes_nothing(pool: PgPool) {
    let (service, _store) = observing_service(&pool, true);

    let result = service
        .create_family(
            family("Famille Perdue", root_person("Lise", "Ondo", "1999-09-09")),
            Some(jpeg()),
            None,
            SubmissionChannel::Public,
        )
        .await;
    assert!(matches!(result, Err(AppError::Storage(_))));

    let families: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM families")
        .fetch_one(&pool)
        .await
        .unwrap();
    let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((families, members), (0, 0));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn listing_past_the_last_page_is_empty(pool: PgPool) {
    let app = app(pool).await;
    app.services
        .families
        .create_family(
            family("Famille Seule", root_person("Paul", "Ella", "2001-01-01")),
            None,
            None,
            SubmissionChannel::Public,
        )
        .await
        .unwrap();

    let (page, total) = app
        .services
        .families
        .list_families(&PaginationQuery {
            page: i64::MAX,
            page_size: 20,
        })
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(total, 1);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn deleting_family_cascades_but_deleting_member_does_not(pool: PgPool) {
    let app = app(pool.clone()).await;
    let families = &app.services.families;

    let created = families
        .create_family(
            family("Famille Mba", root_person("Jean", "Mba", "1990-01-01")),
            None,
            None,
            SubmissionChannel::Public,
        )
        .await
        .unwrap();
    let family_id = created.family.id;

    let child = families
        .add_member(
            family_id,
            CreateMemberDto {
                first_name: "Léa".to_string(),
                last_name: "Mba".to_string(),
                role: Some("child".to_string()),
                date_of_birth: Some("2015-06-01".to_string()),
                gender: None,
                nationality: None,
                id_type: None,
                id_number: None,
                place_of_birth: None,
                province: None,
                city: None,
                district: None,
            },
        )
        .await
        .unwrap();

    families.delete_member(family_id, child.id).await.unwrap();
    let detail = families.get_family(family_id).await.unwrap();
    assert_eq!(detail.members.len(), 1);

    families.delete_family(family_id).await.unwrap();
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE family_id = $1")
        .bind(family_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    assert!(matches!(
        families.get_family(family_id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        families.delete_family(family_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn add_member_to_unknown_family_is_not_found(pool: PgPool) {
    let app = app(pool).await;

    let result = app
        .services
        .families
        .add_member(
            9_999,
            CreateMemberDto {
                first_name: "Ghost".to_string(),
                last_name: "Nobody".to_string(),
                role: None,
                date_of_birth: None,
                gender: None,
                nationality: None,
                id_type: None,
                id_number: None,
                place_of_birth: None,
                province: None,
                city: None,
                district: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL database (set DATABASE_URL)"]
async fn updates_merge_present_fields_only(pool: PgPool) {
    let app = app(pool).await;
    let families = &app.services.families;

    let created = families
        .create_family(
            family("Famille Ndong", root_person("Eric", "Ndong", "1980-02-02")),
            None,
            None,
            SubmissionChannel::Public,
        )
        .await
        .unwrap();
    let family_id = created.family.id;
    let member_id = created.members[0].id;

    let updated = families
        .update_family(
            family_id,
            UpdateFamilyDto {
                city: Some("Port-Gentil".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.city.as_deref(), Some("Port-Gentil"));
    assert_eq!(updated.name, "Famille Ndong");
    assert_eq!(updated.district.as_deref(), Some("Akébé"));

    let member = families
        .update_member(
            family_id,
            member_id,
            UpdateMemberDto {
                gender: Some("M".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(member.gender.as_deref(), Some("M"));
    assert_eq!(member.first_name, "Eric");
    assert_eq!(member.date_of_birth.as_deref(), Some("1980-02-02"));

    let mismatch = families
        .update_member(family_id + 1, member_id, UpdateMemberDto::default())
        .await;
    assert!(matches!(mismatch, Err(AppError::NotFound(_))));
}
