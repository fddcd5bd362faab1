#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use census_registry::app::AppServices;
use census_registry::core::config::AuthConfig;
use census_registry::features::auth::{AuthenticatedUser, Role, TokenService};
use census_registry::features::families::dtos::{CreateFamilyDto, RootPersonDto};
use census_registry::modules::storage::LocalPhotoStore;
use sqlx::PgPool;
use tempfile::TempDir;

pub struct TestApp {
    pub services: AppServices,
    pub uploads: TempDir,
}

pub async fn app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let photos = LocalPhotoStore::new(uploads.path().to_path_buf())
        .await
        .unwrap();
    let tokens = Arc::new(TokenService::new(&AuthConfig {
        jwt_secret: "integration-secret-at-least-32-characters".to_string(),
        issuer: "census-registry-test".to_string(),
        token_ttl: Duration::from_secs(600),
        jwt_leeway: Duration::from_secs(0),
    }));

    TestApp {
        services: AppServices::new(pool, tokens, Arc::new(photos)),
        uploads,
    }
}

/// Insert a user row directly and return its identity
pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    role: Role,
    province_id: Option<i64>,
) -> AuthenticatedUser {
    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, password_hash, role, province_id) VALUES ($1, 'x', $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(role.as_str())
    .bind(province_id)
    .fetch_one(pool)
    .await
    .unwrap();

    AuthenticatedUser {
        user_id,
        username: username.to_string(),
        role,
        province_id,
    }
}

pub async fn insert_province(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO provinces (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn root_person(first_name: &str, last_name: &str, date_of_birth: &str) -> RootPersonDto {
    RootPersonDto {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth: date_of_birth.to_string(),
        gender: "F".to_string(),
        nationality: "Gabonaise".to_string(),
        id_type: "CNI".to_string(),
        id_number: "GA-0001".to_string(),
        place_of_birth: "Franceville".to_string(),
        province: "Estuaire".to_string(),
        city: "Libreville".to_string(),
        district: "Akébé".to_string(),
    }
}

pub fn family(name: &str, root: RootPersonDto) -> CreateFamilyDto {
    CreateFamilyDto {
        name: name.to_string(),
        root,
        latitude: Some(0.39),
        longitude: Some(9.45),
        fill_duration: Some(12),
        photo: None,
    }
}
