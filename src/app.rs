//! Service graph and API router, shared by the server binary and tests.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use sqlx::PgPool;

use crate::core::middleware;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, TokenService};
use crate::features::duplicates::{routes as duplicates_routes, DuplicateService};
use crate::features::families::{routes as families_routes, FamilyService};
use crate::features::statistics::{routes as statistics_routes, StatisticsService};
use crate::features::sync::{routes as sync_routes, SyncService};
use crate::features::users::{routes as users_routes, UserService};
use crate::features::zones::{routes as zones_routes, ZoneService};
use crate::modules::storage::PhotoStore;

/// Every service the API needs, constructed once at startup
#[derive(Clone)]
pub struct AppServices {
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub families: Arc<FamilyService>,
    pub duplicates: Arc<DuplicateService>,
    pub sync: Arc<SyncService>,
    pub zones: Arc<ZoneService>,
    pub statistics: Arc<StatisticsService>,
}

impl AppServices {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>, photos: Arc<dyn PhotoStore>) -> Self {
        let duplicates = Arc::new(DuplicateService::new(pool.clone()));

        Self {
            auth: Arc::new(AuthService::new(pool.clone(), Arc::clone(&tokens))),
            users: Arc::new(UserService::new(pool.clone())),
            families: Arc::new(FamilyService::new(pool.clone(), photos)),
            sync: Arc::new(SyncService::new(pool.clone())),
            zones: Arc::new(ZoneService::new(pool.clone())),
            statistics: Arc::new(StatisticsService::new(pool, Arc::clone(&duplicates))),
            duplicates,
            tokens,
        }
    }
}

async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Public and bearer-protected API routes, without swagger or HTTP layers
pub fn api_router(services: &AppServices, max_body_size: usize) -> Router {
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(users_routes::routes(Arc::clone(&services.users)))
        .merge(families_routes::routes(Arc::clone(&services.families)))
        .merge(duplicates_routes::routes(Arc::clone(&services.duplicates)))
        .merge(sync_routes::routes(Arc::clone(&services.sync)))
        .merge(zones_routes::routes(Arc::clone(&services.zones)))
        .merge(statistics_routes::routes(Arc::clone(&services.statistics)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.tokens),
            middleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .merge(users_routes::public_routes(Arc::clone(&services.users)))
        .merge(families_routes::public_routes(Arc::clone(
            &services.families,
        )))
        .route("/health", axum::routing::get(health_check));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(max_body_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::modules::storage::LocalPhotoStore;
    use crate::shared::test_helpers::{lazy_pool, test_token_service, test_user};
    use axum::http::StatusCode;
    use axum_test::multipart::MultipartForm;
    use axum_test::TestServer;
    use serde_json::json;

    struct Harness {
        server: TestServer,
        tokens: Arc<TokenService>,
        _uploads: tempfile::TempDir,
    }

    impl Harness {
        async fn new() -> Self {
            let uploads = tempfile::tempdir().unwrap();
            let photos = LocalPhotoStore::new(uploads.path().to_path_buf())
                .await
                .unwrap();
            let tokens = Arc::new(test_token_service());
            let services = AppServices::new(lazy_pool(), Arc::clone(&tokens), Arc::new(photos));

            Self {
                server: TestServer::new(api_router(&services, 1024 * 1024)).unwrap(),
                tokens,
                _uploads: uploads,
            }
        }

        fn bearer(&self, role: Role) -> String {
            self.tokens
                .issue(&test_user(role, Some(1)))
                .unwrap()
                .access_token
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let h = Harness::new().await;
        h.server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer() {
        let h = Harness::new().await;

        for path in [
            "/api/auth/me",
            "/api/families",
            "/api/sync/pending",
            "/api/zones",
            "/api/stats",
            "/api/duplicates",
        ] {
            h.server
                .get(path)
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }

        h.server
            .get("/api/families")
            .authorization_bearer("not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_echoes_token_identity() {
        let h = Harness::new().await;
        let response = h
            .server
            .get("/api/auth/me")
            .authorization_bearer(h.bearer(Role::FieldAgent))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["username"], "field_agent_tester");
        assert_eq!(body["data"]["role"], "field_agent");
    }

    #[tokio::test]
    async fn test_field_agent_cannot_reach_supervisor_endpoints() {
        let h = Harness::new().await;
        let token = h.bearer(Role::FieldAgent);

        h.server
            .get("/api/duplicates")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        h.server
            .post("/api/zones")
            .authorization_bearer(&token)
            .json(&json!({"user_id": 1, "geometry": {"type": "Polygon"}}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        h.server
            .post("/api/users")
            .authorization_bearer(&token)
            .json(&json!({"username": "new_agent", "password": "long-enough", "role": "field_agent"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        h.server
            .get("/api/stats/overview")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_rejected_before_storage() {
        let h = Harness::new().await;
        let token = h.bearer(Role::SuperUser);

        h.server
            .post("/api/zones")
            .authorization_bearer(&token)
            .json(&json!({"user_id": 1, "geometry": "POLYGON"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        h.server
            .post("/api/duplicates/resolve")
            .authorization_bearer(&token)
            .json(&json!({"first_name": " ", "last_name": "Mba", "date_of_birth": null}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        h.server
            .post("/api/families/offline")
            .authorization_bearer(&token)
            .json(&json!({"name": "Famille Mba"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_range_query_parameters_are_rejected() {
        let h = Harness::new().await;
        let token = h.bearer(Role::FieldAgent);

        for (key, value) in [
            ("since", "-5"),
            ("since", "-2147483648"),
            ("since", "151"),
            ("year", "-1990"),
            ("since", "not-a-number"),
        ] {
            let response = h
                .server
                .get("/api/stats")
                .authorization_bearer(&token)
                .add_query_param(key, value)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: serde_json::Value = response.json();
            assert_eq!(body["success"], false, "{}={}", key, value);
        }

        h.server
            .get("/api/families")
            .authorization_bearer(&token)
            .add_query_param("page", "99999999999999999999")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_intake_rejects_incomplete_form() {
        let h = Harness::new().await;
        let form = MultipartForm::new()
            .add_text("name", "Famille Obiang")
            .add_text("first_name", "Marie");

        h.server
            .post("/api/public/families")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_zone_import_requires_file_part() {
        let h = Harness::new().await;
        let form = MultipartForm::new().add_text("note", "no file here");

        h.server
            .post("/api/zones/import")
            .authorization_bearer(h.bearer(Role::SuperUser))
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
