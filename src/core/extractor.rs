//! Request extractors that reject with the `ApiResponse` envelope instead of
//! axum's plain-text bodies.

use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON body extractor. Malformed bodies become `400` envelopes.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(json_rejection)
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected a request with Content-Type: application/json".to_string()
        }
        _ => "Failed to parse JSON body".to_string(),
    };
    AppError::BadRequest(message)
}

/// Query-string extractor. Out-of-range numbers (e.g. `?page=` beyond `i64`)
/// and other type mismatches become `400` envelopes.
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
            })
    }
}

/// The bearer identity `auth_middleware` resolved for this request.
/// Only reachable on routes behind that middleware; elsewhere it yields `401`.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Window {
        page: i64,
    }

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn server() -> TestServer {
        let router = Router::new()
            .route(
                "/window",
                get(|AppQuery(w): AppQuery<Window>| async move { w.page.to_string() }),
            )
            .route(
                "/named",
                post(|AppJson(n): AppJson<Named>| async move { n.name }),
            );
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_query_overflow_is_bad_request_envelope() {
        let server = server();

        let response = server
            .get("/window")
            .add_query_param("page", "99999999999999999999999")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);

        server
            .get("/window")
            .add_query_param("page", "3")
            .await
            .assert_text("3");
    }

    #[tokio::test]
    async fn test_json_rejections_use_envelope() {
        let server = server();

        let response = server.post("/named").json(&json!({"name": 7})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);

        server
            .post("/named")
            .json(&json!({"name": "Famille Ella"}))
            .await
            .assert_text("Famille Ella");
    }

    #[tokio::test]
    async fn test_identity_missing_outside_auth_middleware() {
        let router = Router::new().route(
            "/me",
            get(|user: AuthenticatedUser| async move { user.username }),
        );
        TestServer::new(router)
            .unwrap()
            .get("/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
