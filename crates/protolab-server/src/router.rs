use crate::api::{login, prototypes, users};
use crate::auth;
use crate::config::ServerConfig;
use axum::{
    Extension, Json, Router,
    http::{Method, header},
    routing::{get, post},
};
use protolab_core::AppCore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "protolab is working!".to_string(),
    })
}

pub fn build_router(core: Arc<AppCore>, config: Arc<ServerConfig>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/login/access-token", post(login::access_token))
        .route("/api/users/signup", post(users::signup))
        .route("/api/users/me", get(users::me))
        .route(
            "/api/prototypes",
            get(prototypes::list).post(prototypes::create),
        )
        .route("/api/prototypes/public", get(prototypes::list_public))
        .route("/api/prototypes/public/{id}", get(prototypes::get_public))
        .route(
            "/api/prototypes/{id}",
            get(prototypes::get)
                .put(prototypes::update)
                .delete(prototypes::delete),
        )
        .route(
            "/api/prototypes/{id}/collaborators",
            get(prototypes::list_collaborators).post(prototypes::add_collaborator),
        )
        .route(
            "/api/prototypes/{id}/collaborators/{user_id}",
            axum::routing::put(prototypes::update_collaborator)
                .delete(prototypes::remove_collaborator),
        )
        .layer(cors)
        .layer(Extension(core.clone()))
        .layer(Extension(config.clone()));

    // Outermost layer: runs before the Extension layers above, so the
    // middleware takes its state by value instead of from extensions.
    let jwt_secret = config.jwt_secret.clone();
    app = app.layer(axum::middleware::from_fn(move |req, next| {
        let core = core.clone();
        let jwt_secret = jwt_secret.clone();
        async move { auth::require_auth(req, next, core, jwt_secret).await }
    }));

    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tokens;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
    };
    use protolab_core::models::User;
    use tower::ServiceExt;

    fn test_config() -> Arc<ServerConfig> {
        Arc::new(ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            db_path: String::new(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        })
    }

    fn test_core(dir: &tempfile::TempDir) -> Arc<AppCore> {
        let db_path = dir.path().join("protolab.redb");
        Arc::new(AppCore::new(db_path.to_str().unwrap()).unwrap())
    }

    #[tokio::test]
    async fn protected_route_requires_token() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let app = build_router(test_core(&dir), test_config());

        let request = HttpRequest::builder()
            .uri("/api/users/me")
            .body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = HttpRequest::builder()
            .uri("/api/users/me")
            .header("Authorization", "Bearer not-a-token")
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let core = test_core(&dir);
        let config = test_config();

        let user = User::new("alice@example.com".to_string(), None, "hash".to_string());
        assert!(core.storage.users.create(&user)?);
        let token = tokens::issue_token(user.id, &config.jwt_secret, config.token_ttl_hours)?;

        let app = build_router(core, config);
        let request = HttpRequest::builder()
            .uri("/api/users/me")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn public_prototype_surface_skips_auth() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let app = build_router(test_core(&dir), test_config());

        let request = HttpRequest::builder()
            .uri("/api/prototypes/public")
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);

        Ok(())
    }
}
