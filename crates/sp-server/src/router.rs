//! Router configuration and request handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use sp_auth::SyncResult;
use sp_directory::{ConnectionParams, DirectoryClient};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::dto::{
    AuthResponse, CreateDirectoryConfigRequest, CreateRoleMappingRequest, DirectoryConfigResponse,
    LoginRequest, ProfileResponse, RefreshRequest, RefreshResponse, RoleMappingResponse,
    SyncRequest, TestConfigResponse, UpdateDirectoryConfigRequest, UserResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let auth = Router::new()
        .route("/auth/login", post(login_admin))
        .route("/auth/login/ldap", post(login_ldap))
        .route("/auth/refresh", post(refresh))
        .route("/auth/profile", get(profile));

    let admin = Router::new()
        .route("/admin/directory-configs", get(list_configs))
        .route("/admin/directory-configs", post(create_config))
        .route("/admin/directory-configs/{id}", get(get_config))
        .route("/admin/directory-configs/{id}", put(update_config))
        .route("/admin/directory-configs/{id}", delete(delete_config))
        .route("/admin/directory-configs/{id}/test", post(test_config))
        .route("/admin/roles", get(list_roles))
        .route("/admin/role-mappings", get(list_mappings))
        .route("/admin/role-mappings", post(create_mapping))
        .route("/admin/role-mappings/{id}", delete(delete_mapping))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}/audit", get(list_user_audit))
        .route("/admin/sync", post(run_sync));

    let health = Router::new().route("/health", get(health_check));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(auth)
        .merge(admin)
        .merge(health)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Builds the CORS layer from the configured origin list. A `*` entry
/// (or no valid origin at all) allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();
    if parsed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(parsed)
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health - Liveness probe
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Authentication Handlers
// ============================================================================

/// POST /auth/login - Local admin login
async fn login_admin(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let success = state.auth.login_admin(&request.username, &request.password)?;
    Ok(Json(AuthResponse::from(success)))
}

/// POST /auth/login/ldap - Directory login
async fn login_ldap(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let success = state
        .auth
        .login_directory(
            &request.username,
            &request.password,
            request.directory_configuration_id,
        )
        .await?;
    Ok(Json(AuthResponse::from(success)))
}

/// POST /auth/refresh - Exchange a refresh token for a fresh access token
async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let pair = state.auth.refresh(&request.refresh_token)?;
    Ok(Json(RefreshResponse::from(pair)))
}

/// GET /auth/profile - Identity carried by the presented access token
async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ProfileResponse>> {
    let token = bearer_token(&headers)?;
    let claims = state.auth.verify_access(token)?;

    // The cache holds the role set from the most recent login or sync,
    // which may be fresher than the one baked into the token
    let roles = claims
        .sub
        .parse::<Uuid>()
        .ok()
        .and_then(|id| state.auth.cached_roles(id))
        .unwrap_or(claims.roles);

    Ok(Json(ProfileResponse {
        user_id: claims.sub,
        username: claims.username,
        email: claims.email,
        roles,
    }))
}

/// Extracts the token from an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)
}

// ============================================================================
// Directory Configuration Handlers
// ============================================================================

/// GET /admin/directory-configs - List all directory configurations
async fn list_configs(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DirectoryConfigResponse>>> {
    let configs = state.providers.configs.list().await?;
    let responses = configs
        .into_iter()
        .map(DirectoryConfigResponse::from)
        .collect();
    Ok(Json(responses))
}

/// POST /admin/directory-configs - Create a directory configuration
async fn create_config(
    State(state): State<AppState>,
    Json(request): Json<CreateDirectoryConfigRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.name.is_empty() {
        return Err(ApiError::Validation(
            "Configuration name cannot be empty".to_string(),
        ));
    }
    if request.host.is_empty() {
        return Err(ApiError::Validation("Host cannot be empty".to_string()));
    }

    let config = request.into_config();
    let name = config.name.clone();
    let id = config.id;

    state.providers.configs.create(&config).await.map_err(|e| {
        if e.is_duplicate() {
            ApiError::conflict("DirectoryConfig", "name", &name)
        } else {
            ApiError::from(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        [("Location", format!("/admin/directory-configs/{id}"))],
        Json(DirectoryConfigResponse::from(config)),
    ))
}

/// GET /admin/directory-configs/{id} - Get a directory configuration
async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DirectoryConfigResponse>> {
    let config = state
        .providers
        .configs
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found_id("DirectoryConfig", id))?;
    Ok(Json(DirectoryConfigResponse::from(config)))
}

/// PUT /admin/directory-configs/{id} - Update a directory configuration
async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDirectoryConfigRequest>,
) -> ApiResult<Json<DirectoryConfigResponse>> {
    let mut config = state
        .providers
        .configs
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found_id("DirectoryConfig", id))?;

    request.apply_to(&mut config);
    state.providers.configs.update(&config).await?;

    Ok(Json(DirectoryConfigResponse::from(config)))
}

/// DELETE /admin/directory-configs/{id} - Delete a directory configuration
async fn delete_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.providers.configs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/directory-configs/{id}/test - Validate a configuration
/// and try one bind against the directory
async fn test_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TestConfigResponse>> {
    let config = state
        .providers
        .configs
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found_id("DirectoryConfig", id))?;

    if !config.is_active {
        return Ok(Json(TestConfigResponse {
            success: false,
            message: "Configuration is inactive".to_string(),
        }));
    }

    // Covers completeness and, with TLS on, certificate readability
    let params = match ConnectionParams::from_config(config) {
        Ok(params) => params,
        Err(e) => {
            return Ok(Json(TestConfigResponse {
                success: false,
                message: e.to_string(),
            }));
        }
    };

    match DirectoryClient::new(params).test_connection().await {
        Ok(()) => Ok(Json(TestConfigResponse {
            success: true,
            message: "Connection and bind succeeded".to_string(),
        })),
        Err(e) => {
            tracing::warn!(config_id = %id, error = %e, "directory configuration test failed");
            Ok(Json(TestConfigResponse {
                success: false,
                message: "Connection test failed".to_string(),
            }))
        }
    }
}

// ============================================================================
// Role Mapping Handlers
// ============================================================================

/// GET /admin/roles - List roles available as mapping targets
async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<Vec<sp_model::Role>>> {
    let roles = state.providers.roles.list().await?;
    Ok(Json(roles))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingListParams {
    /// Restricts the listing to one configuration (wildcard mappings
    /// included).
    directory_configuration_id: Option<Uuid>,
}

/// GET /admin/role-mappings - List group-to-role mappings
async fn list_mappings(
    State(state): State<AppState>,
    Query(params): Query<MappingListParams>,
) -> ApiResult<Json<Vec<RoleMappingResponse>>> {
    let mappings = match params.directory_configuration_id {
        Some(config_id) => state
            .providers
            .mappings
            .list_for_config(config_id)
            .await?
            .into_iter()
            .map(|(mapping, _)| mapping)
            .collect(),
        None => state.providers.mappings.list().await?,
    };
    let responses = mappings.into_iter().map(RoleMappingResponse::from).collect();
    Ok(Json(responses))
}

/// POST /admin/role-mappings - Create a group-to-role mapping
async fn create_mapping(
    State(state): State<AppState>,
    Json(request): Json<CreateRoleMappingRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.group_dn.is_empty() {
        return Err(ApiError::Validation(
            "Group DN cannot be empty".to_string(),
        ));
    }

    let role_id = request.role_id;
    state
        .providers
        .roles
        .get_by_id(role_id)
        .await?
        .ok_or_else(|| ApiError::not_found_id("Role", role_id))?;

    let mapping = request.into_mapping();
    let id = mapping.id;
    state.providers.mappings.create(&mapping).await?;

    // Cached role sets may predate the new mapping
    state.auth.role_cache().clear();

    Ok((
        StatusCode::CREATED,
        [("Location", format!("/admin/role-mappings/{id}"))],
        Json(RoleMappingResponse::from(mapping)),
    ))
}

/// DELETE /admin/role-mappings/{id} - Delete a group-to-role mapping
async fn delete_mapping(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.providers.mappings.delete(id).await?;
    state.auth.role_cache().clear();
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// User and Synchronization Handlers
// ============================================================================

/// GET /admin/users - List users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.providers.users.list().await?;
    let responses = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(responses))
}

/// GET /admin/users/{id}/audit - Audit trail for a user, newest first
async fn list_user_audit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<sp_model::AuditEvent>>> {
    let events = state.providers.audit.list_for_entity("user", id).await?;
    Ok(Json(events))
}

/// POST /admin/sync - Run one bulk synchronization pass
async fn run_sync(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> ApiResult<Json<SyncResult>> {
    let result = state
        .synchronizer
        .sync(request.directory_configuration_id)
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc.def.ghi".parse().unwrap(),
        );
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn cors_layer_accepts_explicit_origins() {
        let origins = vec![
            "https://portal.example.com".to_string(),
            "http://localhost:3000".to_string(),
        ];
        let layer = cors_layer(&origins);
        assert!(format!("{layer:?}").contains("portal.example.com"));
    }

    #[test]
    fn cors_layer_wildcard_and_unparseable_degrade_to_any() {
        let wildcard = cors_layer(&["*".to_string()]);
        let garbage = cors_layer(&["not an origin\u{7f}".to_string()]);
        assert_eq!(format!("{wildcard:?}"), format!("{garbage:?}"));
    }

    #[test]
    fn bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic dXNlcjpwYXNz".parse().unwrap(),
        );
        assert!(bearer_token(&headers).is_err());
    }
}
