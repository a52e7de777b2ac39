use axum::Router;
use axum::routing::{get, post, put};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{account, permission, role, transaction, user};
use super::openapi::api_docs;
use super::state::AppState;

/// 构建 API 路由
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route("/users", post(user::register_user).get(user::list_users))
        .route("/users/{user_id}", get(user::get_user))
        .route("/users/{user_id}/roles", post(user::assign_role))
        .route("/roles", post(role::create_role).get(role::list_roles))
        .route("/roles/search", get(role::find_role_by_name))
        .route("/roles/{role_id}", get(role::get_role).delete(role::delete_role))
        .route("/roles/{role_id}/permissions", put(role::define_permissions))
        .route(
            "/permissions",
            post(permission::create_permission).get(permission::list_permissions),
        )
        .route("/permissions/search", get(permission::find_permission_by_name))
        .route(
            "/permissions/{permission_id}",
            get(permission::get_permission).delete(permission::delete_permission),
        )
        .route(
            "/accounts",
            post(account::create_account).get(account::list_accounts_by_user),
        )
        .route(
            "/accounts/{account_id}",
            get(account::get_account).delete(account::delete_account),
        )
        .route("/transactions/deposits", post(transaction::record_deposit))
        .route("/transactions/payments", post(transaction::record_payment))
        .route("/transactions/history", get(transaction::transaction_history))
        .route("/transactions/balance", get(transaction::account_balance))
        .route("/v3/api-docs", get(api_docs))
        .with_state(state);

    let router = if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .include_headers(false)
                    .level(Level::DEBUG),
            )
            .on_request(DefaultOnRequest::new().level(Level::DEBUG))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Micros),
            ),
    )
}
