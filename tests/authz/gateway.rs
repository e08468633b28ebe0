use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use rolegate::config::GatewayMode;
use rolegate::identity::RestrictedMode;

use crate::common::*;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn me_reports_anonymous_caller() {
    let app = test_app(GatewayMode::Development, Arc::new(ScriptedResolver::new(Outcome::Missing)));
    let (status, json) = send(app, request("GET", "/me", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["authenticated"], false);
    assert!(json["user_id"].is_null());
    assert_eq!(json["restricted"], false);
}

#[tokio::test]
async fn me_reports_token_identity() {
    let app = test_app(GatewayMode::Development, Arc::new(ScriptedResolver::new(Outcome::Missing)));
    let user = Uuid::new_v4();
    let token = mint_token(&test_key(), user, Some("member"), Some(RestrictedMode::Install));

    let (status, json) = send(app, request("GET", "/me", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["authenticated"], true);
    assert_eq!(json["user_id"], user.to_string());
    assert_eq!(json["org_role"], "member");
    assert_eq!(json["restricted_mode"], "install");
    assert_eq!(json["restricted"], true);
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let app = test_app(GatewayMode::Development, Arc::new(ScriptedResolver::new(Outcome::Missing)));
    let (status, json) = send(app, request("GET", "/me", Some("not.a.token"), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["errors"][0]["message"], "invalid access token");
}

#[tokio::test]
async fn team_admin_check_admits_team_admin() {
    let team = Uuid::new_v4();
    let resolver = ScriptedResolver::new(Outcome::Missing).with_scope(team, Outcome::Role("admin"));
    let app = test_app(GatewayMode::Production, Arc::new(resolver));
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("member"), None);

    let uri = format!("/teams/{team}/admin-check");
    let (status, _) = send(app, request("POST", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn team_admin_denial_keeps_wire_code() {
    let app = test_app(GatewayMode::Production, Arc::new(ScriptedResolver::new(Outcome::Role("member"))));
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("member"), None);

    let uri = format!("/teams/{}/admin-check", Uuid::new_v4());
    let (status, json) = send(app, request("POST", &uri, Some(&token), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        json,
        json!({
            "errors": [{
                "message": "organization or team admin role required",
                "extensions": { "code": "2-400" }
            }]
        })
    );
}

#[tokio::test]
async fn store_failure_is_not_shown_as_denial() {
    let app = test_app(
        GatewayMode::Production,
        Arc::new(ScriptedResolver::new(Outcome::Failure("connection refused"))),
    );
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("member"), None);

    let uri = format!("/teams/{}/admin-check", Uuid::new_v4());
    let (status, json) = send(app, request("POST", &uri, Some(&token), None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["errors"][0]["extensions"].is_null());
}

#[tokio::test]
async fn anonymous_team_check_is_unauthenticated() {
    let resolver = Arc::new(ScriptedResolver::new(Outcome::Role("admin")));
    let app = test_app(GatewayMode::Production, resolver.clone());

    let uri = format!("/teams/{}/admin-check", Uuid::new_v4());
    let (status, _) = send(app, request("POST", &uri, None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn token_without_org_role_is_internal_error() {
    let resolver = Arc::new(ScriptedResolver::new(Outcome::Role("admin")));
    let app = test_app(GatewayMode::Production, resolver.clone());
    let token = mint_token(&test_key(), Uuid::new_v4(), None, None);

    let uri = format!("/teams/{}/admin-check", Uuid::new_v4());
    let (status, _) = send(app, request("POST", &uri, Some(&token), None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn project_role_endpoint() {
    let project = Uuid::new_v4();
    let resolver = ScriptedResolver::new(Outcome::Missing).with_scope(project, Outcome::Role("admin"));
    let app = test_app(GatewayMode::Production, Arc::new(resolver));
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("observer"), None);

    let uri = format!("/projects/{project}/role");
    let (status, json) = send(app.clone(), request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["role"], "admin");

    let uri = format!("/projects/{}/role", Uuid::new_v4());
    let (status, json) = send(app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["role"].is_null());
}

#[tokio::test]
async fn batch_check_reports_per_team() {
    let (allowed, denied) = (Uuid::new_v4(), Uuid::new_v4());
    let resolver = ScriptedResolver::new(Outcome::Missing).with_scope(allowed, Outcome::Role("admin"));
    let app = test_app(GatewayMode::Production, Arc::new(resolver));
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("member"), None);

    let body = json!({ "team_ids": [allowed, denied] });
    let (status, json) = send(app, request("POST", "/teams/admin-check", Some(&token), Some(body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["permitted"], true);
    assert!(json["results"][0]["error"].is_null());
    assert_eq!(json["results"][1]["permitted"], false);
    assert_eq!(json["results"][1]["error"]["extensions"]["code"], "2-400");
}

#[tokio::test]
async fn production_limits_batch_complexity() {
    let resolver = Arc::new(ScriptedResolver::new(Outcome::Role("admin")));
    let app = test_app(GatewayMode::Production, resolver.clone());
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("member"), None);

    let team_ids: Vec<Uuid> = (0..11).map(|_| Uuid::new_v4()).collect();
    let body = json!({ "team_ids": team_ids });
    let (status, _) = send(app, request("POST", "/teams/admin-check", Some(&token), Some(body))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn development_has_no_complexity_limit() {
    let app = test_app(GatewayMode::Development, Arc::new(ScriptedResolver::new(Outcome::Role("admin"))));
    let token = mint_token(&test_key(), Uuid::new_v4(), Some("member"), None);

    let team_ids: Vec<Uuid> = (0..25).map(|_| Uuid::new_v4()).collect();
    let body = json!({ "team_ids": team_ids });
    let (status, json) = send(app, request("POST", "/teams/admin-check", Some(&token), Some(body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"].as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn introspection_only_in_development() {
    let resolver = Arc::new(ScriptedResolver::new(Outcome::Missing));

    let dev = test_app(GatewayMode::Development, resolver.clone());
    let (status, json) = send(dev.clone(), request("GET", "/introspection", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["operations"].as_array().unwrap().len() >= 4);

    let response = dev.oneshot(request("GET", "/playground", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let prod = test_app(GatewayMode::Production, resolver);
    let (status, _) = send(prod.clone(), request("GET", "/introspection", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(prod, request("GET", "/playground", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
