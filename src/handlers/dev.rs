use std::time::Duration;

use axum::{Json, extract::State, response::Html};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct OperationInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub requires_identity: bool,
}

const OPERATIONS: &[OperationInfo] = &[
    OperationInfo {
        method: "GET",
        path: "/me",
        description: "Identity established for this request",
        requires_identity: false,
    },
    OperationInfo {
        method: "GET",
        path: "/projects/{project_id}/role",
        description: "Caller's project-scoped role, if any",
        requires_identity: true,
    },
    OperationInfo {
        method: "POST",
        path: "/teams/{team_id}/admin-check",
        description: "Require organization or team admin",
        requires_identity: true,
    },
    OperationInfo {
        method: "POST",
        path: "/teams/admin-check",
        description: "Team admin check for several teams at once",
        requires_identity: true,
    },
];

#[derive(Debug, Serialize)]
pub struct IntrospectionResponse {
    pub operations: &'static [OperationInfo],
    pub request_timeout_ms: u64,
}

pub async fn introspection(State(state): State<AppState>) -> Json<IntrospectionResponse> {
    Json(IntrospectionResponse {
        operations: OPERATIONS,
        request_timeout_ms: duration_millis(state.config.request_timeout),
    })
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

const PLAYGROUND_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>rolegate playground</title></head>
<body>
<h1>rolegate playground</h1>
<p><label>Access token <input id="token" size="80"></label></p>
<p>
  <select id="method"><option>GET</option><option>POST</option></select>
  <input id="path" value="/me" size="60">
  <button id="send">Send</button>
</p>
<p><textarea id="body" rows="4" cols="80" placeholder='{"team_ids": []}'></textarea></p>
<pre id="out"></pre>
<script>
document.getElementById("send").onclick = async () => {
  const token = document.getElementById("token").value.trim();
  const method = document.getElementById("method").value;
  const body = document.getElementById("body").value.trim();
  const headers = { "Content-Type": "application/json" };
  if (token) headers["Authorization"] = "Bearer " + token;
  const res = await fetch(document.getElementById("path").value, {
    method, headers, body: method === "POST" && body ? body : undefined,
  });
  const text = await res.text();
  document.getElementById("out").textContent = res.status + "\n" + text;
};
</script>
</body>
</html>
"#;

pub async fn playground() -> Html<&'static str> {
    Html(PLAYGROUND_HTML)
}
