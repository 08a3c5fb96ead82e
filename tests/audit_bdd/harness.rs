//! Mock GitHub payloads for the audit BDD tests.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a `GET` route answering with `status` and a JSON body.
pub(crate) async fn mount_get(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a GraphQL organisation listing holding the given repository nodes.
pub(crate) async fn mount_graphql_listing(server: &MockServer, nodes: Vec<Value>) {
    let total = nodes.len();
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "owner": {
                    "repositories": {
                        "totalCount": total,
                        "pageInfo": { "endCursor": "Y3Vyc29yOjI=", "hasNextPage": false },
                        "nodes": nodes
                    }
                }
            }
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// GraphQL node with collaborators, a deploy key and a stray branch.
pub(crate) fn noteworthy_graphql_repository(name: &str) -> Value {
    json!({
        "owner": { "login": "genuinetools" },
        "name": name,
        "mergeCommitAllowed": true,
        "squashMergeAllowed": true,
        "rebaseMergeAllowed": false,
        "refs": { "totalCount": 2, "nodes": [{ "name": "main" }, { "name": "feature/x" }] },
        "branchProtectionRules": { "totalCount": 1, "nodes": [{ "pattern": "main" }] },
        "deployKeys": {
            "totalCount": 1,
            "nodes": [{ "id": "MDk6UHVibGljS2V5MTIzNDU=", "title": "ci", "readOnly": true }]
        },
        "collaborators": {
            "totalCount": 2,
            "edges": [
                { "permission": "ADMIN", "node": { "login": "jessfraz" } },
                { "permission": "WRITE", "node": { "login": "octocat" } }
            ]
        }
    })
}

/// GraphQL node with a single collaborator and nothing else to report.
pub(crate) fn quiet_graphql_repository(name: &str) -> Value {
    json!({
        "owner": { "login": "genuinetools" },
        "name": name,
        "mergeCommitAllowed": true,
        "squashMergeAllowed": false,
        "rebaseMergeAllowed": false,
        "refs": { "totalCount": 0, "nodes": [] },
        "branchProtectionRules": { "totalCount": 0, "nodes": [] },
        "deployKeys": { "totalCount": 0, "nodes": [] },
        "collaborators": { "totalCount": 1, "edges": [
            { "permission": "ADMIN", "node": { "login": "jessfraz" } }
        ] }
    })
}

/// Repository shape returned by listings: no merge flags.
pub(crate) fn listed_repository(name: &str) -> Value {
    json!({ "name": name, "owner": { "login": "genuinetools" } })
}

/// Teams, hooks and the owners-team membership of `genuinetools/audit`.
pub(crate) async fn mount_audit_gates(server: &MockServer) {
    mount_get(
        server,
        "/repos/genuinetools/audit/teams",
        200,
        json!([
            { "id": 1, "slug": "owners", "name": "Owners", "permission": "admin" },
            { "id": 2, "slug": "readers", "name": "Readers", "permission": "pull" }
        ]),
    )
    .await;
    mount_get(
        server,
        "/repos/genuinetools/audit/hooks",
        200,
        json!([{
            "name": "web",
            "active": true,
            "url": "https://api.github.com/repos/genuinetools/audit/hooks/1",
            "config": { "url": "https://ci.example.com/hook" }
        }]),
    )
    .await;
    mount_get(
        server,
        "/orgs/genuinetools/teams/owners/memberships/jessfraz",
        200,
        json!({ "state": "active", "role": "member" }),
    )
    .await;
}

/// Collaborators, keys and branches of `genuinetools/audit` over REST.
pub(crate) async fn mount_audit_sections(server: &MockServer) {
    mount_get(
        server,
        "/repos/genuinetools/audit/collaborators",
        200,
        json!([
            { "login": "jessfraz", "permissions": { "admin": true, "push": true, "pull": true } },
            { "login": "octocat", "permissions": { "pull": true } }
        ]),
    )
    .await;
    mount_get(
        server,
        "/repos/genuinetools/audit/keys",
        404,
        json!({ "message": "Not Found" }),
    )
    .await;
    mount_get(server, "/repos/genuinetools/audit/branches", 200, json!([])).await;
}
