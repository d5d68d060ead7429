//! Integration tests for the team-schedule endpoint using wiremock.
//!
//! The schedule snapshot lives on the portal surface, so these tests
//! verify HTTP Basic credentials alongside response decoding for:
//!
//! - GET /v2/team/{team}/oncall/schedule — team_schedules

use victorops::client::VoClient;
use victorops::error::VoError;
use victorops::oncall::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: creates a client pointed at the given wiremock server for
/// both surfaces. Username "alice" with password "s3cret" must arrive
/// as the Basic credential below.
fn mock_client(server: &MockServer) -> VoClient {
    VoClient::new("alice", "id-123", "key-456", "s3cret")
        .with_base_urls(&server.uri(), &server.uri())
}

/// base64("alice:s3cret"), the expected Basic authorization value.
const BASIC_ALICE: &str = "Basic YWxpY2U6czNjcmV0";

// ── team_schedules ─────────────────────────────────────────────────────

#[tokio::test]
async fn team_schedules_uses_basic_auth() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/v2/team/ops/oncall/schedule"))
        .and(header("Authorization", BASIC_ALICE))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "schedules": [{
                "team": {"name": "Ops", "slug": "ops"},
                "schedule": [{
                    "onCallUser": {"username": "alice"},
                    "rotationName": "primary",
                    "onCallType": "rotation",
                    "rolls": [{
                        "start": "2026-02-02T09:00:00Z",
                        "end": "2026-02-09T09:00:00Z",
                        "isRoll": true,
                        "onCallUser": {"username": "alice"}
                    }]
                }],
                "overrides": [{
                    "origOnCallUser": {"username": "alice"},
                    "overrideOnCallUser": {"username": "bob"},
                    "start": "2026-02-03T08:00:00Z",
                    "end": "2026-02-03T18:00:00Z"
                }]
            }]
        })))
        .mount(&server)
        .await;

    let schedules = team_schedules(&client, "ops").await.unwrap();

    assert_eq!(schedules.len(), 1);
    let block = &schedules[0];
    assert_eq!(
        block.team.as_ref().and_then(|t| t.slug.as_deref()),
        Some("ops")
    );
    assert_eq!(block.schedule[0].rotation_name.as_deref(), Some("primary"));
    assert!(block.schedule[0].rolls[0].is_roll);
    assert_eq!(
        block.overrides[0]
            .override_on_call_user
            .as_ref()
            .and_then(|u| u.username.as_deref()),
        Some("bob")
    );
}

#[tokio::test]
async fn team_schedules_interpolates_team_slug() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/v2/team/platform/oncall/schedule"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"schedules": []})),
        )
        .mount(&server)
        .await;

    let schedules = team_schedules(&client, "platform").await.unwrap();
    assert!(schedules.is_empty(), "should handle empty schedule list");
}

#[tokio::test]
async fn team_schedules_unknown_team_is_an_api_error() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/v2/team/ghosts/oncall/schedule"))
        .respond_with(ResponseTemplate::new(404).set_body_string("team ghosts not found"))
        .mount(&server)
        .await;

    let err = team_schedules(&client, "ghosts").await.unwrap_err();
    match err {
        VoError::Api { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "team ghosts not found");
        }
        other => panic!("expected Api error, got: {other}"),
    }
}

#[tokio::test]
async fn team_schedules_malformed_json_is_a_parse_error() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/v2/team/ops/oncall/schedule"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = team_schedules(&client, "ops").await.unwrap_err();
    assert!(
        matches!(err, VoError::Parse(_)),
        "expected Parse error, got: {err}"
    );
}
