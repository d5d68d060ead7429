//! Incident lifecycle operations against the public VictorOps API.
//!
//! This module covers the `v1/incidents` endpoint family:
//!
//! - [`list_incidents`] — currently open, acknowledged and recently
//!   resolved incidents.
//! - [`create_incident`] — open a new incident paged to users and/or
//!   escalation policies.
//! - [`reroute_incident`] — redirect an existing incident to new
//!   targets.
//! - [`ack`] / [`resolve`] — move incidents through their lifecycle
//!   phases. Both delegate to one shared state-transition helper.
//!
//! Response fields use `Option` (and empty `Vec`s) where the API may
//! omit them: absence means the server did not populate the field and
//! is preserved distinctly from a present-but-zero value.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{Surface, VoClient};
use crate::error::Result;

// ── Response types ─────────────────────────────────────────────────────

/// One state change within an incident's history.
///
/// Ordering inside [`Incident::transitions`] is server-determined and
/// preserved as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Name of the transition (e.g. `"triggered"`, `"acked"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// When the transition happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,

    /// Free-text message attached to the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The user who performed the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,

    /// Whether a human performed the transition (as opposed to an
    /// automated rule). Always emitted.
    #[serde(default)]
    pub manually: bool,

    /// Identifier of the alert that drove this transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,

    /// Portal URL of that alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_url: Option<String>,
}

/// A slug/name pair identifying a team or an escalation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugName {
    /// URL-safe identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Human-readable display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An escalation policy paged by an incident, with its owning team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedPolicy {
    /// The team the policy belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<SlugName>,
    /// The escalation policy itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<SlugName>,
}

/// A tracked incident as returned by the public API.
///
/// Fields are independently optional — an absent field was not
/// populated by the server, which is not the same as a field present
/// with a zero value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Number of alerts aggregated into this incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_count: Option<i64>,

    /// Lifecycle phase (e.g. `"UNACKED"`, `"ACKED"`, `"RESOLVED"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,

    /// Display name of the monitored entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_display_name: Option<String>,

    /// Identifier of the monitored entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Current state of the entity (e.g. `"CRITICAL"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_state: Option<String>,

    /// Type of the entity (e.g. `"SERVICE"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Host the incident originated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Incident number, the handle used by ack/resolve/reroute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<String>,

    /// Identifier of the most recent alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_alert_id: Option<String>,

    /// When the most recent alert arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_alert_time: Option<DateTime<Utc>>,

    /// Service the incident is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// When the incident started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    /// Slugs of teams paged for this incident.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paged_teams: Vec<String>,

    /// Usernames paged for this incident.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paged_users: Vec<String>,

    /// Escalation policies paged for this incident.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paged_policies: Vec<PagedPolicy>,

    /// State-change history, in server order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Transition>,
}

/// The server's answer to incident creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIncident {
    /// Number assigned to the new incident.
    #[serde(
        rename = "incidentNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,

    /// Server-reported error detail, if creation partially failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-incident outcome of an ack or resolve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStateResult {
    /// The incident the command applied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<String>,

    /// Entity identifier of that incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Whether the server accepted the state change.
    #[serde(default)]
    pub cmd_accepted: bool,

    /// Server-provided detail, e.g. why the command was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Raw response of [`reroute_incident`].
///
/// The reroute endpoint's response schema is not modeled; this type
/// wraps the text as received so discovering the schema later does not
/// change the operation's signature.
#[derive(Debug, Clone)]
pub struct RerouteResponse {
    raw: String,
}

impl RerouteResponse {
    /// The response body exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Collection wrapper for the incident listing endpoint.
#[derive(Debug, Deserialize)]
struct IncidentList {
    #[serde(default)]
    incidents: Vec<Incident>,
}

/// Collection wrapper for ack/resolve results.
#[derive(Debug, Deserialize)]
struct StateChangeResults {
    #[serde(default)]
    results: Vec<IncidentStateResult>,
}

// ── Request types ──────────────────────────────────────────────────────

/// A paging target: a user or an escalation policy.
///
/// The `kind` tag disambiguates the polymorphic reference; the slug is
/// the target's URL-safe identifier (a username for users).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// `"User"` or `"EscalationPolicy"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier of the user or policy.
    pub slug: String,
}

impl Target {
    /// Target a user by username.
    pub fn user(slug: &str) -> Self {
        Target {
            kind: "User".to_string(),
            slug: slug.to_string(),
        }
    }

    /// Target an escalation policy by slug.
    pub fn escalation_policy(slug: &str) -> Self {
        Target {
            kind: "EscalationPolicy".to_string(),
            slug: slug.to_string(),
        }
    }
}

/// One reroute directive: an incident and the targets it should be
/// redirected to. Sent in a batch under a single acting username.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reroute {
    /// The incident to redirect.
    pub incident_number: String,
    /// The new paging targets.
    pub targets: Vec<Target>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIncidentBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    summary: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    details: &'a str,
    user_name: &'a str,
    targets: &'a [Target],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RerouteBody<'a> {
    user_name: &'a str,
    reroutes: Vec<Reroute>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateChangeBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    message: &'a str,
    incident_names: &'a [&'a str],
    user_name: &'a str,
}

/// Lifecycle phase targeted by a state-change request. The phase name
/// is the final path segment of the PATCH endpoint.
#[derive(Debug, Clone, Copy)]
enum IncidentPhase {
    Ack,
    Resolve,
}

impl IncidentPhase {
    fn path_segment(self) -> &'static str {
        match self {
            IncidentPhase::Ack => "ack",
            IncidentPhase::Resolve => "resolve",
        }
    }
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves the currently open, acknowledged and recently resolved
/// incidents.
///
/// # Errors
///
/// - `VoError::Api` — non-200 status from the public API.
/// - `VoError::Parse` — the response was not the expected JSON shape.
/// - `VoError::Network` — transport-level failure.
pub async fn list_incidents(client: &VoClient) -> Result<Vec<Incident>> {
    let list: IncidentList = client
        .request_json::<_, ()>(Surface::Public, Method::GET, "v1/incidents", None)
        .await?;
    Ok(list.incidents)
}

/// Creates a new incident paged to the given targets.
///
/// The acting user is the client's account username. Empty `summary` or
/// `details` are omitted from the request body rather than sent as
/// empty strings.
///
/// # Errors
///
/// - `VoError::Api` — non-200 status (e.g. 400 for an unknown target
///   slug).
/// - `VoError::Parse` / `VoError::Network` — decode or transport
///   failure.
pub async fn create_incident(
    client: &VoClient,
    summary: &str,
    details: &str,
    targets: &[Target],
) -> Result<CreatedIncident> {
    let body = CreateIncidentBody {
        summary,
        details,
        user_name: &client.user,
        targets,
    };
    client
        .request_json(Surface::Public, Method::POST, "v1/incidents", Some(&body))
        .await
}

/// Redirects an existing incident to new paging targets.
///
/// The wire format accepts a batch of directives under one acting
/// username; this operation sends a batch of one, matching how the
/// endpoint is used here. The response schema is not modeled, so the
/// body is returned opaquely as [`RerouteResponse`].
///
/// # Errors
///
/// - `VoError::Api` — non-200 status.
/// - `VoError::Network` — transport-level failure.
pub async fn reroute_incident(
    client: &VoClient,
    incident_number: &str,
    targets: &[Target],
) -> Result<RerouteResponse> {
    let body = RerouteBody {
        user_name: &client.user,
        reroutes: vec![Reroute {
            incident_number: incident_number.to_string(),
            targets: targets.to_vec(),
        }],
    };
    let raw = client
        .request_text(
            Surface::Public,
            Method::POST,
            "v1/incidents/reroute",
            Some(&body),
        )
        .await?;
    Ok(RerouteResponse { raw })
}

/// Acknowledges one or more incidents with the given message.
///
/// Returns one [`IncidentStateResult`] per incident, in the order the
/// server returned them.
///
/// # Errors
///
/// - `VoError::Api` / `VoError::Parse` / `VoError::Network`.
pub async fn ack(
    client: &VoClient,
    message: &str,
    incident_names: &[&str],
) -> Result<Vec<IncidentStateResult>> {
    change_incidents(client, incident_names, message, IncidentPhase::Ack).await
}

/// Resolves one or more incidents with the given message.
///
/// Returns one [`IncidentStateResult`] per incident, in the order the
/// server returned them.
///
/// # Errors
///
/// - `VoError::Api` / `VoError::Parse` / `VoError::Network`.
pub async fn resolve(
    client: &VoClient,
    message: &str,
    incident_names: &[&str],
) -> Result<Vec<IncidentStateResult>> {
    change_incidents(client, incident_names, message, IncidentPhase::Resolve).await
}

/// Shared state-transition helper behind [`ack`] and [`resolve`]. Both
/// endpoints take the same body and answer with the same result shape;
/// only the final path segment differs.
async fn change_incidents(
    client: &VoClient,
    incident_names: &[&str],
    message: &str,
    phase: IncidentPhase,
) -> Result<Vec<IncidentStateResult>> {
    let body = StateChangeBody {
        message,
        incident_names,
        user_name: &client.user,
    };
    let path = format!("v1/incidents/{}", phase.path_segment());
    let result: StateChangeResults = client
        .request_json(Surface::Public, Method::PATCH, &path, Some(&body))
        .await?;
    Ok(result.results)
}
