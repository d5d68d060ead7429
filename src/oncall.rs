//! On-call schedules and override management.
//!
//! This module spans both API surfaces:
//!
//! - [`team_schedules`] — a team's on-call schedule snapshot from the
//!   portal (`v2/team/{team}/oncall/schedule`).
//! - [`create_override`] / [`list_overrides`] /
//!   [`configure_override`] — time-bounded on-call substitutions on the
//!   portal (`v2/org/{org}/overrides`).
//!
//! The two surfaces encode instants differently: schedule payloads use
//! RFC 3339 strings, while portal override listings use epoch
//! milliseconds, decoded through [`UnixTimestamp`]. Override creation
//! sends wall-clock strings with a fixed `+0000` suffix — see
//! [`create_override`] for that format's quirks.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{Surface, VoClient};
use crate::error::Result;
use crate::incidents::SlugName;
use crate::timestamp::UnixTimestamp;

/// Time layout for override creation: local wall-clock time with
/// millisecond precision and a literal `+0000` suffix, regardless of
/// the actual zone offset. The suffix is literal text on the wire, not
/// an offset; the real zone travels in the separate `timezone` field.
const OVERRIDE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f+0000";

// ── Schedule types ─────────────────────────────────────────────────────

/// A reference to a user by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    /// The referenced username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// One rotation entry of a team's schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// The regularly scheduled on-call user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_call_user: Option<UserRef>,

    /// The user currently substituted in by an override, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_on_call_user: Option<UserRef>,

    /// Name of the rotation this entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_name: Option<String>,

    /// How the on-call duty is assigned (e.g. `"rotation"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_call_type: Option<String>,

    /// Name of the shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_name: Option<String>,

    /// When the shift rolls over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_roll: Option<String>,

    /// Sub-intervals of the shift rotation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rolls: Vec<Roll>,
}

/// An active override as reported inside a schedule snapshot. Instants
/// on this surface are RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverride {
    /// The user who would normally be on call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_on_call_user: Option<UserRef>,

    /// The substituting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_on_call_user: Option<UserRef>,

    /// Start of the override window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    /// End of the override window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// A sub-interval of a shift rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roll {
    /// Start of the interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    /// Whether this interval is an actual hand-off.
    #[serde(default)]
    pub is_roll: bool,

    /// End of the interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,

    /// The user on call during this interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_call_user: Option<UserRef>,
}

/// A team's on-call schedule snapshot: rotation entries plus any active
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamScheduleBlock {
    /// The team this snapshot belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<SlugName>,

    /// Per-rotation schedule entries, in server order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<Schedule>,

    /// Currently active overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ScheduleOverride>,
}

/// Collection wrapper for the team-schedule endpoint.
#[derive(Debug, Deserialize)]
struct TeamScheduleList {
    #[serde(default)]
    schedules: Vec<TeamScheduleBlock>,
}

// ── Portal override types ──────────────────────────────────────────────

/// A reference to a user with display names, as the portal reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    /// The referenced username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Links an override to the team/policy/user triple it affects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Portal identifier of the assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The substituting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PersonRef>,

    /// The affected team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<SlugName>,

    /// The affected escalation policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<SlugName>,
}

/// An override as the portal lists it. Instants on this surface are
/// epoch-millisecond integers ([`UnixTimestamp`]), unlike the RFC 3339
/// strings in [`ScheduleOverride`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalOverride {
    /// Portal identifier, used by [`configure_override`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The user being substituted in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PersonRef>,

    /// Start of the override window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<UnixTimestamp>,

    /// End of the override window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<UnixTimestamp>,

    /// IANA name of the zone the window was created in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// The team/policy/user triples this override applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<Assignment>,
}

/// The portal's override listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalOverrides {
    /// All overrides known to the organization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<PortalOverride>,
}

// ── Request types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateOverrideBody<'a> {
    start: String,
    end: String,
    timezone: &'a str,
    username: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigureOverrideBody<'a> {
    policy_slug: &'a str,
    username: &'a str,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves the given team's on-call schedule snapshot from the
/// portal.
///
/// # Errors
///
/// - `VoError::Api` — non-200 status (e.g. 404 for an unknown team
///   slug).
/// - `VoError::Parse` / `VoError::Network` — decode or transport
///   failure.
pub async fn team_schedules(client: &VoClient, team: &str) -> Result<Vec<TeamScheduleBlock>> {
    let path = format!("v2/team/{team}/oncall/schedule");
    let list: TeamScheduleList = client
        .request_json::<_, ()>(Surface::Private, Method::GET, &path, None)
        .await?;
    Ok(list.schedules)
}

/// Creates an on-call override substituting `username` for the window
/// `start`..`end`.
///
/// The window bounds are sent as wall-clock strings in their own zone
/// with a literal `+0000` suffix, and the start zone's IANA name
/// travels in the `timezone` field — the portal resolves the wall
/// times against that zone, not against the suffix.
///
/// Creation is idempotent: if the portal rejects the window because a
/// "conflicting" override already covers it, that rejection is treated
/// as success ([`VoError::is_conflicting_override`]).
///
/// # Errors
///
/// - `VoError::Api` — non-200 status other than the conflict case.
/// - `VoError::Parse` — the success response was not valid JSON.
/// - `VoError::Network` — transport-level failure.
pub async fn create_override(
    client: &VoClient,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    username: &str,
) -> Result<()> {
    let body = CreateOverrideBody {
        start: start.format(OVERRIDE_TIME_FORMAT).to_string(),
        end: end.format(OVERRIDE_TIME_FORMAT).to_string(),
        timezone: start.timezone().name(),
        username,
    };
    let path = format!("v2/org/{}/overrides", client.org);
    match client
        .request_text(Surface::Private, Method::POST, &path, Some(&body))
        .await
    {
        Ok(raw) => {
            // The response carries no information the caller needs;
            // it is validated as JSON and discarded.
            serde_json::from_str::<serde_json::Value>(&raw)?;
            Ok(())
        }
        Err(err) if err.is_conflicting_override() => Ok(()),
        Err(err) => Err(err),
    }
}

/// Retrieves all overrides of the configured organization.
///
/// # Errors
///
/// - `VoError::Api` / `VoError::Parse` / `VoError::Network`.
pub async fn list_overrides(client: &VoClient) -> Result<Vec<PortalOverride>> {
    let path = format!("v2/org/{}/overrides", client.org);
    let list: PortalOverrides = client
        .request_json::<_, ()>(Surface::Private, Method::GET, &path, None)
        .await?;
    Ok(list.overrides)
}

/// Attaches an existing override to an escalation policy for the given
/// user, activating the substitution.
///
/// Only success or failure is observable; the response body is
/// validated as JSON and discarded.
///
/// # Errors
///
/// - `VoError::Api` — non-200 status (e.g. 404 for an unknown override
///   id).
/// - `VoError::Parse` — the success response was not valid JSON.
/// - `VoError::Network` — transport-level failure.
pub async fn configure_override(
    client: &VoClient,
    override_id: i64,
    policy_slug: &str,
    username: &str,
) -> Result<()> {
    let body = ConfigureOverrideBody {
        policy_slug,
        username,
    };
    let path = format!("v2/org/{}/overrides/{}", client.org, override_id);
    let raw = client
        .request_text(Surface::Private, Method::PUT, &path, Some(&body))
        .await?;
    serde_json::from_str::<serde_json::Value>(&raw)?;
    Ok(())
}
