//! Lead desk API handlers.
//!
//! ```text
//! POST /api/v1/leads/public {"name":"Ada","email":"ada@example.com","courseInterest":"Rust"}
//! GET /api/v1/leads/unclaimed?limit=20&offset=0
//! POST /api/v1/leads/{id}/claim
//! GET /api/v1/leads/mine?limit=20&offset=0
//! ```
//!
//! Only the public submission route is open; everything else requires a staff
//! session.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest, parse_leading_integer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ClaimOutcome;
use crate::domain::{Error, Lead, LeadDraft, LeadId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Public enquiry body for `POST /api/v1/leads/public`.
///
/// Missing text fields deserialise as empty strings so they surface as field
/// violations rather than a parse failure.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLeadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub course_interest: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<SubmitLeadRequest> for LeadDraft {
    fn from(value: SubmitLeadRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            course_interest: value.course_interest,
            message: value.message,
        }
    }
}

/// Lead representation returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course_interest: String,
    pub message: Option<String>,
    #[schema(format = "uuid")]
    pub claimed_by: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id().get(),
            name: lead.name().to_owned(),
            email: lead.email().to_owned(),
            course_interest: lead.course_interest().to_owned(),
            message: lead.message().map(str::to_owned),
            claimed_by: lead.claimed_by().map(ToString::to_string),
            is_public: lead.is_public(),
            created_at: lead.created_at(),
            updated_at: lead.updated_at(),
        }
    }
}

/// One page of leads.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPageResponse {
    pub leads: Vec<LeadResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

impl From<Page<Lead>> for LeadPageResponse {
    fn from(page: Page<Lead>) -> Self {
        let total = page.total();
        let limit = page.limit();
        let offset = page.offset();
        let has_more = page.has_more();
        Self {
            leads: page.into_items().into_iter().map(LeadResponse::from).collect(),
            total,
            limit,
            offset,
            has_more,
        }
    }
}

/// Raw paging parameters. Values are read leniently and never rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size; values below 1 are raised to 1, absent means 50.
    pub limit: Option<String>,
    /// Rows to skip; negative values become 0.
    pub offset: Option<String>,
}

impl PageQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.limit.as_deref(), self.offset.as_deref())
    }
}

fn parse_lead_id(raw: &str) -> Result<LeadId, Error> {
    parse_leading_integer(raw)
        .and_then(|value| LeadId::new(value).ok())
        .ok_or_else(|| {
            debug!(raw, "rejected lead id");
            Error::invalid_request("Enquiry ID must be a positive number")
        })
}

/// Submit a public enquiry.
#[utoipa::path(
    post,
    path = "/api/v1/leads/public",
    request_body = SubmitLeadRequest,
    responses(
        (status = 201, description = "Lead recorded", body = LeadResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Lead storage unavailable", body = Error)
    ),
    tags = ["leads"],
    operation_id = "submitLead",
    security([])
)]
#[post("/leads/public")]
pub async fn submit_lead(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitLeadRequest>,
) -> ApiResult<HttpResponse> {
    let lead = state
        .lead_submissions
        .submit(LeadDraft::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(LeadResponse::from(lead)))
}

/// List public, unclaimed leads newest first.
#[utoipa::path(
    get,
    path = "/api/v1/leads/unclaimed",
    params(PageQuery),
    responses(
        (status = 200, description = "Unclaimed leads", body = LeadPageResponse),
        (status = 401, description = "Login required or user not found", body = Error),
        (status = 503, description = "Lead storage unavailable", body = Error)
    ),
    tags = ["leads"],
    operation_id = "listUnclaimedLeads"
)]
#[get("/leads/unclaimed")]
pub async fn list_unclaimed_leads(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<LeadPageResponse>> {
    session.require_user(state.user_profiles.as_ref()).await?;
    let page = state.lead_queries.list_unclaimed(query.page_request()).await?;
    Ok(web::Json(LeadPageResponse::from(page)))
}

/// Claim a lead for the signed-in staff member.
#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/claim",
    params(("id" = String, Path, description = "Lead identifier")),
    responses(
        (status = 200, description = "Lead claimed", body = LeadResponse),
        (status = 400, description = "Malformed lead id or unknown claimant", body = Error),
        (status = 401, description = "Login required or user not found", body = Error),
        (status = 404, description = "Lead not found", body = Error),
        (status = 409, description = "Lead already claimed", body = Error),
        (status = 503, description = "Lead storage unavailable", body = Error)
    ),
    tags = ["leads"],
    operation_id = "claimLead"
)]
#[post("/leads/{id}/claim")]
pub async fn claim_lead(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LeadResponse>> {
    let user = session.require_user(state.user_profiles.as_ref()).await?;
    let lead_id = parse_lead_id(&path.into_inner())?;

    let outcome = state.lead_claims.claim(lead_id, user.id()).await?;
    claim_response(outcome).map(web::Json)
}

fn claim_response(outcome: ClaimOutcome) -> ApiResult<LeadResponse> {
    match outcome {
        ClaimOutcome::Claimed(lead) => Ok(LeadResponse::from(lead)),
        ClaimOutcome::NotFound => Err(Error::not_found("Enquiry not found")),
        ClaimOutcome::AlreadyClaimed { .. } => {
            Err(Error::conflict("This enquiry has already been claimed"))
        }
    }
}

/// List leads claimed by the signed-in staff member.
#[utoipa::path(
    get,
    path = "/api/v1/leads/mine",
    params(PageQuery),
    responses(
        (status = 200, description = "Claimed leads", body = LeadPageResponse),
        (status = 401, description = "Login required or user not found", body = Error),
        (status = 503, description = "Lead storage unavailable", body = Error)
    ),
    tags = ["leads"],
    operation_id = "listMyLeads"
)]
#[get("/leads/mine")]
pub async fn list_my_leads(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<LeadPageResponse>> {
    let user = session.require_user(state.user_profiles.as_ref()).await?;
    let page = state
        .lead_queries
        .list_mine(user.id(), query.page_request())
        .await?;
    Ok(web::Json(LeadPageResponse::from(page)))
}

#[cfg(test)]
#[path = "leads_tests.rs"]
mod tests;
