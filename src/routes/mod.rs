//! HTTP routes exposing member searches and team statistics as JSON.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::forms::members::MemberSearchForm;
use crate::services::ServiceError;

pub mod members;
pub mod teams;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Registers every API route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(members::search_members_v1)
            .service(members::search_members_v2)
            .service(members::search_members_v3)
            .service(members::show_member)
            .service(teams::team_stats),
    );
}

/// Decodes the query string; `sort` may be repeated.
fn parse_search_form(req: &HttpRequest) -> Result<MemberSearchForm, HttpResponse> {
    serde_html_form::from_str(req.query_string()).map_err(|err| {
        log::error!("Failed to parse query string: {err}");
        HttpResponse::BadRequest().json(ErrorBody {
            error: &err.to_string(),
        })
    })
}

/// Maps a service failure to its HTTP response.
fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(ErrorBody { error: "not found" }),
        ServiceError::Validation(message) => {
            HttpResponse::BadRequest().json(ErrorBody { error: &message })
        }
        ServiceError::Repository(err) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
