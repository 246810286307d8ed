use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::forms::members::PageLimits;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{error_response, parse_search_form};
use crate::services::members::{self as members_service, TotalStrategy};

#[get("/v1/members")]
/// Unpaged search over members and their teams.
pub async fn search_members_v1(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let form = match parse_search_form(&req) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match members_service::search_members(repo.get_ref(), form) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(err) => error_response(err, "search members"),
    }
}

#[get("/v2/members")]
/// Paged search; the total is read together with the page.
pub async fn search_members_v2(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    search_page(&req, &repo, &server_config, TotalStrategy::Eager)
}

#[get("/v3/members")]
/// Paged search; the count query is skipped when the page proves the total.
pub async fn search_members_v3(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    search_page(&req, &repo, &server_config, TotalStrategy::Deferred)
}

fn search_page(
    req: &HttpRequest,
    repo: &DieselRepository,
    server_config: &ServerConfig,
    strategy: TotalStrategy,
) -> HttpResponse {
    let form = match parse_search_form(req) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match members_service::search_members_page(
        repo,
        form,
        PageLimits::from(server_config),
        strategy,
    ) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "search members page"),
    }
}

#[get("/members/{member_id}")]
pub async fn show_member(
    member_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match members_service::get_member(repo.get_ref(), member_id.into_inner()) {
        Ok(member) => HttpResponse::Ok().json(member),
        Err(err) => error_response(err, "load member"),
    }
}
