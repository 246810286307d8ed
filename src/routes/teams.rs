use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::teams as teams_service;

#[get("/teams/stats")]
/// Member count and age aggregates per team.
pub async fn team_stats(repo: web::Data<DieselRepository>) -> impl Responder {
    match teams_service::team_age_stats(repo.get_ref()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => error_response(err, "load team stats"),
    }
}
