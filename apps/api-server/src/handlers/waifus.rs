//! Waifu gallery handlers. Read-only; only approved entries are visible.

use actix_web::{HttpResponse, web};
use animoshi_core::validation::{Page, parse_id};
use animoshi_shared::dto::{IdQuery, PageQuery};

use super::required;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /waifu?id=
pub async fn get_waifu(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> AppResult<HttpResponse> {
    let raw = required("id", query.into_inner().id)?;
    let waifu = state.interactions.get_waifu(parse_id("id", &raw)?).await?;
    Ok(HttpResponse::Ok().json(waifu))
}

/// GET /waifus?limit=&offset=
pub async fn list_waifus(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.limit, query.offset)?;
    let waifus = state.interactions.list_waifus(page).await?;
    Ok(HttpResponse::Ok().json(waifus))
}
