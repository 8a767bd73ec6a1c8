use actix_web::{web, HttpResponse, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use dom_simplifier::{DomSimplifier, InteractiveElement, PageFetcher, SimplifiedDom, SimplifiedNode};

pub struct AppState {
    pub simplifier: DomSimplifier,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimplifyRequest {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimplifyResponse {
    pub success: bool,
    pub message: String,
    pub generated_at: String,
    pub result: Option<SimplifiedDom>,
    #[serde(default)]
    pub interactive: Vec<InteractiveElement>,
}

impl SimplifyResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            generated_at: Local::now().to_rfc3339(),
            result: None,
            interactive: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectorRequest {
    pub node: SimplifiedNode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectorResponse {
    pub success: bool,
    pub selector: Option<String>,
}

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "dom-simplifier"
    })))
}

pub async fn simplify_handler(
    state: web::Data<AppState>,
    req: web::Json<SimplifyRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();

    let html = match (req.html, req.url) {
        (Some(html), _) => html,
        (None, Some(url)) => {
            log::info!("Received simplify request for: {}", url);
            let fetched = match PageFetcher::new(state.fetch_timeout) {
                Ok(fetcher) => fetcher.fetch(&url).await,
                Err(e) => Err(e),
            };
            match fetched {
                Ok(html) => html,
                Err(e) => {
                    log::error!("Failed to fetch {}: {:#}", url, e);
                    return Ok(HttpResponse::Ok()
                        .json(SimplifyResponse::failure(format!("Failed to fetch page: {:#}", e))));
                }
            }
        }
        (None, None) => {
            return Ok(HttpResponse::BadRequest().json(SimplifyResponse::failure(
                "Either `html` or `url` is required".to_string(),
            )));
        }
    };

    let result = state.simplifier.simplify_html(&html);
    let interactive = state.simplifier.interactive_elements(&result.structure);

    log::info!(
        "Simplified {} bytes of HTML into {} bytes of markup ({} interactive elements)",
        html.len(),
        result.markup.len(),
        interactive.len()
    );

    Ok(HttpResponse::Ok().json(SimplifyResponse {
        success: true,
        message: format!("Found {} interactive elements", interactive.len()),
        generated_at: Local::now().to_rfc3339(),
        result: Some(result),
        interactive,
    }))
}

pub async fn selector_handler(
    state: web::Data<AppState>,
    req: web::Json<SelectorRequest>,
) -> Result<HttpResponse> {
    let selector = state.simplifier.derive_selector(&req.node);
    Ok(HttpResponse::Ok().json(SelectorResponse {
        success: selector.is_some(),
        selector,
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_check))
        .route("/api/simplify", web::post().to(simplify_handler))
        .route("/api/selector", web::post().to(selector_handler));
}
