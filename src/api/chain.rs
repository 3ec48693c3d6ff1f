use actix_web::{HttpResponse, Responder, get, web};
use log::error;

use super::models::{AppState, BlockView, ChainResponse, ValidateResponse};

/// Run `read` against the locked chain on the blocking pool. A `/tx/`
/// request may hold the lock for a whole proof-of-work search, so the async
/// workers never wait on it directly.
async fn read_chain<R, F>(state: web::Data<AppState>, read: F) -> HttpResponse
where
    R: serde::Serialize + Send + 'static,
    F: FnOnce(&crate::blockchain::Blockchain) -> R + Send + 'static,
{
    let result = web::block(move || {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        read(&bc)
    })
    .await;

    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            error!("chain read failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    read_chain(state, |bc| ChainResponse {
        length: bc.len(),
        pow_prefix: bc.pow_prefix().to_string(),
        chain: bc
            .blocks()
            .iter()
            .enumerate()
            .map(|(i, b)| BlockView::new(i, b))
            .collect(),
    })
    .await
}

/// Current head of the chain.
#[get("/chain/tip/")]
pub async fn get_tip(state: web::Data<AppState>) -> impl Responder {
    read_chain(state, |bc| BlockView::new(bc.len() - 1, bc.tip())).await
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    read_chain(state, |bc| ValidateResponse {
        valid: bc.is_valid_chain(),
        length: bc.len(),
    })
    .await
}
