use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, error, info, warn};
use std::time::Instant;

use super::models::{
    AppState, BlockView, NewTxRequest, RejectedResponse, SignTxRequest, SignTxResponse,
};
use crate::transaction::Transaction;
use crate::wallet::Wallet;

/// Submit a signed transaction. It is verified, mined and appended before
/// the response is sent; an invalid signature leaves the chain untouched.
#[post("/tx/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let t0 = Instant::now();
    let NewTxRequest {
        amount,
        payer,
        payee,
        public_key,
        signature,
    } = body.into_inner();
    let tx = Transaction::new(amount, payer, payee);
    debug!("POST /tx/ - received: amount={amount}");

    // Mining is CPU bound: run it off the async workers, holding the lock
    // for the whole read-tip/mine/push sequence.
    let result = web::block(move || {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        let index = bc.len();
        bc.append(tx, &public_key, &signature)
            .map(|block| BlockView::new(index, block))
    })
    .await;

    match result {
        Ok(Ok(view)) => {
            info!(
                "POST /tx/ - block #{} OK ({} ms)",
                view.index,
                t0.elapsed().as_millis()
            );
            HttpResponse::Ok().json(view)
        }
        Ok(Err(e)) => {
            warn!("POST /tx/ - rejected: {e}");
            HttpResponse::UnprocessableEntity().json(RejectedResponse {
                accepted: false,
                reason: e.to_string(),
            })
        }
        Err(e) => {
            error!("POST /tx/ - mining task failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// DEV helper: sign a transfer with the given private key, so clients can
/// exercise `/tx/` without their own signing code.
#[post("/tx/sign/")]
pub async fn sign_transaction(body: web::Json<SignTxRequest>) -> impl Responder {
    let wallet = match Wallet::from_secret_hex(&body.private_key) {
        Ok(w) => w,
        Err(e) => {
            warn!("POST /tx/sign/ - {e}");
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    let tx = Transaction::new(body.amount, wallet.public_key(), body.payee.clone());
    let signature = wallet.sign(&tx);
    HttpResponse::Ok().json(SignTxResponse {
        transaction: tx,
        public_key: wallet.public_key().to_string(),
        signature,
    })
}
