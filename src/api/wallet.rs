use actix_web::{HttpResponse, Responder, post};
use serde::Serialize;

use crate::wallet::generate_keypair_hex;

/// Key material of a fresh wallet. The address is the compressed public key.
#[derive(Serialize)]
struct NewWalletResponse {
    private_key: String,
    public_key: String,
    address: String,
}

#[post("/wallet/new/")]
pub async fn create_wallet() -> impl Responder {
    let (private_key, public_key, address) = generate_keypair_hex();
    HttpResponse::Ok().json(NewWalletResponse {
        private_key,
        public_key,
        address,
    })
}
