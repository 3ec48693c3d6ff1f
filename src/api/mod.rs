mod chain;
mod health;
pub mod models;
mod tx;
mod wallet;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::get_tip)
            .service(chain::validate_chain)
            .service(tx::sign_transaction)
            .service(tx::post_transaction)
            .service(wallet::create_wallet),
    );
}

#[cfg(test)]
mod tests {
    use super::{AppState, init_routes};
    use crate::blockchain::Blockchain;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Blockchain::new("0", "satoshi")))
    }

    #[actix_web::test]
    async fn fresh_chain_has_only_genesis() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["length"], 1);
        assert_eq!(body["pow_prefix"], "0");
        assert_eq!(body["chain"][0]["previous_hash"], Value::Null);
        assert_eq!(body["chain"][0]["transaction"]["payer"], "genesis");

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
    }

    #[actix_web::test]
    async fn signed_transaction_is_mined_onto_the_tip() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post().uri("/api/v1/wallet/new/").to_request();
        let wallet: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(wallet["address"], wallet["public_key"]);

        let req = test::TestRequest::post()
            .uri("/api/v1/tx/sign/")
            .set_json(json!({
                "private_key": wallet["private_key"],
                "payee": "bob",
                "amount": 50,
            }))
            .to_request();
        let signed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(signed["public_key"], wallet["public_key"]);

        let genesis_hash = {
            let req = test::TestRequest::get().uri("/api/v1/chain/tip/").to_request();
            let tip: Value = test::call_and_read_body_json(&app, req).await;
            tip["hash"].clone()
        };

        let req = test::TestRequest::post()
            .uri("/api/v1/tx/")
            .set_json(json!({
                "amount": 50,
                "payer": signed["transaction"]["payer"],
                "payee": "bob",
                "public_key": signed["public_key"],
                "signature": signed["signature"],
            }))
            .to_request();
        let block: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(block["index"], 1);
        assert_eq!(block["previous_hash"], genesis_hash);
        assert_eq!(block["transaction"]["amount"], 50);

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["length"], 2);
        assert_eq!(body["valid"], true);
    }

    #[actix_web::test]
    async fn bad_signature_is_reported_and_chain_untouched() {
        let app = test::init_service(App::new().app_data(state()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/tx/")
            .set_json(json!({
                "amount": 5,
                "payer": "alice",
                "payee": "bob",
                "public_key": "alice",
                "signature": "deadbeef",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["accepted"], false);

        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["length"], 1);
    }

    #[actix_web::test]
    async fn malformed_private_key_is_bad_request() {
        let app = test::init_service(App::new().configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/tx/sign/")
            .set_json(json!({ "private_key": "xyz", "payee": "bob", "amount": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn chain_reads_wait_off_the_worker_while_mining_holds_the_lock() {
        use std::rc::Rc;
        use std::sync::mpsc;
        use std::time::{Duration, Instant};

        let state = state();
        let app = Rc::new(
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await,
        );

        // Stand-in for a long proof-of-work search holding the chain lock.
        let (locked_tx, locked_rx) = mpsc::channel();
        let holder = {
            let state = state.clone();
            std::thread::spawn(move || {
                let _guard = state.blockchain.lock().expect("mutex poisoned");
                locked_tx.send(()).expect("signal lock");
                std::thread::sleep(Duration::from_millis(500));
            })
        };
        locked_rx.recv().expect("lock taken");

        let reader = {
            let app = Rc::clone(&app);
            actix_web::rt::spawn(async move {
                let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
                test::call_service(&*app, req).await.status()
            })
        };

        let t0 = Instant::now();
        actix_web::rt::time::sleep(Duration::from_millis(20)).await;
        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let resp = test::call_service(&*app, req).await;
        assert!(resp.status().is_success());
        assert!(t0.elapsed() < Duration::from_millis(400));

        assert_eq!(reader.await.expect("reader task"), StatusCode::OK);
        holder.join().expect("holder thread");
    }

    #[actix_web::test]
    async fn health_responds() {
        let app = test::init_service(App::new().configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
