use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use rust_ledger::api::{self, AppState};
use rust_ledger::blockchain::Blockchain;
use rust_ledger::config::Settings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings = Settings::from_env();
    let chain = Blockchain::new(settings.pow_prefix.as_str(), &settings.genesis_payee);
    log::info!(
        "genesis block {} (pow prefix {:?})",
        chain.tip().hash(),
        chain.pow_prefix()
    );

    println!(
        "⛓️ Starting ledger API at http://{}:{}",
        settings.host, settings.port
    );

    let state = web::Data::new(AppState::new(chain));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
