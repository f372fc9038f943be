use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};
use std::io;
use std::sync::Arc;

use colaboradores::config::Config;
use colaboradores::db::{self, ColaboradorStore, InMemoryColaboradorStore, PgColaboradorStore};
use colaboradores::handlers;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(io::Error::other)?;

    // Pick the store backend
    let store: Arc<dyn ColaboradorStore> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.max_connections)
                .await
                .map_err(io::Error::other)?;
            let store = PgColaboradorStore::new(pool);
            store.run_migrations().await.map_err(io::Error::other)?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL is not set; records are kept in memory and lost on exit");
            Arc::new(InMemoryColaboradorStore::new())
        }
    };

    info!("Starting server at {}", config.bind_address);

    let store = web::Data::from(store);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(handlers::colaborador::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
