//! # Message Board Binary
//!
//! The entry point that assembles the store, identity issuer and API from
//! the plugins selected by Cargo features.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use mb_api::{configure_routes_with_limit, middleware, AppState};
use mb_config::Settings;

#[cfg(feature = "store-json")]
use mb_store_json::JsonMessageStore;

#[cfg(feature = "identity-simple")]
use mb_identity_simple::SimpleIdentityProvider;

#[cfg(not(all(feature = "store-json", feature = "identity-simple")))]
compile_error!("message-board needs a store plugin and an identity plugin enabled");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env file: {e}"),
    }

    // 1. Settings (MB_* variables over defaults)
    let settings = Settings::load().context("failed to load settings")?;

    // 2. Record store; refuses to start on a corrupt snapshot
    #[cfg(feature = "store-json")]
    let repo = JsonMessageStore::open(&settings.storage_path)
        .await
        .with_context(|| format!("failed to open {}", settings.storage_path.display()))?;
    #[cfg(feature = "store-json")]
    repo.load()
        .await
        .context("existing message store is unreadable")?;

    // 3. Identity issuer
    #[cfg(feature = "identity-simple")]
    let identity = SimpleIdentityProvider::new();

    // 4. Wrap in AppState (dynamic dispatch keeps the plugins swappable)
    let state = web::Data::new(AppState {
        repo: Box::new(repo),
        identity: Box::new(identity),
        title: settings.board_title.clone(),
    });

    let form_limit = settings.max_form_bytes;
    let (host, port) = settings.bind_addr();
    log::info!("Message board starting on http://{host}:{port}");
    log::info!("Storing messages in {}", settings.storage_path.display());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::security_headers())
            .configure(|cfg| configure_routes_with_limit(cfg, form_limit))
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {host}:{port}"))?
    .run()
    .await?;

    Ok(())
}
