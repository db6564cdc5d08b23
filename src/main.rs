use std::{net::SocketAddr, sync::Arc};

use mongodb::Client;

use kitos::{
    config, routes,
    services::{cart_service::CartStore, mongo_store::MongoStore},
    templates, AppState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let store = MongoStore::new(client.database(&settings.mongodb_db));

    if let Err(e) = store.ensure_indexes().await {
        tracing::warn!("could not ensure indexes: {}", e);
    }

    let state = AppState {
        hbs: templates::build_handlebars(),
        store: Arc::new(store),
        settings: settings.clone(),
        carts: CartStore::new(),
    };

    let app = routes::app(state);

    let ip = settings
        .host
        .parse::<std::net::IpAddr>()
        .expect("HOST must be an IP address");
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
