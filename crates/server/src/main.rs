use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use server::config::Settings;
use server::embedding::{Embedder, OpenAiEmbedder};
use server::retrieval::RetrievalService;
use server::state::AppState;
use server::store::{GuidelineStore, SupabaseStore};

#[tokio::main]
async fn main() {
    init_tracing();

    let settings = Settings::from_env();

    let store: Arc<dyn GuidelineStore> = Arc::new(SupabaseStore::new(
        &settings.supabase_url,
        &settings.supabase_service_role_key,
    ));

    let embedder: Option<Arc<dyn Embedder>> = settings.openai_api_key.as_ref().map(|key| {
        Arc::new(OpenAiEmbedder::new(
            key.clone(),
            settings.openai_embedding_model.clone(),
        )) as Arc<dyn Embedder>
    });
    if embedder.is_none() {
        tracing::info!("no embedding key configured; retrieval is lexical-only");
    }

    let retrieval = Arc::new(RetrievalService::new(
        store.clone(),
        embedder,
        settings.retrieval_top_k,
        settings.enable_vector_search,
    ));

    let state = AppState { store, retrieval };

    let app = server::rest::api_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .expect("BIND_ADDR must be a valid socket address");
    tracing::info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
