//! Servidor web Axum para conversão XML ⇄ IOB2
//!
//! Rotas:
//! - `GET /`: página de teste
//! - `POST /encode`: XML inline → tokens rotulados
//! - `POST /decode`: tokens + rótulos → XML inline
//! - `POST /encode-batch`: vários documentos, descartando os malformados
//! - `GET /demo-texts`: documentos anotados de exemplo

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use iob_core::{
    corpus::demo_texts, io::format_iob, BatchOutput, Decoded, EncodeConfig, IobConverter, IobError,
    Label, Span, TaggedToken,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
#[derive(Default)]
struct AppState {
    /// Configuração usada quando a requisição não traz a sua
    default_config: EncodeConfig,
}

impl AppState {
    fn converter(&self, config: Option<EncodeConfig>) -> IobConverter {
        IobConverter::with_config(config.unwrap_or_else(|| self.default_config.clone()))
    }
}

#[derive(Deserialize)]
struct EncodeRequest {
    text: String,
    #[serde(default)]
    config: Option<EncodeConfig>,
}

#[derive(Serialize)]
struct EncodeResponse {
    plain_text: String,
    spans: Vec<Span>,
    tokens: Vec<TaggedToken>,
    /// Mesmo conteúdo em formato de arquivo IOB2
    iob: String,
}

#[derive(Deserialize)]
struct DecodeRequest {
    tokens: Vec<String>,
    labels: Vec<Label>,
}

#[derive(Deserialize)]
struct BatchRequest {
    documents: Vec<String>,
    #[serde(default)]
    config: Option<EncodeConfig>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = std::env::var("IOB_WEB_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let app = app(AppState::default());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor IOB iniciado em http://{}", addr);
    axum::serve(listener, app).await
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/encode", post(encode_handler))
        .route("/decode", post(decode_handler))
        .route("/encode-batch", post(encode_batch_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Codifica um documento XML em IOB2
async fn encode_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EncodeRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return bad_request("Texto vazio");
    }

    info!("Codificando: {} chars", req.text.len());
    let converter = state.converter(req.config);
    let text = req.text;

    match run_blocking(move || converter.encode(&text)).await {
        Ok(encoded) => {
            let iob = format_iob(&encoded.tagged);
            Json(EncodeResponse {
                plain_text: encoded.plain_text,
                spans: encoded.spans,
                tokens: encoded.tagged,
                iob,
            })
            .into_response()
        }
        Err(response) => response,
    }
}

/// Decodifica tokens + rótulos em XML inline
async fn decode_handler(Json(req): Json<DecodeRequest>) -> Response {
    if req.tokens.is_empty() {
        return bad_request("Nenhum token");
    }

    info!("Decodificando: {} tokens", req.tokens.len());
    match run_blocking(move || IobConverter::new().decode(&req.tokens, &req.labels)).await {
        Ok(decoded) => Json::<Decoded>(decoded).into_response(),
        Err(response) => response,
    }
}

/// Codifica um lote; documentos malformados voltam em `skipped`
async fn encode_batch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Response {
    if req.documents.is_empty() {
        return bad_request("Lote vazio");
    }

    info!("Codificando lote: {} documentos", req.documents.len());
    let converter = state.converter(req.config);
    let documents = req.documents;

    match run_blocking(move || converter.encode_batch(&documents)).await {
        Ok(output) => Json::<BatchOutput>(output).into_response(),
        Err(response) => response,
    }
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Roda a conversão (síncrona) fora do runtime e traduz os erros em respostas HTTP
async fn run_blocking<T, F>(job: F) -> Result<T, Response>
where
    F: FnOnce() -> iob_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(conversion_error(err)),
        Err(join_err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": join_err.to_string()})),
        )
            .into_response()),
    }
}

fn conversion_error(err: IobError) -> Response {
    warn!(kind = err.kind(), "conversão falhou: {}", err);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({"error": err.to_string(), "kind": err.kind()})),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}
