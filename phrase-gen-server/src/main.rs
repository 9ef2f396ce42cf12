use std::env;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use log::{error, info};
use serde::Deserialize;
use phrase_gen_core::io::{list_models, model_path};
use phrase_gen_core::model::chain::ChainOptions;
use phrase_gen_core::model::generator::Generator;
use phrase_gen_core::ChainError;

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_DATA: &str = "./data";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	nb_try: Option<usize>,
	max_tokens: Option<usize>,
	seed: Option<u64>
}

#[derive(Deserialize)]
struct ModelQuery {
	names: Option<String>,
	limit_starting_words: Option<bool>
}

struct SharedData {
	data_folder: PathBuf,
	generator: Option<Generator>
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a phrase from the loaded models based on query parameters.
/// Generation only reads the chain, so concurrent requests share a read lock.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let generator = match &shared_data.generator {
		Some(g) => g,
		None => return HttpResponse::Conflict().body("No model loaded"),
	};

	let mut input = generator.make_prediction_input();
	input.nb_try = query.nb_try.unwrap_or(5);
	input.seed = query.seed;
	if let Some(max_tokens) = query.max_tokens {
		if let Err(e) = input.set_max_tokens(max_tokens) {
			return HttpResponse::BadRequest().body(e.to_string());
		}
	}

	match generator.predict(&input) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e @ ChainError::EmptyChain) => HttpResponse::Conflict().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/models")]
async fn get_models(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let folder = match data.read() {
		Ok(m) => m.data_folder.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_models(&folder) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(e) => {
			error!("failed to list models in {}: {}", folder.display(), e);
			HttpResponse::InternalServerError().body("Failed to list models")
		}
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let names = shared_data.generator.as_ref().map(|g| g.model_names().join("\n")).unwrap_or_default();
	HttpResponse::Ok().body(names)
}

/// Builds a generator from a comma-separated list of model names.
///
/// Each name must resolve to a `.dat` file directly inside `folder`.
fn load_generator(folder: &Path, names: &str, options: &ChainOptions) -> phrase_gen_core::Result<Generator> {
	let paths = names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(|name| model_path(folder, name))
		.collect::<phrase_gen_core::Result<Vec<PathBuf>>>()?;

	if paths.is_empty() {
		return Err(ChainError::InvalidInput("Missing or empty model name".to_owned()));
	}
	Generator::from_files(paths, options)
}

#[put("/v1/load_models")]
async fn put_model(data: web::Data<RwLock<SharedData>>, query: web::Query<ModelQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let options = ChainOptions {
		limit_starting_words: query.limit_starting_words.unwrap_or(true),
	};

	let folder = match data.read() {
		Ok(m) => m.data_folder.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	// Corpora are read and the chain is built without holding the lock,
	// the previous chain keeps serving until the swap
	let generator = match load_generator(&folder, query_names, &options) {
		Ok(generator) => generator,
		Err(e @ ChainError::InvalidInput(_)) => return HttpResponse::BadRequest().body(format!("Failed to load model: {e}")),
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load model: {e}")),
	};

	info!("serving models: {}", generator.model_names().join(", "));
	match data.write() {
		Ok(mut shared_data) => {
			shared_data.generator = Some(generator);
			HttpResponse::Ok().body("Models loaded successfully")
		}
		Err(_) => HttpResponse::InternalServerError().body("Model lock failed"),
	}
}

/// Main entry point for the server.
///
/// Starts with no model loaded, wraps the generator in a `RwLock`
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - `PHRASE_GEN_BIND` sets the listening address (default 127.0.0.1:5000).
/// - `PHRASE_GEN_DATA` sets the corpus folder (default ./data).
/// - `RUST_LOG` controls logging (default info).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let bind = env::var("PHRASE_GEN_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_owned());
	let data_folder = PathBuf::from(env::var("PHRASE_GEN_DATA").unwrap_or_else(|_| DEFAULT_DATA.to_owned()));
	info!("listening on {}, corpora in {}", bind, data_folder.display());

	let shared_data = SharedData {
		data_folder,
		generator: None,
	};
	let shared_model = web::Data::new(RwLock::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_models)
			.service(put_model)
			.service(get_loaded_models)
	})
		.bind(bind)?
		.run()
		.await
}
