use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use rs_markov_core::config::DEFAULT_MAX_LENGTH;
use rs_markov_core::corpus::{CORPUS_EXTENSION, list_corpora, load_corpora};
use rs_markov_core::{Chain, DEFAULT_GRAM_SIZE, Error, GenerationConfig, Generator};

/// Command line options of the server.
#[derive(Parser, Debug)]
#[command(version, about = "Serves text generated from a word-level Markov chain")]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Directory holding the `.txt` corpora
	#[arg(long, default_value = "./data")]
	data_dir: PathBuf,

	/// Gram size used for the startup training
	#[arg(long, default_value_t = DEFAULT_GRAM_SIZE)]
	gram_size: usize,

	/// Comma separated corpus names to train on at startup
	#[arg(long, value_delimiter = ',')]
	corpora: Vec<String>,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	min_paragraphs: Option<usize>,
	max_paragraphs: Option<usize>,
	min_sentences: Option<usize>,
	max_sentences: Option<usize>,
	max_length: Option<usize>,
	separator: Option<String>,
	seed: Option<u64>,
}

/// Largest paragraph or sentence bound accepted by `/v1/generate`.
const MAX_COUNT: usize = 1_000;

impl GenerateParams {
	/// Fills the missing parameters with the library defaults.
	///
	/// # Errors
	/// Returns a message if a paragraph or sentence bound exceeds [`MAX_COUNT`].
	fn config(&self) -> Result<GenerationConfig, String> {
		let defaults = GenerationConfig::default();
		let config = GenerationConfig {
			min_paragraphs: self.min_paragraphs.unwrap_or(defaults.min_paragraphs),
			max_paragraphs: self.max_paragraphs.unwrap_or(defaults.max_paragraphs),
			min_sentences: self.min_sentences.unwrap_or(defaults.min_sentences),
			max_sentences: self.max_sentences.unwrap_or(defaults.max_sentences),
			max_length: self.max_length.unwrap_or(defaults.max_length),
			separator: self.separator.clone().unwrap_or(defaults.separator),
			gram_size: defaults.gram_size,
		};
		let counts = [config.min_paragraphs, config.max_paragraphs, config.min_sentences, config.max_sentences];
		if counts.iter().any(|&count| count > MAX_COUNT) {
			return Err(format!("paragraph and sentence bounds must not exceed {MAX_COUNT}"));
		}
		Ok(config)
	}
}

/// Query parameters for the `/v1/sentence` endpoint
#[derive(Deserialize)]
struct SentenceParams {
	max_length: Option<usize>,
	seed: Option<u64>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
	gram_size: Option<usize>,
}

/// JSON body of the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainBody {
	sources: Vec<String>,
	gram_size: Option<usize>,
}

#[derive(Serialize)]
struct ChainStats {
	gram_size: usize,
	prefixes: usize,
	transitions: usize,
}

/// The current chain and the corpora it was trained on.
///
/// The chain is never mutated: retraining swaps the `Arc`, generations in
/// flight keep reading the chain they started with.
struct SharedData {
	chain: Arc<Chain>,
	corpora: Vec<String>,
	data_dir: PathBuf,
}

type State = web::Data<RwLock<SharedData>>;

/// Maps a library error to an HTTP response.
fn error_response(err: Error) -> HttpResponse {
	match err {
		err if err.is_invalid_argument() => HttpResponse::BadRequest().body(err.to_string()),
		Error::EmptyChain => HttpResponse::Conflict().body(err.to_string()),
		err => {
			error!("{err}");
			HttpResponse::InternalServerError().body(err.to_string())
		}
	}
}

/// Clones the current chain out of the lock.
fn current_chain(data: &State) -> Result<Arc<Chain>, HttpResponse> {
	data.read()
		.map(|shared| Arc::clone(&shared.chain))
		.map_err(|_| HttpResponse::InternalServerError().body("Chain lock failed"))
}

/// Builds a generator over `chain`, reproducible when `seed` is set.
fn generator(chain: &Chain, seed: Option<u64>) -> Generator<'_, StdRng> {
	let rng = match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_rng(&mut rand::rng()),
	};
	Generator::with_rng(chain, rng)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates paragraphs from the current chain based on query parameters.
#[get("/v1/generate")]
async fn get_generated(data: State, query: web::Query<GenerateParams>) -> impl Responder {
	let chain = match current_chain(&data) {
		Ok(chain) => chain,
		Err(response) => return response,
	};

	let config = match query.config() {
		Ok(config) => config,
		Err(message) => return HttpResponse::BadRequest().body(message),
	};

	match generator(&chain, query.seed).generate(&config) {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/sentence`
#[get("/v1/sentence")]
async fn get_sentence(data: State, query: web::Query<SentenceParams>) -> impl Responder {
	let chain = match current_chain(&data) {
		Ok(chain) => chain,
		Err(response) => return response,
	};
	let max_length = query.max_length.unwrap_or(DEFAULT_MAX_LENGTH);

	match generator(&chain, query.seed).sentence(max_length) {
		Ok(text) => HttpResponse::Ok().body(text),
		Err(e) => error_response(e),
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: State) -> impl Responder {
	let data_dir = match data.read() {
		Ok(shared) => shared.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	match list_corpora(&data_dir, CORPUS_EXTENSION) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(e) => error_response(e),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: State) -> impl Responder {
	match data.read() {
		Ok(shared) => HttpResponse::Ok().body(shared.corpora.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Chain lock failed"),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: State) -> impl Responder {
	let chain = match current_chain(&data) {
		Ok(chain) => chain,
		Err(response) => return response,
	};
	HttpResponse::Ok().json(ChainStats {
		gram_size: chain.gram_size(),
		prefixes: chain.len(),
		transitions: chain.transitions(),
	})
}

/// Swaps the shared chain for a freshly trained one.
fn replace_chain(data: &State, chain: Chain, corpora: Vec<String>) -> HttpResponse {
	let mut shared = match data.write() {
		Ok(shared) => shared,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	info!("serving a chain of {} prefixes", chain.len());
	shared.chain = Arc::new(chain);
	shared.corpora = corpora;
	HttpResponse::Ok().body("Chain trained successfully")
}

#[put("/v1/load_corpora")]
async fn put_corpora(data: State, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();

	let data_dir = match data.read() {
		Ok(shared) => shared.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let gram_size = query.gram_size.unwrap_or(DEFAULT_GRAM_SIZE);
	let chain = match load_corpora(&data_dir, &names).and_then(|sources| Chain::train(&sources, gram_size)) {
		Ok(chain) => chain,
		Err(e) => return error_response(e),
	};
	replace_chain(&data, chain, names)
}

#[post("/v1/train")]
async fn post_train(data: State, body: web::Json<TrainBody>) -> impl Responder {
	let gram_size = body.gram_size.unwrap_or(DEFAULT_GRAM_SIZE);
	match Chain::train(&body.sources, gram_size) {
		Ok(chain) => replace_chain(&data, chain, Vec::new()),
		Err(e) => error_response(e),
	}
}

/// Main entry point for the server.
///
/// Trains the startup chain, wraps it in a `RwLock` for thread safety,
/// and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let chain = load_corpora(&args.data_dir, &args.corpora)
		.and_then(|sources| Chain::train(&sources, args.gram_size))
		.map_err(std::io::Error::other)?;

	let shared_data = SharedData {
		chain: Arc::new(chain),
		corpora: args.corpora.clone(),
		data_dir: args.data_dir.clone(),
	};
	let shared_chain = web::Data::new(RwLock::new(shared_data));

	info!("listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(get_generated)
			.service(get_sentence)
			.service(get_corpora)
			.service(get_loaded_corpora)
			.service(get_stats)
			.service(put_corpora)
			.service(post_train)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
