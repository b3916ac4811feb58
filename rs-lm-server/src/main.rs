use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, put, web};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use rs_lm_core::io::list_corpora;
use rs_lm_core::model::distribution::FrequencyEntry;
use rs_lm_core::model::generator::Generator;
use rs_lm_core::{LanguageModel, Mode};

const CORPUS_EXTENSION: &str = "txt";
const DEFAULT_TEXT_LENGTH: usize = 100;

/// HTTP front-end for a character-level language model.
#[derive(Parser, Debug, Clone)]
#[command(name = "rs-lm-server", version, about = "Serve text generation over HTTP")]
struct Args {
	/// Directory holding the `.txt` corpora
	#[arg(long, default_value = "./data")]
	data: PathBuf,

	/// Corpus (file name without extension) to train on at startup
	#[arg(long)]
	corpus: Option<String>,

	/// Context window length of the startup model
	#[arg(long, default_value_t = 3)]
	window_length: usize,

	/// Fixed seed for the shared random source; OS-seeded when absent
	#[arg(long)]
	seed: Option<u64>,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	text_length: Option<usize>,
	seed: Option<String>, // -> random or custom(str)
	rng_seed: Option<u64>,
}

/// Query parameters for the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainQuery {
	name: Option<String>,
	window_length: Option<usize>,
	seed: Option<u64>,
}

#[derive(Deserialize)]
struct DistributionQuery {
	context: String,
}

/// How the text handed to the generator is chosen.
#[derive(Debug, PartialEq)]
enum StartSeed<'a> {
	/// A random context of the model.
	Random,
	/// A caller-provided text.
	Custom(&'a str),
}

struct SharedData {
	model: LanguageModel,
	data: PathBuf,
}

impl GenerateParams {
	/// Determines the starting text strategy.
	fn start_seed(&self) -> Result<StartSeed<'_>, String> {
		match &self.seed {
			None => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase() == "random" => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase().starts_with("custom:") => {
				let value = &s["custom:".len()..];
				if value.is_empty() {
					Err("Custom seed cannot be empty".into())
				} else {
					Ok(StartSeed::Custom(value))
				}
			}
			Some(_) => Err("Seed must be 'random' or 'custom:<text>'".into()),
		}
	}
}

fn mode_for(seed: Option<u64>) -> Mode {
	seed.map_or(Mode::Random, Mode::Seeded)
}

/// Resolves a corpus name to `<data>/<name>.txt`.
///
/// The name must be a plain file name: no separators, no `.`/`..`, so a
/// request can never reach outside the data directory.
fn corpus_path(data: &Path, name: &str) -> Result<PathBuf, String> {
	let mut components = Path::new(name).components();
	let plain = !name.contains(['/', '\\'])
		&& matches!(components.next(), Some(Component::Normal(_)))
		&& components.next().is_none();
	if !plain {
		return Err(format!("Invalid corpus name {:?}", name));
	}
	Ok(data.join(name).with_extension(CORPUS_EXTENSION))
}

/// Trains a fresh model on `<data>/<name>.txt`.
fn train_corpus(data: &Path, name: &str, window_length: usize, mode: Mode) -> Result<LanguageModel, String> {
	let path = corpus_path(data, name)?;
	let mut model = LanguageModel::new(window_length, mode).map_err(|e| e.to_string())?;
	model.train_file(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
	Ok(model)
}

#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let text_length = query.text_length.unwrap_or(DEFAULT_TEXT_LENGTH);

	let start_seed = match query.start_seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	// A per-request seed runs on its own random source and leaves the shared one untouched.
	if let Some(rng_seed) = query.rng_seed {
		let index = shared_data.model.index();
		let mut rng = StdRng::seed_from_u64(rng_seed);
		let initial_text = match start_seed {
			StartSeed::Custom(s) => s.to_owned(),
			StartSeed::Random => match index.random_context(&mut rng) {
				Some(s) => s,
				None => return HttpResponse::InternalServerError().body("Model is empty"),
			},
		};
		let text = Generator::new(index, rng).generate(&initial_text, text_length);
		return HttpResponse::Ok().body(text);
	}

	let initial_text = match start_seed {
		StartSeed::Custom(s) => s.to_owned(),
		StartSeed::Random => match shared_data.model.random_context() {
			Some(s) => s,
			None => return HttpResponse::InternalServerError().body("Model is empty"),
		},
	};
	HttpResponse::Ok().body(shared_data.model.generate(&initial_text, text_length))
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let folder = match data.lock() {
		Ok(m) => m.data.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_corpora(&folder, CORPUS_EXTENSION) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	match data.lock() {
		Ok(shared_data) => HttpResponse::Ok().body(shared_data.model.to_string()),
		Err(_) => HttpResponse::InternalServerError().body("Model lock failed"),
	}
}

#[get("/v1/distribution")]
async fn get_distribution(data: web::Data<Mutex<SharedData>>, query: web::Query<DistributionQuery>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.model.index().get(&query.context) {
		Some(distribution) => {
			let entries: Vec<&FrequencyEntry> = distribution.iter().collect();
			HttpResponse::Ok().json(entries)
		}
		None => HttpResponse::NotFound().body(format!("Unknown context {:?}", query.context)),
	}
}

#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let window_length = query.window_length.unwrap_or(shared_data.model.window_length());
	let model = match train_corpus(&shared_data.data, name, window_length, mode_for(query.seed)) {
		Ok(m) => m,
		Err(e) => return HttpResponse::BadRequest().body(format!("Failed to train model: {e}")),
	};

	info!("Switched to corpus {} ({} contexts)", name, model.index().len());
	shared_data.model = model;
	HttpResponse::Ok().body("Model trained successfully")
}

/// Main entry point for the server.
///
/// Trains the startup model (or starts empty), wraps it in a `Mutex` so the
/// random source is consumed by one request at a time, and serves it.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let model = match &args.corpus {
		Some(name) => train_corpus(&args.data, name, args.window_length, mode_for(args.seed))
			.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?,
		None => {
			warn!("No startup corpus, the model is empty until PUT /v1/train");
			LanguageModel::new(args.window_length, mode_for(args.seed))
				.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?
		}
	};

	let shared_data = SharedData { model, data: args.data.clone() };
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_model)
			.service(get_distribution)
			.service(put_train)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
