//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env: HOST, PORT, DATA_DIR (optional; snapshots are written there after every change
//! and loaded from there at startup).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};
use swiss_chess_tournament::{
    export_snapshot, generate_next_round, import_snapshot, parse_results, standings,
    submit_results, Gender, PlayerId, Round, Tournament, TournamentError, TournamentSnapshot,
};
use uuid::Uuid;

type TournamentId = Uuid;

/// Per-tournament entry: tournament data, the round awaiting results, last activity time.
struct TournamentEntry {
    tournament: Tournament,
    /// Generated but not yet submitted. Consumed by a successful submit.
    pending_round: Option<Round>,
    last_activity: Instant,
}

impl TournamentEntry {
    fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            pending_round: None,
            last_activity: Instant::now(),
        }
    }
}

/// All tournaments by id. One lock serializes every mutation.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed from memory.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Settings read from the environment at startup.
#[derive(Clone, Debug)]
struct AppConfig {
    host: String,
    port: u16,
    data_dir: Option<PathBuf>,
}

impl AppConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: std::env::var_os("DATA_DIR").map(PathBuf::from),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct TournamentView<'a> {
    id: TournamentId,
    #[serde(flatten)]
    tournament: &'a Tournament,
    pending_round: Option<&'a Round>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default = "default_name")]
    name: String,
}

fn default_name() -> String {
    "Untitled Tournament".to_string()
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    rating: u32,
    #[serde(default)]
    gender: Option<Gender>,
    #[serde(default)]
    age: Option<u32>,
}

#[derive(Deserialize)]
struct ResultBody {
    white: PlayerId,
    black: PlayerId,
    /// "1-0", "0-1" or "draw"; parsed as a batch so one bad value rejects all.
    outcome: String,
}

#[derive(Deserialize)]
struct SubmitResultsBody {
    results: Vec<ResultBody>,
}

#[derive(Deserialize)]
struct StandingsQuery {
    #[serde(default, rename = "final")]
    final_standings: bool,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

fn error_json(msg: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": msg.to_string() })
}

fn error_response(e: &TournamentError) -> HttpResponse {
    match e {
        TournamentError::PlayerNotFound(_) => HttpResponse::NotFound().json(error_json(e)),
        TournamentError::Pairing(_) => HttpResponse::Conflict().json(error_json(e)),
        TournamentError::Io(_) => HttpResponse::InternalServerError().json(error_json(e)),
        _ => HttpResponse::BadRequest().json(error_json(e)),
    }
}

fn lock(state: &AppState) -> Result<RwLockWriteGuard<'_, HashMap<TournamentId, TournamentEntry>>, HttpResponse> {
    state
        .write()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))
}

/// Look up a tournament and refresh its activity time.
fn entry_mut(
    g: &mut HashMap<TournamentId, TournamentEntry>,
    id: TournamentId,
) -> Result<&mut TournamentEntry, HttpResponse> {
    let entry = g
        .get_mut(&id)
        .ok_or_else(|| HttpResponse::NotFound().json(error_json("No tournament")))?;
    entry.last_activity = Instant::now();
    Ok(entry)
}

fn view(id: TournamentId, entry: &TournamentEntry) -> HttpResponse {
    HttpResponse::Ok().json(TournamentView {
        id,
        tournament: &entry.tournament,
        pending_round: entry.pending_round.as_ref(),
    })
}

/// Write the snapshot to DATA_DIR (if configured). Called after the lock is released.
async fn persist(config: &AppConfig, id: TournamentId, snapshot: Option<TournamentSnapshot>) {
    let (Some(dir), Some(snapshot)) = (config.data_dir.as_ref(), snapshot) else {
        return;
    };
    let json = match snapshot.to_json() {
        Ok(json) => json,
        Err(e) => {
            log::error!("Could not serialize tournament {id}: {e}");
            return;
        }
    };
    let path = dir.join(format!("{id}.json"));
    if let Err(e) = tokio::fs::write(&path, json).await {
        log::error!("Could not write {}: {e}", path.display());
    }
}

/// Load every `<uuid>.json` snapshot in `dir`. Invalid files are skipped with a warning.
async fn load_saved(dir: &std::path::Path) -> std::io::Result<HashMap<TournamentId, TournamentEntry>> {
    tokio::fs::create_dir_all(dir).await?;
    let mut loaded = HashMap::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(file) = entries.next_entry().await? {
        let path = file.path();
        let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| Uuid::parse_str(s).ok())
        else {
            continue;
        };
        match TournamentSnapshot::load(&path).and_then(Tournament::try_from) {
            Ok(t) => {
                loaded.insert(id, TournamentEntry::new(t));
            }
            Err(e) => log::warn!("Skipping {}: {e}", path.display()),
        }
    }
    Ok(loaded)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-chess-tournament",
    })
}

#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    config: Data<AppConfig>,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let name = body.map(|b| b.into_inner().name).unwrap_or_else(default_name);
    let id = Uuid::new_v4();
    let (resp, snapshot) = {
        let mut g = match lock(&state) {
            Ok(g) => g,
            Err(resp) => return resp,
        };
        let entry = g.entry(id).or_insert(TournamentEntry::new(Tournament::new(name)));
        log::info!("Created tournament {id} ({:?})", entry.tournament.name);
        (view(id, entry), export_snapshot(&entry.tournament))
    };
    persist(&config, id, Some(snapshot)).await;
    resp
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match entry_mut(&mut g, path.id) {
        Ok(entry) => view(path.id, entry),
        Err(resp) => resp,
    }
}

/// Register a player. Drops the pending round, which was paired without them.
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<TournamentPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    let (resp, snapshot) = {
        let mut g = match lock(&state) {
            Ok(g) => g,
            Err(resp) => return resp,
        };
        let entry = match entry_mut(&mut g, path.id) {
            Ok(e) => e,
            Err(resp) => return resp,
        };
        match entry
            .tournament
            .register_player(&body.name, body.rating, body.gender, body.age)
        {
            Ok(_) => {
                entry.pending_round = None;
                (view(path.id, entry), Some(export_snapshot(&entry.tournament)))
            }
            Err(e) => (error_response(&e), None),
        }
    };
    persist(&config, path.id, snapshot).await;
    resp
}

/// Generate the next round and keep it as the pending round (replaces any previous preview).
#[post("/api/tournaments/{id}/rounds/generate")]
async fn api_generate_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    let entry = match entry_mut(&mut g, path.id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    match generate_next_round(&entry.tournament) {
        Ok(round) => {
            entry.pending_round = Some(round);
            view(path.id, entry)
        }
        Err(e) => error_response(&TournamentError::from(e)),
    }
}

/// Discard the pending round without recording anything.
#[delete("/api/tournaments/{id}/rounds/pending")]
async fn api_discard_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match entry_mut(&mut g, path.id) {
        Ok(entry) => {
            entry.pending_round = None;
            view(path.id, entry)
        }
        Err(resp) => resp,
    }
}

/// Submit results for the pending round. The pending round is consumed on success.
#[post("/api/tournaments/{id}/rounds/submit")]
async fn api_submit_results(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<TournamentPath>,
    body: Json<SubmitResultsBody>,
) -> HttpResponse {
    let (resp, snapshot) = {
        let mut g = match lock(&state) {
            Ok(g) => g,
            Err(resp) => return resp,
        };
        let entry = match entry_mut(&mut g, path.id) {
            Ok(e) => e,
            Err(resp) => return resp,
        };
        let Some(round) = entry.pending_round.as_ref() else {
            return HttpResponse::BadRequest().json(error_json("No pending round"));
        };
        let raw: Vec<(PlayerId, PlayerId, &str)> = body
            .results
            .iter()
            .map(|r| (r.white, r.black, r.outcome.as_str()))
            .collect();
        let outcome = parse_results(&raw)
            .and_then(|results| submit_results(&mut entry.tournament, round, &results));
        match outcome {
            Ok(()) => {
                entry.pending_round = None;
                (view(path.id, entry), Some(export_snapshot(&entry.tournament)))
            }
            Err(e) => (error_response(&e), None),
        }
    };
    persist(&config, path.id, snapshot).await;
    resp
}

/// Standings table; `?final=true` adds the direct-encounter tie-break.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match entry_mut(&mut g, path.id) {
        Ok(entry) => HttpResponse::Ok().json(standings(&entry.tournament, query.final_standings)),
        Err(resp) => resp,
    }
}

#[get("/api/tournaments/{id}/snapshot")]
async fn api_export_snapshot(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match entry_mut(&mut g, path.id) {
        Ok(entry) => HttpResponse::Ok().json(export_snapshot(&entry.tournament)),
        Err(resp) => resp,
    }
}

/// Replace the tournament with an uploaded snapshot. Drops the pending round.
#[put("/api/tournaments/{id}/snapshot")]
async fn api_import_snapshot(
    state: AppState,
    config: Data<AppConfig>,
    path: Path<TournamentPath>,
    body: Json<TournamentSnapshot>,
) -> HttpResponse {
    let (resp, snapshot) = {
        let mut g = match lock(&state) {
            Ok(g) => g,
            Err(resp) => return resp,
        };
        let entry = match entry_mut(&mut g, path.id) {
            Ok(e) => e,
            Err(resp) => return resp,
        };
        match import_snapshot(&mut entry.tournament, body.into_inner()) {
            Ok(()) => {
                entry.pending_round = None;
                (view(path.id, entry), Some(export_snapshot(&entry.tournament)))
            }
            Err(e) => (error_response(&e), None),
        }
    };
    persist(&config, path.id, snapshot).await;
    resp
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let saved = match &config.data_dir {
        Some(dir) => {
            let saved = load_saved(dir).await?;
            log::info!("Loaded {} tournament(s) from {}", saved.len(), dir.display());
            saved
        }
        None => HashMap::new(),
    };
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(saved));

    // Background task: every 30 minutes, drop tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    let bind = (config.host.clone(), config.port);
    let config = Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_generate_round)
            .service(api_discard_round)
            .service(api_submit_results)
            .service(api_standings)
            .service(api_export_snapshot)
            .service(api_import_snapshot)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
