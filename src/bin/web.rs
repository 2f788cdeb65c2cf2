//! Single binary pairing service: JSON and TRF in, pairings out.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, PAIRING_MAX_ATTEMPTS (search step limit per round).

use actix_web::{
    get, post,
    web::{self, Data, Json, Query},
    App, HttpResponse, HttpServer, Responder,
};
use dubov_pairing::{
    apply_results, check_round, generate_pairings, pairings_to_csv, read_trf, simulate_tournament, write_trf,
    GameResult, Match, Outcome, PairingConfig, PairingError, Player, PlayerId, RoundOneColors, SimulationConfig,
    Tournament, TrfHeader,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Service-wide pairing settings, read once at startup.
type AppState = Data<PairingConfig>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PlayerBody {
    name: String,
    #[serde(default)]
    elo: u32,
}

/// One board of an earlier round, players by name.
#[derive(Deserialize)]
struct GameBody {
    white: String,
    #[serde(default)]
    black: Option<String>,
    /// White's score: 1, 0.5 or 0.
    #[serde(default)]
    result: Option<f64>,
    #[serde(default)]
    bye: bool,
}

#[derive(Deserialize)]
struct RoundBody {
    rounds: u32,
    players: Vec<PlayerBody>,
    #[serde(default)]
    games: Vec<Vec<GameBody>>,
    #[serde(default)]
    accelerated: bool,
    #[serde(default)]
    forbidden: Vec<(String, String)>,
    #[serde(default)]
    round_one_colors: Option<RoundOneColors>,
}

#[derive(Serialize)]
struct BoardResponse {
    white: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    black: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    bye: bool,
}

#[derive(Serialize)]
struct TrfPairingsResponse {
    round: u32,
    pairings: Vec<Match>,
}

/// Optional round in the query string (defaults to the next round).
#[derive(Deserialize)]
struct RoundQuery {
    round: Option<u32>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn error_json(message: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

/// Bad input is 400; a field that cannot be paired is 422.
fn pairing_error(e: &PairingError) -> HttpResponse {
    match e {
        PairingError::NoValidPairing
        | PairingError::ByeCandidatesExhausted
        | PairingError::SearchLimitExceeded { .. } => HttpResponse::UnprocessableEntity().json(error_json(e)),
        _ => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Build a tournament from the JSON roster and replay the listed rounds.
fn tournament_from_body(body: &RoundBody, config: PairingConfig) -> Result<Tournament, String> {
    let mut t = Tournament::new(body.rounds);
    t.accelerated = body.accelerated;
    t.config = config;
    if let Some(colors) = body.round_one_colors {
        t.config.round_one_colors = colors;
    }
    let mut ids: HashMap<&str, PlayerId> = HashMap::new();
    for (i, p) in body.players.iter().enumerate() {
        let id = i as PlayerId + 1;
        if ids.insert(p.name.as_str(), id).is_some() {
            return Err(format!("Duplicate player name: {}", p.name));
        }
        t.add_player(Player::new(id, p.name.clone(), p.elo)).map_err(|e| e.to_string())?;
    }
    let lookup = |name: &str| ids.get(name).copied().ok_or_else(|| format!("Unknown player: {}", name));
    for (a, b) in &body.forbidden {
        t.add_restriction(lookup(a)?, lookup(b)?).map_err(|e| e.to_string())?;
    }
    for round in &body.games {
        let mut results = Vec::with_capacity(round.len());
        for game in round {
            let white = lookup(&game.white)?;
            if game.bye {
                results.push(GameResult::Bye { player: white });
                continue;
            }
            let black_name = game
                .black
                .as_deref()
                .ok_or_else(|| "Black player missing for non-bye game".to_string())?;
            let black = lookup(black_name)?;
            let outcome = match game.result {
                Some(r) if r == 1.0 => Outcome::WhiteWins,
                Some(r) if r == 0.5 => Outcome::Draw,
                Some(r) if r == 0.0 => Outcome::BlackWins,
                Some(r) => return Err(format!("Invalid result {} (expected 1, 0.5 or 0)", r)),
                None => return Err(format!("Missing result for {} - {}", game.white, black_name)),
            };
            results.push(GameResult::Game { white, black, outcome });
        }
        apply_results(&mut t, &results).map_err(|e| e.to_string())?;
    }
    Ok(t)
}

fn board_with_names(t: &Tournament, m: &Match) -> BoardResponse {
    let name = |id: PlayerId| t.player(id).map(|p| p.name.clone()).unwrap_or_else(|| id.to_string());
    BoardResponse {
        white: name(m.white),
        black: m.black.map(name),
        bye: m.is_bye,
    }
}

/// Parse a TRF body and resolve the round to pair.
fn trf_round(state: &PairingConfig, body: &str, query: &RoundQuery) -> Result<(Tournament, u32), HttpResponse> {
    let doc = read_trf(body).map_err(|e| HttpResponse::BadRequest().json(error_json(e)))?;
    let mut t = doc.tournament;
    t.config = *state;
    let round = query.round.unwrap_or_else(|| t.next_round());
    Ok((t, round))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dubov-pairing",
    })
}

/// Pair the next round of a JSON roster with game history.
#[post("/api/round")]
async fn api_round(state: AppState, body: Json<RoundBody>) -> HttpResponse {
    let t = match tournament_from_body(&body, **state) {
        Ok(t) => t,
        Err(e) => return HttpResponse::BadRequest().json(error_json(e)),
    };
    let round = t.next_round();
    match generate_pairings(&t, round) {
        Ok(matches) => {
            log::info!("paired round {} for {} players", round, t.players.len());
            let boards: Vec<BoardResponse> = matches.iter().map(|m| board_with_names(&t, m)).collect();
            HttpResponse::Ok().json(boards)
        }
        Err(e) => pairing_error(&e),
    }
}

/// Pair a round of a TRF file (the next one unless `?round=` is given).
#[post("/api/trf/pairings")]
async fn api_trf_pairings(state: AppState, query: Query<RoundQuery>, body: String) -> HttpResponse {
    let (t, round) = match trf_round(&state, &body, &query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match generate_pairings(&t, round) {
        Ok(pairings) => HttpResponse::Ok().json(TrfPairingsResponse { round, pairings }),
        Err(e) => pairing_error(&e),
    }
}

/// Same as `/api/trf/pairings`, as a `White,Black` CSV table.
#[post("/api/trf/pairings.csv")]
async fn api_trf_pairings_csv(state: AppState, query: Query<RoundQuery>, body: String) -> HttpResponse {
    let (t, round) = match trf_round(&state, &body, &query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let matches = match generate_pairings(&t, round) {
        Ok(m) => m,
        Err(e) => return pairing_error(&e),
    };
    match pairings_to_csv(&t, &matches) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

/// Audit a recorded round of a TRF file.
#[post("/api/trf/check")]
async fn api_trf_check(state: AppState, query: Query<RoundQuery>, body: String) -> HttpResponse {
    let (t, round) = match trf_round(&state, &body, &query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match check_round(&t, round) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => pairing_error(&e),
    }
}

/// Play a random tournament and return it as TRF text.
#[post("/api/simulate")]
async fn api_simulate(body: Option<Json<SimulationConfig>>) -> HttpResponse {
    let config = body.map(|b| b.into_inner()).unwrap_or_default();
    match simulate_tournament(&config) {
        Ok(t) => {
            let header = TrfHeader {
                name: Some(format!("Simulated tournament (seed {})", config.seed)),
                start_date: Some(chrono::Utc::now().date_naive()),
                ..TrfHeader::default()
            };
            HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(write_trf(&t, &header))
        }
        Err(e) => pairing_error(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let mut config = PairingConfig::default();
    if let Some(limit) = std::env::var("PAIRING_MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()) {
        config.max_attempts = limit;
    }
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Pairing search limit: {} steps per round", config.max_attempts);

    let state = Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(4 * 1024 * 1024))
            .service(api_health)
            .service(api_round)
            .service(api_trf_pairings)
            .service(api_trf_pairings_csv)
            .service(api_trf_check)
            .service(api_simulate)
    })
    .bind(bind)?
    .run()
    .await
}
