use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::schedule::{Attendee, Court, MatchId, ScheduleBuilder, ScheduleState, TieBreak, TimeRange};
use crate::stats::{compute_pair_stats, compute_stats, MatchResult, WinRateBasis};

pub type SessionId = u64;

/// One scheduling session; owns its inputs and its schedule
pub struct Session {
    pub roster: Vec<Attendee>,
    pub courts: Vec<Court>,
    pub range: Option<TimeRange>,
    pub config: SchedulerConfig,
    pub schedule: ScheduleState,
}

impl Session {
    fn builder(&self, config: &SchedulerConfig) -> ScheduleBuilder {
        let mut builder = ScheduleBuilder::new(self.roster.clone(), self.courts.clone())
            .step_minutes(config.step_minutes)
            .tie_break(config.tie_break);
        if let Some(range) = self.range {
            builder = builder.range(range);
        }
        builder
    }
}

// In-memory session storage; every request holds the lock for one engine call
pub struct AppState {
    pub sessions: Mutex<HashMap<SessionId, Session>>,
    pub next_id: AtomicU64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionId, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("session store is unavailable"))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    roster: Vec<Attendee>,
    courts: Vec<Court>,
    #[serde(default)]
    range: Option<TimeRange>,
    #[serde(default)]
    config: SchedulerConfig,
}

#[derive(Deserialize)]
pub struct RegenerateRequest {
    seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct SwapRequest {
    match_id: MatchId,
    position: usize,
    name: String,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    match_id: MatchId,
    team: usize,
    value: u32,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    basis: Option<WinRateBasis>,
}

#[derive(Deserialize)]
pub struct StatsRequest {
    matches: Vec<MatchResult>,
    #[serde(default)]
    basis: WinRateBasis,
}

fn error_response(e: &ScheduleError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": e.to_string()});
    match e {
        ScheduleError::UnknownMatch(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn session_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"success": false, "error": "Session not found"}))
}

fn schedule_body(id: SessionId, schedule: &ScheduleState) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "id": id,
        "schedule": schedule,
        "summary": schedule.player_summaries(),
    })
}

// Build a schedule and open a session for it
async fn create_session(
    req: web::Json<CreateSessionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut session = Session {
        roster: req.roster,
        courts: req.courts,
        range: req.range,
        config: req.config,
        schedule: ScheduleState::default(),
    };
    session.schedule = match session.builder(&session.config).build() {
        Ok(schedule) => schedule,
        Err(e) => return Ok(error_response(&e)),
    };

    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    let body = schedule_body(id, &session.schedule);
    info!(
        "Session {} created: {} attendees, {} courts, {} matches",
        id,
        session.roster.len(),
        session.courts.len(),
        session.schedule.matches.len()
    );
    state.sessions()?.insert(id, session);

    Ok(HttpResponse::Created().json(body))
}

async fn get_session(
    id: web::Path<SessionId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let sessions = state.sessions()?;
    match sessions.get(&id) {
        Some(session) => Ok(HttpResponse::Ok().json(schedule_body(id, &session.schedule))),
        None => Ok(session_not_found()),
    }
}

// Rebuild from scratch; manual edits are lost
async fn regenerate(
    id: web::Path<SessionId>,
    req: Option<web::Json<RegenerateRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let mut sessions = state.sessions()?;
    let Some(session) = sessions.get_mut(&id) else {
        return Ok(session_not_found());
    };

    // the new seed sticks only if the rebuild succeeds
    let mut config = session.config;
    if let Some(seed) = req.and_then(|r| r.into_inner().seed) {
        config.tie_break = TieBreak::Seeded(seed);
    }
    let schedule = match session.builder(&config).build() {
        Ok(schedule) => schedule,
        Err(e) => return Ok(error_response(&e)),
    };
    let discarded_edits = session.schedule.manually_edited;
    session.config = config;
    session.schedule = schedule;
    info!("Session {} regenerated (discarded edits: {})", id, discarded_edits);

    let mut body = schedule_body(id, &session.schedule);
    body["discarded_edits"] = serde_json::json!(discarded_edits);
    Ok(HttpResponse::Ok().json(body))
}

async fn swap_player(
    id: web::Path<SessionId>,
    req: web::Json<SwapRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let mut sessions = state.sessions()?;
    let Some(session) = sessions.get_mut(&id) else {
        return Ok(session_not_found());
    };

    match session.schedule.swap_player(req.match_id, req.position, &req.name) {
        Ok(outcome) => {
            let mut body = schedule_body(id, &session.schedule);
            body["outcome"] = serde_json::json!(outcome);
            Ok(HttpResponse::Ok().json(body))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn reset_assignments(
    id: web::Path<SessionId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let mut sessions = state.sessions()?;
    let Some(session) = sessions.get_mut(&id) else {
        return Ok(session_not_found());
    };

    let outcome = session.schedule.reset_all_assignments();
    let mut body = schedule_body(id, &session.schedule);
    body["outcome"] = serde_json::json!(outcome);
    Ok(HttpResponse::Ok().json(body))
}

async fn set_score(
    id: web::Path<SessionId>,
    req: web::Json<ScoreRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let mut sessions = state.sessions()?;
    let Some(session) = sessions.get_mut(&id) else {
        return Ok(session_not_found());
    };

    if let Err(e) = session.schedule.set_score(req.match_id, req.team, req.value) {
        return Ok(error_response(&e));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "match": session.schedule.match_by_id(req.match_id),
    })))
}

// Standings over the session's own matches
async fn session_stats(
    id: web::Path<SessionId>,
    query: web::Query<StatsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let sessions = state.sessions()?;
    let Some(session) = sessions.get(&id) else {
        return Ok(session_not_found());
    };

    let basis = query.basis.unwrap_or(session.config.win_rate);
    let results: Vec<MatchResult> = session
        .schedule
        .matches
        .iter()
        .filter(|m| m.is_completed())
        .map(MatchResult::from)
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "players": compute_stats(&results, basis),
        "pairs": compute_pair_stats(&results, basis),
    })))
}

// Standings over caller-supplied matches
async fn stats(req: web::Json<StatsRequest>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "players": compute_stats(&req.matches, req.basis),
        "pairs": compute_pair_stats(&req.matches, req.basis),
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/sessions", web::post().to(create_session))
        .route("/api/sessions/{id}", web::get().to(get_session))
        .route("/api/sessions/{id}/regenerate", web::post().to(regenerate))
        .route("/api/sessions/{id}/swap", web::post().to(swap_player))
        .route("/api/sessions/{id}/reset", web::post().to(reset_assignments))
        .route("/api/sessions/{id}/score", web::post().to(set_score))
        .route("/api/sessions/{id}/stats", web::get().to(session_stats))
        .route("/api/stats", web::post().to(stats));
}

pub async fn start_server(port: u16) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
