use std::time::Duration;

use eyre::Result;
use jsonwebtoken::DecodingKey;
use tracing_subscriber::EnvFilter;

use survey_auth::jwt::session_from_token;
use survey_auth::session::{Role, Session};
use survey_client::HttpSurveyService;
use survey_core::filter::{GenderFilter, IdSelection, OwnerScope, StatusFilter};
use survey_core::quick_edit::EditDraft;
use survey_desk::board::{BoardView, SurveyBoard};
use survey_desk::config::{self, DeskConfig, StoredSession};

const USAGE: &str = "usage:
  survey-desk login <api-url> <user-id> <admin|teacher> <token>
  survey-desk logout
  survey-desk config
  survey-desk [list]
  survey-desk edit <survey-id> <start|-> <end|-> <required-participants>

list filters come from SURVEY_SCOPE, SURVEY_STATUS, SURVEY_QUERY,
SURVEY_GENDER, SURVEY_YEARS and SURVEY_DEPARTMENTS (comma separated).";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["login", api_url, user_id, role, token] => login(api_url, user_id, role, token),
        ["logout"] => config::delete_config(),
        ["config"] => show_config(),
        [] | ["list"] => {
            let board = open_board().await?;
            apply_env_filters(&board).await?;
            let result = board.refresh().await;
            print_notices(&board).await;
            result?;
            print_board(&board.view().await);
            board.close().await;
            Ok(())
        }
        ["edit", survey_id, start, end, required] => {
            let board = open_board().await?;
            board.refresh().await?;
            let result = quick_edit(&board, survey_id, start, end, required).await;
            print_notices(&board).await;
            board.close().await;
            result
        }
        _ => Err(eyre::eyre!("{USAGE}")),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("SURVEY_DESK_LOG_JSON").is_ok_and(|v| v == "1") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn login(api_url: &str, user_id: &str, role: &str, token: &str) -> Result<()> {
    let role: Role = role.parse()?;
    let mut desk_config = if config::has_config() {
        config::load_config()?
    } else {
        DeskConfig::new(api_url)
    };
    desk_config.api_base_url = api_url.to_string();
    desk_config.session = Some(StoredSession {
        user_id: user_id.to_string(),
        role,
        token: token.to_string(),
        email: None,
    });
    let path = config::save_config(&desk_config)?;
    println!("signed in as {user_id} ({role}); config at {}", path.display());
    Ok(())
}

fn show_config() -> Result<()> {
    let mut desk_config = config::load_config()?;
    desk_config.apply_env_overrides();
    let info = config::config_info(&desk_config);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Session from the stored sign-in. When `SURVEY_TOKEN_SECRET` is set the
/// token is verified and its claims replace the stored identity.
fn resolve_session(desk_config: &DeskConfig) -> Result<Session> {
    let stored = desk_config
        .session
        .as_ref()
        .ok_or_else(|| eyre::eyre!("not signed in\n\n{USAGE}"))?;

    match std::env::var("SURVEY_TOKEN_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let key = DecodingKey::from_secret(secret.as_bytes());
            Ok(session_from_token(&stored.token, &key)?)
        }
        _ => Ok(stored.to_session()),
    }
}

async fn open_board() -> Result<SurveyBoard<HttpSurveyService>> {
    let mut desk_config = config::load_config()?;
    desk_config.apply_env_overrides();
    let session = resolve_session(&desk_config)?;

    let service = HttpSurveyService::with_timeout(
        desk_config.api_base_url.clone(),
        Duration::from_secs(desk_config.request_timeout_secs),
    )?;
    tracing::info!(api = service.base_url(), role = %session.role, "opening survey board");
    Ok(SurveyBoard::new(service, session)?)
}

fn env_filter(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

async fn apply_env_filters(board: &SurveyBoard<HttpSurveyService>) -> Result<()> {
    if let Some(scope) = env_filter("SURVEY_SCOPE") {
        let scope = match scope.trim().to_ascii_lowercase().as_str() {
            "all" => OwnerScope::All,
            "mine" => OwnerScope::Mine,
            other => return Err(eyre::eyre!("unknown scope: {other}")),
        };
        board.set_scope(scope).await;
    }
    if let Some(status) = env_filter("SURVEY_STATUS") {
        board.set_status_filter(status.parse::<StatusFilter>()?).await;
    }
    if let Some(query) = env_filter("SURVEY_QUERY") {
        board.set_query(query).await;
    }
    if let Some(gender) = env_filter("SURVEY_GENDER") {
        board.set_gender_filter(gender.parse::<GenderFilter>()?).await;
    }
    if let Some(years) = env_filter("SURVEY_YEARS") {
        board
            .set_year_filter(IdSelection::from_inputs(years.split(',')))
            .await;
    }
    if let Some(departments) = env_filter("SURVEY_DEPARTMENTS") {
        board
            .set_department_filter(IdSelection::from_inputs(departments.split(',')))
            .await;
    }
    Ok(())
}

async fn quick_edit(
    board: &SurveyBoard<HttpSurveyService>,
    survey_id: &str,
    start: &str,
    end: &str,
    required: &str,
) -> Result<()> {
    let survey_id: i64 = survey_id.parse()?;
    let editable = board.open_edit(survey_id).await?;

    // "-" keeps the current value
    let start = if start == "-" { None } else { Some(EditDraft::parse_date_input(start)?) };
    let end = if end == "-" { None } else { Some(EditDraft::parse_date_input(end)?) };
    let required: i64 = required.parse()?;

    if start.is_some() && !editable.start_date {
        println!("start date of survey {survey_id} is locked; it will not be changed");
    }

    board
        .edit_draft(|draft| {
            if let Some(start) = start {
                draft.start_date = start;
            }
            if let Some(end) = end {
                draft.end_date = end;
            }
            draft.required_participants = required;
        })
        .await?;

    let updated = board.save_edit().await?;
    println!(
        "survey {} now runs {} → {} with target {}",
        updated.survey_id,
        updated.start_date.as_deref().unwrap_or("-"),
        updated.end_date.as_deref().unwrap_or("-"),
        updated.required_participants,
    );
    Ok(())
}

async fn print_notices(board: &SurveyBoard<HttpSurveyService>) {
    for notice in board.take_notices().await {
        eprintln!("[{:?}] {}", notice.level, notice.message);
    }
}

fn print_board(view: &BoardView) {
    let metrics = &view.metrics;
    println!(
        "{} surveys, {} responses",
        metrics.total_surveys, metrics.total_responses
    );
    let counts: Vec<String> = metrics
        .by_status
        .iter()
        .map(|(status, count)| format!("{}: {count}", status.label()))
        .collect();
    if !counts.is_empty() {
        println!("{}", counts.join("  "));
    }
    println!();

    for survey in &view.surveys {
        println!(
            "{:>6}  {:<9}  {:>4}/{:<4}  {} → {}  {}",
            survey.survey_id,
            survey.status.as_str(),
            survey.current_participants,
            survey.required_participants,
            survey
                .start_day()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            survey
                .end_day()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            survey.title,
        );
    }
}
