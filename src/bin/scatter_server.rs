use scatter_lasso::config::ViewerConfig;
use scatter_lasso::server::{dispatch, error_codes, Request, Response, SessionState};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

fn config_path() -> Option<PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SCATTER_LASSO_CONFIG").ok())
        .map(PathBuf::from)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match config_path() {
        Some(path) => ViewerConfig::load_or_default(&path),
        None => ViewerConfig::default(),
    };

    log::info!("Starting scatter lasso session server...");
    let mut state = SessionState::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("Error reading stdin: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                log::debug!("-> {}", request.method);
                dispatch(&mut state, request)
            }
            Err(e) => {
                log::warn!("Failed to parse request: {}", e);
                Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    log::info!("Shutting down...");
    Ok(())
}
