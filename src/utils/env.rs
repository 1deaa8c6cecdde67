// src/utils/env.rs
use log::debug;

/// Load variables from a `.env` file if one exists. Missing files are fine;
/// the process environment always wins.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found; using process environment"),
    }
}
