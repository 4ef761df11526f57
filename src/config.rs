// src/config.rs

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use crate::{
    api::{ApiClient, AuthApi, CategoryApi, GodownApi, ProductApi},
    services::SessionStore,
};

// Everything a command handler needs: the API wrappers sharing one HTTP
// client, the restored session, and the fonts directory for the document
// export.
pub struct AppState {
    pub auth_api: AuthApi,
    pub products_api: ProductApi,
    pub categories_api: CategoryApi,
    pub godowns_api: GodownApi,
    pub session: SessionStore,
    pub fonts_dir: PathBuf,
}

impl AppState {
    // Reads the environment (a local .env is honored if present), wires up
    // the API layer and restores any persisted session.
    //
    //   RM_API_BASE_URL  backend base url, default http://localhost:1337/api
    //   RM_STATE_DIR     session slot directory, default <data dir>/rm-admin
    //   RM_FONTS_DIR     Roboto font files for the PDF export, default ./fonts
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("RM_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:1337/api".to_string());
        let state_dir = match env::var("RM_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .context("no data directory on this platform; set RM_STATE_DIR")?
                .join("rm-admin"),
        };
        let fonts_dir = env::var("RM_FONTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./fonts"));

        tracing::debug!("backend at {base_url}, state in {}", state_dir.display());

        let client = ApiClient::new(base_url);
        let mut session = SessionStore::new(state_dir);
        session.restore();

        Ok(Self {
            auth_api: AuthApi::new(client.clone()),
            products_api: ProductApi::new(client.clone()),
            categories_api: CategoryApi::new(client.clone()),
            godowns_api: GodownApi::new(client),
            session,
            fonts_dir,
        })
    }
}
