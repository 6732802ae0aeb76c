use crate::cli::file_io;
use crate::cli_error::CliError;
use crate::data_store::memory::MemoryStore;
use crate::data_store::HallbookStore;
use crate::notify::DecisionNotifier;
use crate::setup::{get_listen_address_from_env, get_listen_port_from_env, get_secret_from_env};
use actix_web::{middleware, web, App, HttpServer};
use log::warn;
use std::path::Path;
use std::sync::Arc;

pub mod api;
mod http_error_logging;

pub fn serve(seed_path: Option<&Path>) -> Result<(), CliError> {
    let store = Arc::new(MemoryStore::default());
    match seed_path {
        Some(path) => file_io::load_seed_from_file(store.as_ref(), path)?,
        None => {
            warn!(
                "No seed file given. Starting with the default admin account \"admin\" only; \
                 change its password via the API."
            );
            file_io::seed_default_admin(store.as_ref())?;
        }
    }
    let state = AppState::new(store)?;
    actix_web::rt::System::new()
        .block_on(
            HttpServer::new(move || {
                App::new()
                    .configure(api::configure_app)
                    .app_data(web::Data::new(state.clone()))
                    .wrap(middleware::from_fn(
                        http_error_logging::error_logging_middleware,
                    ))
                    .wrap(middleware::Compress::default())
            })
            .bind((get_listen_address_from_env()?, get_listen_port_from_env()?))
            .map_err(CliError::BindError)?
            .run(),
        )
        .map_err(CliError::ServerError)
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn HallbookStore>,
    secret: String,
    notifier: Arc<DecisionNotifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn HallbookStore>) -> Result<Self, CliError> {
        Ok(Self {
            store,
            secret: get_secret_from_env()?,
            notifier: Arc::new(DecisionNotifier::from_env()?),
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(store: Arc<dyn HallbookStore>) -> Self {
        Self {
            store,
            secret: "test-secret".to_string(),
            notifier: Arc::new(DecisionNotifier::new(
                crate::notify::NotifierConfig::default(),
            )),
        }
    }
}
