use crate::cli::CliAuthTokenKey;
use crate::cli_error::CliError;
use crate::data_store::auth_token::GlobalAuthToken;
use crate::data_store::{models, HallbookStore};
use hallbook_api_types::{Booking, Room};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use uuid::Uuid;

/// Default admin credentials when the server is started without a seed file. These match the
/// account the administrators are told to change first.
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password123";

#[derive(Serialize, Deserialize)]
struct SeedFile {
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    bookings: Vec<Booking>,
    #[serde(default)]
    admins: Vec<SeedAdmin>,
}

#[derive(Serialize, Deserialize)]
struct SeedAdmin {
    #[serde(default)]
    id: Option<Uuid>,
    username: String,
    password: String,
}

/// Load rooms, bookings and admin accounts from a JSON seed file into the store, replacing its
/// current content.
pub fn load_seed_from_file(store: &dyn HallbookStore, path: &Path) -> Result<(), CliError> {
    let f = File::open(path).map_err(|e| {
        CliError::FileError(format!("Could not open {:?} for reading: {}", path, e))
    })?;
    let data: SeedFile = serde_json::from_reader(BufReader::new(f))?;

    let auth_key = CliAuthTokenKey::new();
    let admin_auth_token = GlobalAuthToken::create_for_cli(&auth_key);
    let seed_data = models::SeedData {
        rooms: data.rooms.into_iter().map(|r| r.into()).collect(),
        bookings: data.bookings.into_iter().map(|b| b.into()).collect(),
        admins: data
            .admins
            .into_iter()
            .map(|a| models::AdminUser {
                id: a.id.unwrap_or_else(Uuid::now_v7),
                username: a.username,
                password: a.password,
            })
            .collect(),
    };

    let mut data_store = store.get_facade()?;
    data_store.import_seed_data(&admin_auth_token, seed_data)?;

    Ok(())
}

/// Seed the store with the default admin account only.
pub fn seed_default_admin(store: &dyn HallbookStore) -> Result<(), CliError> {
    let auth_key = CliAuthTokenKey::new();
    let admin_auth_token = GlobalAuthToken::create_for_cli(&auth_key);
    let mut data_store = store.get_facade()?;
    data_store.import_seed_data(
        &admin_auth_token,
        models::SeedData {
            rooms: vec![],
            bookings: vec![],
            admins: vec![models::AdminUser {
                id: Uuid::now_v7(),
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password: DEFAULT_ADMIN_PASSWORD.to_string(),
            }],
        },
    )?;
    Ok(())
}
