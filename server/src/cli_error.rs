use crate::data_store::StoreError;
use crate::setup::SetupError;

#[derive(Debug)]
pub enum CliError {
    /// The application setup (environment variables) are not complete or invalid
    SetupError(String),
    /// Somehow, our data_store abstraction failed during startup or seed loading
    UnexpectedStoreError(String),
    /// Binding the web server to the requested port failed
    BindError(std::io::Error),
    /// Starting the web server failed with an io error
    ServerError(std::io::Error),
    /// Failure while handling the seed file
    FileError(String),
    /// Could not complete command because the provided data (e.g. the seed file) is not valid
    DataError(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SetupError { .. } => 1,
            CliError::DataError(_) => 1,
            CliError::FileError(_) => 1,
            CliError::UnexpectedStoreError(_) => 2,
            CliError::BindError(_) => 3,
            CliError::ServerError(_) => 3,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::SetupError(e) => {
                write!(f, "Setup invalid: {}", e)
            }
            CliError::DataError(e) => {
                write!(f, "Provided data is invalid: {}", e)
            }
            CliError::FileError(e) => f.write_str(e),
            CliError::UnexpectedStoreError(e) => {
                write!(f, "Unexpected error in data store: {}", e)
            }
            CliError::BindError(e) => {
                write!(f, "Could not bind web server socket to TCP port: {}", e)
            }
            CliError::ServerError(e) => write!(f, "Could not initialize web server: {}", e),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotExisting => Self::DataError("Item not existing".to_string()),
            StoreError::ConflictEntityExists => {
                Self::DataError("Conflicting entity exists".to_string())
            }
            StoreError::SlotOccupied { room_id, date } => Self::DataError(format!(
                "Room {} already has an active booking on {}",
                room_id, date
            )),
            StoreError::RoomClosed => Self::DataError("Room is under maintenance".to_string()),
            StoreError::AlreadyDecided => {
                Self::DataError("Booking has already been decided".to_string())
            }
            StoreError::UsernameTaken => Self::DataError("Username is already taken".to_string()),
            StoreError::AuthenticationFailed => {
                Self::DataError("Authentication failed".to_string())
            }
            StoreError::PermissionDenied { required_privilege } => Self::UnexpectedStoreError(
                format!("Missing data_store privilege: {:?}", required_privilege),
            ),
            StoreError::InvalidInputData(e) => Self::DataError(e),
            StoreError::Poisoned(e) => Self::UnexpectedStoreError(e),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::DataError(value.to_string())
    }
}

impl From<SetupError> for CliError {
    fn from(value: SetupError) -> Self {
        Self::SetupError(value.to_string())
    }
}
