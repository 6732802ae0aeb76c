use std::fmt::Display;

mod endpoints_admin;
mod endpoints_auth;
mod endpoints_booking;
mod endpoints_calendar;
mod endpoints_room;
mod validation;

#[cfg(test)]
mod tests;

use crate::auth_session::SessionToken;
use crate::data_store::auth_token::Privilege;
use crate::data_store::StoreError;
use actix_web::error::JsonPayloadError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    web, HttpResponse,
};
use serde_json::json;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(get_api_service());
}

fn get_api_service() -> actix_web::Scope {
    let json_config =
        web::JsonConfig::default().error_handler(|err, _req| APIError::InvalidJson(err).into());
    web::scope("/api/v1")
        .app_data(json_config)
        .service(endpoints_auth::login)
        .service(endpoints_auth::logout)
        .service(endpoints_auth::check_authorization)
        .service(endpoints_room::list_rooms)
        .service(endpoints_room::create_or_update_room)
        .service(endpoints_room::delete_room)
        .service(endpoints_calendar::get_calendar)
        .service(endpoints_booking::list_bookings)
        .service(endpoints_booking::get_booking)
        .service(endpoints_booking::create_booking)
        .service(endpoints_booking::decide_booking)
        .service(endpoints_booking::delete_booking)
        .service(endpoints_admin::list_admins)
        .service(endpoints_admin::create_admin)
        .service(endpoints_admin::update_admin)
}

#[derive(Debug)]
pub enum APIError {
    NotExisting,
    AlreadyExisting,
    SlotOccupied,
    RoomClosed,
    AlreadyDecided,
    UsernameTaken,
    PermissionDenied {
        required_privilege: Privilege,
    },
    InvalidSessionToken,
    AuthenticationFailed,
    InvalidJson(actix_web::error::JsonPayloadError),
    InvalidData(String),
    EntityIdMissmatch,
    InternalError(String),
}

impl Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExisting => f.write_str("Element does not exist")?,
            Self::AlreadyExisting => {
                f.write_str("Element already exists")?;
            }
            Self::SlotOccupied => {
                f.write_str("The room already has an active booking on this date")?;
            }
            Self::RoomClosed => {
                f.write_str("The room is under maintenance and cannot be booked")?;
            }
            Self::AlreadyDecided => {
                f.write_str("The booking has already been approved or rejected")?;
            }
            Self::UsernameTaken => {
                f.write_str("The username is already in use")?;
            }
            Self::PermissionDenied { required_privilege } => {
                write!(
                    f,
                    "Client is not authorized to perform this action. Authentication as {} is required.",
                    required_privilege
                        .qualifying_roles()
                        .iter()
                        .map(|role| role.name().to_owned())
                        .collect::<Vec<String>>()
                        .join(" or ")
                )?;
            }
            Self::InvalidSessionToken => {
                f.write_str("The authentication session token given by the client is not valid.")?
            }
            Self::AuthenticationFailed => {
                f.write_str("Username or password is not correct.")?;
            }
            Self::InternalError(s) => {
                f.write_str("Internal error: ")?;
                f.write_str(s)?;
            }
            Self::InvalidJson(e) => {
                write!(f, "Invalid JSON request data: {}", e)?;
            }
            Self::InvalidData(e) => {
                write!(f, "Invalid request data: {}", e)?;
            }
            Self::EntityIdMissmatch => {
                f.write_str("Entity id in given data does not match URL")?;
            }
        };
        Ok(())
    }
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse {
        let message = format!("{}", self);

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({
                "httpCode": self.status_code().as_u16(),
                "message": message
            }))
    }
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotExisting => StatusCode::NOT_FOUND,
            Self::AlreadyExisting => StatusCode::CONFLICT,
            Self::SlotOccupied => StatusCode::CONFLICT,
            Self::RoomClosed => StatusCode::CONFLICT,
            Self::AlreadyDecided => StatusCode::CONFLICT,
            Self::UsernameTaken => StatusCode::CONFLICT,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::InvalidSessionToken => StatusCode::FORBIDDEN,
            Self::AuthenticationFailed => StatusCode::FORBIDDEN,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidJson(e) => match e {
                JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                JsonPayloadError::Deserialize(json_error) if json_error.is_data() => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::InvalidData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EntityIdMissmatch => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotExisting => Self::NotExisting,
            StoreError::ConflictEntityExists => Self::AlreadyExisting,
            StoreError::SlotOccupied { .. } => Self::SlotOccupied,
            StoreError::RoomClosed => Self::RoomClosed,
            StoreError::AlreadyDecided => Self::AlreadyDecided,
            StoreError::UsernameTaken => Self::UsernameTaken,
            StoreError::AuthenticationFailed => Self::AuthenticationFailed,
            StoreError::PermissionDenied { required_privilege } => {
                Self::PermissionDenied { required_privilege }
            }
            StoreError::InvalidInputData(e) => Self::InvalidData(e),
            StoreError::Poisoned(e) => Self::InternalError(format!("Store state poisoned: {}", e)),
        }
    }
}

impl From<actix_web::error::BlockingError> for APIError {
    fn from(_e: actix_web::error::BlockingError) -> Self {
        APIError::InternalError(
            "Could not get thread from thread pool for synchronous store operation.".to_owned(),
        )
    }
}

impl From<crate::auth_session::SessionError> for APIError {
    fn from(_e: crate::auth_session::SessionError) -> Self {
        APIError::InvalidSessionToken
    }
}

struct SessionTokenHeader(String);
const SESSION_TOKEN_MAX_AGE: std::time::Duration = std::time::Duration::from_secs(86400);

impl SessionTokenHeader {
    fn session_token(
        &self,
        secret: &str,
    ) -> Result<crate::auth_session::SessionToken, crate::auth_session::SessionError> {
        SessionToken::from_string(&self.0, secret, SESSION_TOKEN_MAX_AGE)
    }
}

impl actix_web::http::header::TryIntoHeaderValue for SessionTokenHeader {
    type Error = actix_web::http::header::InvalidHeaderValue;

    fn try_into_value(self) -> Result<actix_web::http::header::HeaderValue, Self::Error> {
        self.0.parse()
    }
}

impl actix_web::http::header::Header for SessionTokenHeader {
    fn name() -> actix_web::http::header::HeaderName {
        "X-SESSION-TOKEN"
            .try_into()
            .expect("Session Token Header name should be a valid header name")
    }

    fn parse<M: actix_web::HttpMessage>(msg: &M) -> Result<Self, actix_web::error::ParseError> {
        Ok(Self(
            msg.headers()
                .get(Self::name())
                .ok_or(actix_web::error::ParseError::Header)?
                .to_str()
                .unwrap_or("")
                .to_owned(),
        ))
    }
}
