use crate::web::api::APIError;
use log::{error, warn};

pub async fn error_logging_middleware<B: actix_web::body::MessageBody>(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<B>,
) -> Result<actix_web::dev::ServiceResponse<B>, actix_web::Error> {
    let response = next.call(req).await?;

    if let Some(error) = response.response().error() {
        if let Some(api_error) = error.as_error::<APIError>() {
            match api_error {
                APIError::InvalidJson(e) => {
                    warn!(
                        "HTTP {} invalid JSON at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
                APIError::InvalidData(e) => {
                    warn!(
                        "HTTP {} invalid data at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
                APIError::PermissionDenied { required_privilege } => {
                    warn!(
                        "HTTP {} permission denied at <{}>. Client: <{}> Requires privilege: {:?}",
                        response.response().status(),
                        response.request().uri(),
                        response
                            .request()
                            .connection_info()
                            .realip_remote_addr()
                            .unwrap_or("unknown"),
                        required_privilege
                    );
                }
                APIError::InvalidSessionToken => {
                    warn!(
                        "HTTP {} invalid session token. Client: <{}>",
                        response.response().status(),
                        response
                            .request()
                            .connection_info()
                            .realip_remote_addr()
                            .unwrap_or("unknown")
                    );
                }
                APIError::InternalError(e) => {
                    error!(
                        "HTTP {} internal server error at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
                APIError::NotExisting
                | APIError::AlreadyExisting
                | APIError::SlotOccupied
                | APIError::RoomClosed
                | APIError::AlreadyDecided
                | APIError::UsernameTaken
                | APIError::AuthenticationFailed
                | APIError::EntityIdMissmatch => {}
            }
        }
    }

    Ok(response)
}
