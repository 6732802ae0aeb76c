use crate::auth_session::SessionToken;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, web, Responder};
use hallbook_api_types::AuthorizationInfo;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct AuthorizeResponse {
    #[serde(flatten)]
    authorization_info: AuthorizationInfo,
    #[serde(rename = "sessionToken")]
    session_token: String,
}

#[get("/auth")]
async fn check_authorization(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let authorization_info = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        Ok(AuthorizationInfo {
            authorization: auth.list_api_access_roles(),
            logged_in: auth.is_admin(),
        })
    })
    .await??;
    Ok(web::Json(authorization_info))
}

#[post("/auth/login")]
async fn login(
    body: web::Json<LoginRequest>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?
        .unwrap_or_else(SessionToken::new);
    let store = state.store.clone();
    let (authorization_info, session_token) = {
        web::block(move || -> Result<_, APIError> {
            let mut session_token = session_token;
            let mut store = store.get_facade()?;
            store.authenticate_admin(&body.username, &body.password, &mut session_token)?;
            let auth = store.get_auth_token_for_session(Some(&session_token))?;
            Ok((
                AuthorizationInfo {
                    authorization: auth.list_api_access_roles(),
                    logged_in: auth.is_admin(),
                },
                session_token,
            ))
        })
        .await??
    };
    Ok(web::Json(AuthorizeResponse {
        authorization_info,
        session_token: session_token.as_string(&state.secret),
    }))
}

#[post("/auth/logout")]
async fn logout(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?
        .unwrap_or_else(SessionToken::new);
    let store = state.store.clone();
    let (authorization_info, session_token) = {
        web::block(move || -> Result<_, APIError> {
            let mut session_token = session_token;
            session_token.drop_authorizations();
            let mut store = store.get_facade()?;
            let auth = store.get_auth_token_for_session(Some(&session_token))?;
            Ok((
                AuthorizationInfo {
                    authorization: auth.list_api_access_roles(),
                    logged_in: auth.is_admin(),
                },
                session_token,
            ))
        })
        .await??
    };
    Ok(web::Json(AuthorizeResponse {
        authorization_info,
        session_token: session_token.as_string(&state.secret),
    }))
}
