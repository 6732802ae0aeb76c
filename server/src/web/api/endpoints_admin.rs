use crate::data_store::models::{AdminUpdate, NewAdminUser};
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

#[get("/admins")]
async fn list_admins(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let admins: Vec<hallbook_api_types::AdminAccount> =
        web::block(move || -> Result<_, APIError> {
            let mut store = state.store.get_facade()?;
            let auth = store.get_auth_token_for_session(session_token.as_ref())?;
            Ok(store.get_admins(&auth)?)
        })
        .await??
        .into_iter()
        .map(|a| a.into())
        .collect();

    Ok(web::Json(admins))
}

#[post("/admins")]
async fn create_admin(
    data: web::Json<hallbook_api_types::AdminAccount>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let account = data.into_inner();
    let password = account.password.unwrap_or_default();
    if account.username.trim().is_empty() || password.trim().is_empty() {
        return Err(APIError::InvalidData(
            "Username and password must not be empty".to_string(),
        ));
    }
    let username = account.username;
    let username_for_store = username.clone();
    let admin_id = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        Ok(store.create_admin(
            &auth,
            NewAdminUser {
                username: username_for_store,
                password,
            },
        )?)
    })
    .await??;

    Ok(HttpResponse::Created().json(hallbook_api_types::AdminAccount {
        id: Some(admin_id),
        username,
        password: None,
    }))
}

#[put("/admins/{admin_id}")]
async fn update_admin(
    path: web::Path<Uuid>,
    data: web::Json<hallbook_api_types::AdminAccount>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let admin_id = path.into_inner();
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let account = data.into_inner();
    if let Some(id) = account.id {
        if id != admin_id {
            return Err(APIError::EntityIdMissmatch);
        }
    }
    let update = AdminUpdate {
        username: account.username,
        password: account.password,
    };
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        store.update_admin(&auth, admin_id, update)?;
        Ok(())
    })
    .await??;

    Ok(HttpResponse::NoContent())
}
