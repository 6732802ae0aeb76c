use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use uuid::Uuid;

#[get("/rooms")]
async fn list_rooms(
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let rooms: Vec<hallbook_api_types::Room> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        Ok(store.get_rooms(&auth)?)
    })
    .await??
    .into_iter()
    .map(|r| r.into())
    .collect();

    Ok(web::Json(rooms))
}

#[put("/rooms/{room_id}")]
async fn create_or_update_room(
    path: web::Path<Uuid>,
    data: web::Json<hallbook_api_types::Room>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let room_id = path.into_inner();
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let room = data.into_inner();
    if room_id != room.id {
        return Err(APIError::EntityIdMissmatch);
    }
    let created = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        Ok(store.create_or_update_room(&auth, room.into())?)
    })
    .await??;

    if created {
        Ok(HttpResponse::Created())
    } else {
        Ok(HttpResponse::NoContent())
    }
}

#[delete("/rooms/{room_id}")]
async fn delete_room(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let room_id = path.into_inner();
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        store.delete_room(&auth, room_id)?;
        Ok(())
    })
    .await??;

    Ok(HttpResponse::NoContent())
}
