use crate::data_store::models::{BookingDecision, NewBooking};
use crate::data_store::BookingFilterBuilder;
use crate::web::api::{validation, APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
struct BookingListQuery {
    status: Option<hallbook_api_types::BookingStatus>,
    room: Option<Uuid>,
}

#[get("/bookings")]
async fn list_bookings(
    query: web::Query<BookingListQuery>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let query = query.into_inner();
    let bookings: Vec<hallbook_api_types::Booking> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        let mut filter_builder = BookingFilterBuilder::new();
        if let Some(status) = query.status {
            filter_builder.status_is_one_of(vec![status.into()]);
        }
        if let Some(room) = query.room {
            filter_builder.for_room(room);
        }
        Ok(store.get_bookings_filtered(&auth, filter_builder.build())?)
    })
    .await??
    .into_iter()
    .map(|b| b.into())
    .collect();

    Ok(web::Json(bookings))
}

#[get("/bookings/{booking_id}")]
async fn get_booking(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let booking_id = path.into_inner();
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let booking: hallbook_api_types::Booking = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        Ok(store.get_booking(&auth, booking_id)?)
    })
    .await??
    .into();

    Ok(web::Json(booking))
}

#[post("/bookings")]
async fn create_booking(
    data: web::Json<hallbook_api_types::BookingRequest>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let request = data.into_inner();
    let today = chrono::Utc::now().date_naive();
    validation::validate_booking_request(&request, today).map_err(APIError::InvalidData)?;
    let booking: hallbook_api_types::Booking = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        Ok(store.create_booking(&auth, NewBooking::from_api(request))?)
    })
    .await??
    .into();

    Ok(HttpResponse::Created().json(booking))
}

#[post("/bookings/{booking_id}/decision")]
async fn decide_booking(
    path: web::Path<Uuid>,
    data: web::Json<hallbook_api_types::BookingDecision>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let booking_id = path.into_inner();
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let decision = match data.into_inner() {
        hallbook_api_types::BookingDecision {
            decision: hallbook_api_types::Decision::Approved,
            ..
        } => BookingDecision::Approve,
        hallbook_api_types::BookingDecision {
            decision: hallbook_api_types::Decision::Rejected,
            rejection_reason,
        } => {
            let reason = rejection_reason.unwrap_or_default();
            if reason.trim().is_empty() {
                return Err(APIError::InvalidData(
                    "A rejection must state a reason".to_string(),
                ));
            }
            BookingDecision::Reject { reason }
        }
    };
    let state_for_block = state.clone();
    let (booking, room_name) = web::block(move || -> Result<_, APIError> {
        let mut store = state_for_block.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        let booking = store.decide_booking(&auth, booking_id, decision)?;
        let room_name = store.get_room(&auth, booking.room_id)?.name;
        Ok((booking, room_name))
    })
    .await??;

    // Fire-and-forget: the decision stands even if drafting the notification fails.
    let notifier = state.notifier.clone();
    let booking_for_notification = booking.clone();
    actix_web::rt::spawn(async move {
        notifier
            .notify_decision(&booking_for_notification, &room_name)
            .await;
    });

    let booking: hallbook_api_types::Booking = booking.into();
    Ok(web::Json(booking))
}

#[delete("/bookings/{booking_id}")]
async fn delete_booking(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let booking_id = path.into_inner();
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        store.delete_booking(&auth, booking_id)?;
        Ok(())
    })
    .await??;

    Ok(HttpResponse::NoContent())
}
