use crate::data_store::models::{BookingStatus, Room, RoomStatus, SlotOccupancy};
use crate::data_store::RoomId;
use crate::web::api::{APIError, SessionTokenHeader};
use crate::web::AppState;
use actix_web::{get, web, Responder};
use chrono::{Datelike, NaiveDate};
use hallbook_api_types::{Calendar, CalendarDay, CalendarRow, SlotState};
use std::collections::HashMap;

#[get("/calendar/{year}/{month}")]
async fn get_calendar(
    path: web::Path<(i32, u32)>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let (year, month) = path.into_inner();
    if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(APIError::InvalidData(format!(
            "{}/{} is not a valid month",
            year, month
        )));
    }
    let session_token = session_token_header
        .map(|token_header| token_header.into_inner().session_token(&state.secret))
        .transpose()?;
    let (rooms, occupancy) = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_auth_token_for_session(session_token.as_ref())?;
        let rooms = store.get_rooms(&auth)?;
        let occupancy = store.get_slot_occupancy(&auth)?;
        Ok((rooms, occupancy))
    })
    .await??;

    let today = chrono::Utc::now().date_naive();
    Ok(web::Json(build_calendar(
        year, month, today, rooms, &occupancy,
    )))
}

/// Assemble the calendar grid for one month.
///
/// Every room gets one row with a cell per day of the month. In the current month, days before
/// `today` are left out. A room under maintenance renders as Closed on all days; otherwise the
/// cell reflects the active booking on that slot, if any. Rejected bookings are not part of the
/// occupancy and therefore leave their slot Free.
fn build_calendar(
    year: i32,
    month: u32,
    today: NaiveDate,
    rooms: Vec<Room>,
    occupancy: &[SlotOccupancy],
) -> Calendar {
    let days: Vec<NaiveDate> = (1..=31)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| !(year == today.year() && month == today.month()) || *date >= today)
        .collect();
    let occupied: HashMap<(RoomId, NaiveDate), BookingStatus> = occupancy
        .iter()
        .map(|slot| ((slot.room_id, slot.date), slot.status))
        .collect();

    let rows = rooms
        .into_iter()
        .map(|room| {
            let days = days
                .iter()
                .map(|date| CalendarDay {
                    date: *date,
                    state: if room.status == RoomStatus::UnderMaintenance {
                        SlotState::Closed
                    } else {
                        match occupied.get(&(room.id, *date)) {
                            Some(BookingStatus::Approved) => SlotState::Booked,
                            Some(_) => SlotState::Pending,
                            None => SlotState::Free,
                        }
                    },
                })
                .collect();
            CalendarRow {
                room: room.into(),
                days,
            }
        })
        .collect();

    Calendar { year, month, rows }
}
