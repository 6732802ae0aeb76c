//! The backend part of the backend: the state interface
//!
//! The primary entry point to this module is the [memory::MemoryStore], an object implementing
//! the [HallbookStore] trait. This object can be shared between threads in a global application
//! state and be used to create [HallbookStoreFacade] instances for interaction with the stored
//! data. These provide a CRUD-like interface, using the data models from the [models] module.
//!
//! Per the project non-goals there is no persistence layer: the store holds all rooms, bookings
//! and admin accounts in process memory, guarded by a mutex, and loses them on shutdown. The
//! trait seam is kept anyway, so the web layer and the tests talk to the same interface and
//! other [HallbookStore] implementations could be added later.

use crate::auth_session::SessionToken;
use auth_token::{AuthToken, GlobalAuthToken, Privilege};
use chrono::naive::NaiveDate;

pub mod auth_token;
pub mod memory;
pub mod models;

pub type RoomId = uuid::Uuid;
pub type BookingId = uuid::Uuid;
pub type AdminId = uuid::Uuid;

pub trait HallbookStore: Send + Sync {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn HallbookStoreFacade + 'a>, StoreError>;
}

pub trait HallbookStoreFacade {
    fn get_rooms(&mut self, auth_token: &AuthToken) -> Result<Vec<models::Room>, StoreError>;
    fn get_room(
        &mut self,
        auth_token: &AuthToken,
        room_id: RoomId,
    ) -> Result<models::Room, StoreError>;
    /// Create a new room or update the existing room with the same id.
    ///
    /// # return value
    /// - `Ok(true)` if the room has been created, successfully
    /// - `Ok(false)` if an existing room has been updated, successfully
    /// - `Err(_)` if something went wrong, as usual
    fn create_or_update_room(
        &mut self,
        auth_token: &AuthToken,
        room: models::Room,
    ) -> Result<bool, StoreError>;
    /// Delete a room. All bookings of the room are deleted along with it.
    fn delete_room(&mut self, auth_token: &AuthToken, room_id: RoomId) -> Result<(), StoreError>;

    /// Get a filtered list of bookings
    ///
    /// Bookings are returned in chronological order, i.e. sorted by date
    fn get_bookings_filtered(
        &mut self,
        auth_token: &AuthToken,
        filter: BookingFilter,
    ) -> Result<Vec<models::Booking>, StoreError>;
    fn get_booking(
        &mut self,
        auth_token: &AuthToken,
        booking_id: BookingId,
    ) -> Result<models::Booking, StoreError>;
    /// Get the occupied (pending or approved) slots of all rooms, without booking details.
    ///
    /// Unlike the booking queries, this is available to anonymous requesters, so the calendar
    /// can be rendered without exposing contact data.
    fn get_slot_occupancy(
        &mut self,
        auth_token: &AuthToken,
    ) -> Result<Vec<models::SlotOccupancy>, StoreError>;
    /// Create a new booking request in Pending state and return the stored record with its
    /// assigned id.
    ///
    /// # errors
    /// - `Err(StoreError::NotExisting)` if the referenced room does not exist
    /// - `Err(StoreError::RoomClosed)` if the room is under maintenance
    /// - `Err(StoreError::SlotOccupied{..})` if the room already has an active (pending or
    ///   approved) booking on that date
    fn create_booking(
        &mut self,
        auth_token: &AuthToken,
        booking: models::NewBooking,
    ) -> Result<models::Booking, StoreError>;
    /// Apply an admin decision to a pending booking and return the updated record.
    ///
    /// Bookings are decided exactly once: deciding a booking that is not pending fails with
    /// [StoreError::AlreadyDecided].
    fn decide_booking(
        &mut self,
        auth_token: &AuthToken,
        booking_id: BookingId,
        decision: models::BookingDecision,
    ) -> Result<models::Booking, StoreError>;
    fn delete_booking(
        &mut self,
        auth_token: &AuthToken,
        booking_id: BookingId,
    ) -> Result<(), StoreError>;

    fn get_admins(&mut self, auth_token: &AuthToken) -> Result<Vec<models::AdminUser>, StoreError>;
    /// Create a new admin account and return its assigned id. Usernames are unique.
    fn create_admin(
        &mut self,
        auth_token: &AuthToken,
        admin: models::NewAdminUser,
    ) -> Result<AdminId, StoreError>;
    /// Update username and/or password of an admin account. Empty fields keep the previous
    /// value; username collisions with other accounts are rejected.
    fn update_admin(
        &mut self,
        auth_token: &AuthToken,
        admin_id: AdminId,
        update: models::AdminUpdate,
    ) -> Result<models::AdminUser, StoreError>;

    /// Try to authenticate a client as an admin with the given credentials.
    ///
    /// On success, the given session token is updated with the admin's id.
    fn authenticate_admin(
        &mut self,
        username: &str,
        password: &str,
        session_token: &mut SessionToken,
    ) -> Result<(), StoreError>;

    /// Get an [AuthToken] instance for a client, representing the client's access roles.
    ///
    /// Anonymous clients (no session token) get the Requester role; a session holding the id of
    /// an existing admin account additionally grants the Admin role.
    fn get_auth_token_for_session(
        &mut self,
        session_token: Option<&SessionToken>,
    ) -> Result<AuthToken, StoreError>;

    /// Replace the complete store content with the given seed data.
    fn import_seed_data(
        &mut self,
        auth_token: &GlobalAuthToken,
        data: models::SeedData,
    ) -> Result<(), StoreError>;
}

/// Filter options for retrieving bookings from the store via
/// HallbookStoreFacade::get_bookings_filtered()
///
/// Can be constructed through the BookingFilterBuilder
#[derive(Default)]
pub struct BookingFilter {
    /// Filter for bookings in any of the given states
    pub status: Option<Vec<models::BookingStatus>>,
    /// Filter for bookings of the given room
    pub room: Option<RoomId>,
    /// Filter for bookings on the given date
    pub date: Option<NaiveDate>,
    /// If true, only include active (pending or approved) bookings
    pub active_only: bool,
}

impl BookingFilter {
    /// Checks if a given booking matches the filter
    pub fn matches(&self, booking: &models::Booking) -> bool {
        if let Some(status) = &self.status {
            if !status.contains(&booking.status) {
                return false;
            }
        }
        if let Some(room) = self.room {
            if booking.room_id != room {
                return false;
            }
        }
        if let Some(date) = self.date {
            if booking.date != date {
                return false;
            }
        }
        if self.active_only && !booking.status.is_active() {
            return false;
        }
        true
    }
}

/// Builder for constructing BookingFilter objects
pub struct BookingFilterBuilder {
    result: BookingFilter,
}

impl BookingFilterBuilder {
    pub fn new() -> Self {
        Self {
            result: BookingFilter::default(),
        }
    }

    /// Add filter to only include bookings in one of the given states
    pub fn status_is_one_of(&mut self, status: Vec<models::BookingStatus>) -> &mut Self {
        self.result.status = Some(status);
        self
    }

    /// Add filter to only include bookings of the given room
    pub fn for_room(&mut self, room: RoomId) -> &mut Self {
        self.result.room = Some(room);
        self
    }

    /// Add filter to only include bookings on the given date
    pub fn on_date(&mut self, date: NaiveDate) -> &mut Self {
        self.result.date = Some(date);
        self
    }

    /// Add filter to only include active (pending or approved) bookings
    pub fn only_active(&mut self) -> &mut Self {
        self.result.active_only = true;
        self
    }

    /// Create the BookingFilter object
    pub fn build(self) -> BookingFilter {
        self.result
    }
}

impl Default for BookingFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// The requested entity does not exist
    NotExisting,
    /// The entity could not be created because it already exists, but cannot be updated with the
    /// provided data.
    ConflictEntityExists,
    /// The room already has an active (pending or approved) booking on the requested date.
    SlotOccupied { room_id: RoomId, date: NaiveDate },
    /// The room is under maintenance and does not accept new bookings.
    RoomClosed,
    /// The booking has already been approved or rejected and cannot be decided again.
    AlreadyDecided,
    /// The admin username is already in use by another account.
    UsernameTaken,
    /// Username/password combination did not match any admin account.
    AuthenticationFailed,
    /// The client is not authorized for this action. It would need to authenticate for an access
    /// role qualifying for the `required_privilege`.
    PermissionDenied { required_privilege: Privilege },
    /// The provided data is invalid, i.e. it does not match the expected ranges or violates a
    /// store constraint. See string description for details.
    InvalidInputData(String),
    /// The store mutex has been poisoned by a panicking thread.
    Poisoned(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExisting => f.write_str("Store record does not exist."),
            Self::ConflictEntityExists => f.write_str("Store record exists already."),
            Self::SlotOccupied { room_id, date } => write!(
                f,
                "Room {} already has an active booking on {}.",
                room_id, date
            ),
            Self::RoomClosed => {
                f.write_str("The room is under maintenance and cannot be booked.")
            }
            Self::AlreadyDecided => {
                f.write_str("The booking has already been decided and cannot be changed.")
            }
            Self::UsernameTaken => f.write_str("The username is already in use."),
            Self::AuthenticationFailed => {
                f.write_str("Username or password is not correct.")
            }
            Self::PermissionDenied { required_privilege } => {
                write!(
                    f,
                    "Client is not authorized to perform this action. {:?} privilege required.",
                    required_privilege
                )
            }
            Self::InvalidInputData(e) => {
                write!(f, "Data to be stored is not valid: {}", e)
            }
            Self::Poisoned(e) => write!(f, "Store state is poisoned: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}
