use crate::data_store::{AdminId, BookingId, RoomId};
use chrono::naive::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomStatus {
    Available,
    UnderMaintenance,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub status: RoomStatus,
}

impl From<hallbook_api_types::RoomStatus> for RoomStatus {
    fn from(value: hallbook_api_types::RoomStatus) -> Self {
        match value {
            hallbook_api_types::RoomStatus::Available => Self::Available,
            hallbook_api_types::RoomStatus::UnderMaintenance => Self::UnderMaintenance,
        }
    }
}

impl From<RoomStatus> for hallbook_api_types::RoomStatus {
    fn from(value: RoomStatus) -> Self {
        match value {
            RoomStatus::Available => Self::Available,
            RoomStatus::UnderMaintenance => Self::UnderMaintenance,
        }
    }
}

impl From<hallbook_api_types::Room> for Room {
    fn from(value: hallbook_api_types::Room) -> Self {
        Self {
            id: value.id,
            name: value.name,
            status: value.status.into(),
        }
    }
}

impl From<Room> for hallbook_api_types::Room {
    fn from(value: Room) -> Self {
        Self {
            id: value.id,
            name: value.name,
            status: value.status.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    /// Active bookings occupy their calendar slot: pending and approved ones, not rejected ones.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }
}

impl From<hallbook_api_types::BookingStatus> for BookingStatus {
    fn from(value: hallbook_api_types::BookingStatus) -> Self {
        match value {
            hallbook_api_types::BookingStatus::Pending => Self::Pending,
            hallbook_api_types::BookingStatus::Approved => Self::Approved,
            hallbook_api_types::BookingStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<BookingStatus> for hallbook_api_types::BookingStatus {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Approved => Self::Approved,
            BookingStatus::Rejected => Self::Rejected,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequesterType {
    ClubPresident,
    Student,
}

impl From<hallbook_api_types::RequesterType> for RequesterType {
    fn from(value: hallbook_api_types::RequesterType) -> Self {
        match value {
            hallbook_api_types::RequesterType::ClubPresident => Self::ClubPresident,
            hallbook_api_types::RequesterType::Student => Self::Student,
        }
    }
}

impl From<RequesterType> for hallbook_api_types::RequesterType {
    fn from(value: RequesterType) -> Self {
        match value {
            RequesterType::ClubPresident => Self::ClubPresident,
            RequesterType::Student => Self::Student,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub date: NaiveDate,
    pub requester_type: RequesterType,
    pub club_name: String,
    pub activity_name: String,
    pub reason: Option<String>,
    pub requester_name: String,
    pub university_id: String,
    pub email: String,
    pub contact_number: String,
    pub status: BookingStatus,
    pub rejection_reason: Option<String>,
}

impl From<hallbook_api_types::Booking> for Booking {
    fn from(value: hallbook_api_types::Booking) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            date: value.date,
            requester_type: value.requester_type.into(),
            club_name: value.club_name,
            activity_name: value.activity_name,
            reason: value.reason,
            requester_name: value.requester_name,
            university_id: value.university_id,
            email: value.email,
            contact_number: value.contact_number,
            status: value.status.into(),
            rejection_reason: value.rejection_reason,
        }
    }
}

impl From<Booking> for hallbook_api_types::Booking {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            date: value.date,
            requester_type: value.requester_type.into(),
            club_name: value.club_name,
            activity_name: value.activity_name,
            reason: value.reason,
            requester_name: value.requester_name,
            university_id: value.university_id,
            email: value.email,
            contact_number: value.contact_number,
            status: value.status.into(),
            rejection_reason: value.rejection_reason,
        }
    }
}

/// The data of a booking request before the store assigns an id and the Pending status.
#[derive(Clone, Debug)]
pub struct NewBooking {
    pub room_id: RoomId,
    pub date: NaiveDate,
    pub requester_type: RequesterType,
    pub club_name: String,
    pub activity_name: String,
    pub reason: Option<String>,
    pub requester_name: String,
    pub university_id: String,
    pub email: String,
    pub contact_number: String,
}

impl NewBooking {
    pub fn from_api(value: hallbook_api_types::BookingRequest) -> Self {
        Self {
            room_id: value.room_id,
            date: value.date,
            requester_type: value.requester_type.into(),
            club_name: value.club_name,
            activity_name: value.activity_name,
            reason: value.reason,
            requester_name: value.requester_name,
            university_id: value.university_id,
            email: value.email,
            contact_number: value.contact_number,
        }
    }

    pub(super) fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            room_id: self.room_id,
            date: self.date,
            requester_type: self.requester_type,
            club_name: self.club_name,
            activity_name: self.activity_name,
            reason: self.reason,
            requester_name: self.requester_name,
            university_id: self.university_id,
            email: self.email,
            contact_number: self.contact_number,
            status: BookingStatus::Pending,
            rejection_reason: None,
        }
    }
}

/// An occupied calendar slot: an active booking reduced to the fields the public calendar needs.
/// Requester contact data stays in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotOccupancy {
    pub room_id: RoomId,
    pub date: NaiveDate,
    pub status: BookingStatus,
}

/// An admin decision on a pending booking. A rejection always carries a reason; this is enforced
/// at the API boundary.
#[derive(Clone, Debug)]
pub enum BookingDecision {
    Approve,
    Reject { reason: String },
}

#[derive(Clone, Debug)]
pub struct AdminUser {
    pub id: AdminId,
    pub username: String,
    /// Stored and compared in plaintext. See the project non-goals.
    pub password: String,
}

impl From<AdminUser> for hallbook_api_types::AdminAccount {
    fn from(value: AdminUser) -> Self {
        Self {
            id: Some(value.id),
            username: value.username,
            // Passwords never leave the store through the API.
            password: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewAdminUser {
    pub username: String,
    pub password: String,
}

/// Changes to an admin account. Empty strings keep the previous value, matching the edit form
/// semantics of the admin view.
#[derive(Clone, Debug)]
pub struct AdminUpdate {
    pub username: String,
    pub password: Option<String>,
}

impl NewAdminUser {
    pub(super) fn into_admin(self, id: AdminId) -> AdminUser {
        AdminUser {
            id,
            username: self.username,
            password: self.password,
        }
    }
}

/// A full store content for seed import.
#[derive(Clone, Debug, Default)]
pub struct SeedData {
    pub rooms: Vec<Room>,
    pub bookings: Vec<Booking>,
    pub admins: Vec<AdminUser>,
}
