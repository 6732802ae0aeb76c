use chrono::naive::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn not(v: &bool) -> bool {
    !v
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomStatus {
    Available,
    UnderMaintenance,
}

fn default_room_status() -> RoomStatus {
    RoomStatus::Available
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_room_status")]
    pub status: RoomStatus,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequesterType {
    ClubPresident,
    Student,
}

/// A booking record as reported to admin clients.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Booking {
    pub id: Uuid,
    #[serde(rename = "roomId")]
    pub room_id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "requesterType")]
    pub requester_type: RequesterType,
    #[serde(default, rename = "clubName")]
    pub club_name: String,
    #[serde(rename = "activityName")]
    pub activity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "requesterName")]
    pub requester_name: String,
    #[serde(rename = "universityId")]
    pub university_id: String,
    pub email: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
    pub status: BookingStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "rejectionReason"
    )]
    pub rejection_reason: Option<String>,
}

/// The data a requester submits to ask for a room slot. The server assigns
/// the id and the Pending status.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BookingRequest {
    #[serde(rename = "roomId")]
    pub room_id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "requesterType")]
    pub requester_type: RequesterType,
    #[serde(default, rename = "clubName")]
    pub club_name: String,
    #[serde(rename = "activityName")]
    pub activity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "requesterName")]
    pub requester_name: String,
    #[serde(rename = "universityId")]
    pub university_id: String,
    pub email: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BookingDecision {
    pub decision: Decision,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "rejectionReason"
    )]
    pub rejection_reason: Option<String>,
}

/// An admin account. The password field is input-only: it is never filled in
/// server responses.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AdminAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// State of a single room/day cell of the calendar grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    Free,
    Pending,
    Booked,
    Closed,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub state: SlotState,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CalendarRow {
    pub room: Room,
    pub days: Vec<CalendarDay>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Calendar {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<CalendarRow>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorizationRole {
    Requester,
    Admin,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Authorization {
    pub role: AuthorizationRole,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AuthorizationInfo {
    pub authorization: Vec<Authorization>,
    #[serde(default, skip_serializing_if = "not", rename = "loggedIn")]
    pub logged_in: bool,
}
