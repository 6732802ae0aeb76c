use crate::auth_session::SessionToken;
use crate::data_store::auth_token::{AccessRole, AuthToken, GlobalAuthToken, Privilege};
use crate::data_store::models::{
    AdminUpdate, AdminUser, Booking, BookingDecision, BookingStatus, NewAdminUser, NewBooking,
    Room, RoomStatus, SeedData,
};
use crate::data_store::{
    models, AdminId, BookingFilter, BookingId, HallbookStore, HallbookStoreFacade, RoomId,
    StoreError,
};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// The in-memory [HallbookStore] implementation.
///
/// All entities live in the [StoreData] structure behind a mutex. There is no durability: a
/// restart starts from the seed data again. Mutations are applied under the single mutex, which
/// is all the "concurrency control" this application has (see the project non-goals).
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

#[derive(Default)]
struct StoreData {
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    admins: Vec<AdminUser>,
}

impl HallbookStore for MemoryStore {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn HallbookStoreFacade + 'a>, StoreError> {
        Ok(Box::new(MemoryStoreFacade { store: self }))
    }
}

struct MemoryStoreFacade<'a> {
    store: &'a MemoryStore,
}

impl<'a> MemoryStoreFacade<'a> {
    fn lock(&self) -> Result<MutexGuard<'a, StoreData>, StoreError> {
        self.store
            .data
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

fn active_booking_exists(data: &StoreData, room_id: RoomId, date: chrono::NaiveDate) -> bool {
    data.bookings
        .iter()
        .any(|b| b.room_id == room_id && b.date == date && b.status.is_active())
}

impl<'a> HallbookStoreFacade for MemoryStoreFacade<'a> {
    fn get_rooms(&mut self, auth_token: &AuthToken) -> Result<Vec<Room>, StoreError> {
        auth_token.check_privilege(Privilege::ViewRooms)?;
        let data = self.lock()?;
        Ok(data.rooms.clone())
    }

    fn get_room(&mut self, auth_token: &AuthToken, room_id: RoomId) -> Result<Room, StoreError> {
        auth_token.check_privilege(Privilege::ViewRooms)?;
        let data = self.lock()?;
        data.rooms
            .iter()
            .find(|r| r.id == room_id)
            .cloned()
            .ok_or(StoreError::NotExisting)
    }

    fn create_or_update_room(
        &mut self,
        auth_token: &AuthToken,
        room: Room,
    ) -> Result<bool, StoreError> {
        auth_token.check_privilege(Privilege::ManageRooms)?;
        if room.name.trim().is_empty() {
            return Err(StoreError::InvalidInputData(
                "Room name must not be empty".to_string(),
            ));
        }
        let mut data = self.lock()?;
        let existing_room = data.rooms.iter_mut().find(|r| r.id == room.id);
        if let Some(r) = existing_room {
            r.name = room.name;
            r.status = room.status;
            Ok(false)
        } else {
            data.rooms.push(room);
            Ok(true)
        }
    }

    fn delete_room(&mut self, auth_token: &AuthToken, room_id: RoomId) -> Result<(), StoreError> {
        auth_token.check_privilege(Privilege::ManageRooms)?;
        let mut data = self.lock()?;
        if !data.rooms.iter().any(|r| r.id == room_id) {
            return Err(StoreError::NotExisting);
        }
        data.rooms.retain(|r| r.id != room_id);
        // Deleting a room cascades to its bookings.
        data.bookings.retain(|b| b.room_id != room_id);
        Ok(())
    }

    fn get_bookings_filtered(
        &mut self,
        auth_token: &AuthToken,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>, StoreError> {
        auth_token.check_privilege(Privilege::ManageBookings)?;
        let data = self.lock()?;
        let mut result: Vec<Booking> = data
            .bookings
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        result.sort_by_key(|b| b.date);
        Ok(result)
    }

    fn get_booking(
        &mut self,
        auth_token: &AuthToken,
        booking_id: BookingId,
    ) -> Result<Booking, StoreError> {
        auth_token.check_privilege(Privilege::ManageBookings)?;
        let data = self.lock()?;
        data.bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or(StoreError::NotExisting)
    }

    fn get_slot_occupancy(
        &mut self,
        auth_token: &AuthToken,
    ) -> Result<Vec<models::SlotOccupancy>, StoreError> {
        auth_token.check_privilege(Privilege::ViewCalendar)?;
        let data = self.lock()?;
        Ok(data
            .bookings
            .iter()
            .filter(|b| b.status.is_active())
            .map(|b| models::SlotOccupancy {
                room_id: b.room_id,
                date: b.date,
                status: b.status,
            })
            .collect())
    }

    fn create_booking(
        &mut self,
        auth_token: &AuthToken,
        booking: NewBooking,
    ) -> Result<Booking, StoreError> {
        auth_token.check_privilege(Privilege::RequestBooking)?;
        let mut data = self.lock()?;
        let room = data
            .rooms
            .iter()
            .find(|r| r.id == booking.room_id)
            .ok_or(StoreError::NotExisting)?;
        if room.status == RoomStatus::UnderMaintenance {
            return Err(StoreError::RoomClosed);
        }
        if active_booking_exists(&data, booking.room_id, booking.date) {
            return Err(StoreError::SlotOccupied {
                room_id: booking.room_id,
                date: booking.date,
            });
        }
        let booking = booking.into_booking(Uuid::now_v7());
        data.bookings.push(booking.clone());
        Ok(booking)
    }

    fn decide_booking(
        &mut self,
        auth_token: &AuthToken,
        booking_id: BookingId,
        decision: BookingDecision,
    ) -> Result<Booking, StoreError> {
        auth_token.check_privilege(Privilege::ManageBookings)?;
        let mut data = self.lock()?;
        let booking = data
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or(StoreError::NotExisting)?;
        if booking.status != BookingStatus::Pending {
            return Err(StoreError::AlreadyDecided);
        }
        match decision {
            BookingDecision::Approve => {
                booking.status = BookingStatus::Approved;
                booking.rejection_reason = None;
            }
            BookingDecision::Reject { reason } => {
                booking.status = BookingStatus::Rejected;
                booking.rejection_reason = Some(reason);
            }
        }
        Ok(booking.clone())
    }

    fn delete_booking(
        &mut self,
        auth_token: &AuthToken,
        booking_id: BookingId,
    ) -> Result<(), StoreError> {
        auth_token.check_privilege(Privilege::ManageBookings)?;
        let mut data = self.lock()?;
        if !data.bookings.iter().any(|b| b.id == booking_id) {
            return Err(StoreError::NotExisting);
        }
        data.bookings.retain(|b| b.id != booking_id);
        Ok(())
    }

    fn get_admins(&mut self, auth_token: &AuthToken) -> Result<Vec<AdminUser>, StoreError> {
        auth_token.check_privilege(Privilege::ManageAdmins)?;
        let data = self.lock()?;
        Ok(data.admins.clone())
    }

    fn create_admin(
        &mut self,
        auth_token: &AuthToken,
        admin: NewAdminUser,
    ) -> Result<AdminId, StoreError> {
        auth_token.check_privilege(Privilege::ManageAdmins)?;
        if admin.username.trim().is_empty() || admin.password.trim().is_empty() {
            return Err(StoreError::InvalidInputData(
                "Username and password must not be empty".to_string(),
            ));
        }
        let mut data = self.lock()?;
        if data.admins.iter().any(|a| a.username == admin.username) {
            return Err(StoreError::UsernameTaken);
        }
        let admin_id = Uuid::now_v7();
        data.admins.push(admin.into_admin(admin_id));
        Ok(admin_id)
    }

    fn update_admin(
        &mut self,
        auth_token: &AuthToken,
        admin_id: AdminId,
        update: AdminUpdate,
    ) -> Result<AdminUser, StoreError> {
        auth_token.check_privilege(Privilege::ManageAdmins)?;
        let mut data = self.lock()?;
        let new_username = update.username.trim();
        if !new_username.is_empty()
            && data
                .admins
                .iter()
                .any(|a| a.id != admin_id && a.username == new_username)
        {
            return Err(StoreError::UsernameTaken);
        }
        let admin = data
            .admins
            .iter_mut()
            .find(|a| a.id == admin_id)
            .ok_or(StoreError::NotExisting)?;
        // Empty fields keep the previous value, matching the edit form semantics.
        if !new_username.is_empty() {
            admin.username = new_username.to_string();
        }
        if let Some(password) = update.password {
            if !password.trim().is_empty() {
                admin.password = password;
            }
        }
        Ok(admin.clone())
    }

    fn authenticate_admin(
        &mut self,
        username: &str,
        password: &str,
        session_token: &mut SessionToken,
    ) -> Result<(), StoreError> {
        let data = self.lock()?;
        // Plaintext comparison, per the project non-goals.
        let admin = data
            .admins
            .iter()
            .find(|a| a.username == username && a.password == password)
            .ok_or(StoreError::AuthenticationFailed)?;
        session_token.add_authorization(admin.id);
        Ok(())
    }

    fn get_auth_token_for_session(
        &mut self,
        session_token: Option<&SessionToken>,
    ) -> Result<AuthToken, StoreError> {
        let data = self.lock()?;
        let mut roles = vec![AccessRole::Requester];
        if let Some(token) = session_token {
            if token
                .admin_ids()
                .iter()
                .any(|id| data.admins.iter().any(|a| a.id == *id))
            {
                roles.push(AccessRole::Admin);
            }
        }
        Ok(AuthToken::create_for_session(roles))
    }

    fn import_seed_data(
        &mut self,
        _auth_token: &GlobalAuthToken,
        seed: SeedData,
    ) -> Result<(), StoreError> {
        for booking in &seed.bookings {
            if !seed.rooms.iter().any(|r| r.id == booking.room_id) {
                return Err(StoreError::InvalidInputData(format!(
                    "Booking {} references unknown room {}",
                    booking.id, booking.room_id
                )));
            }
        }
        for (i, admin) in seed.admins.iter().enumerate() {
            if seed.admins[..i].iter().any(|a| a.username == admin.username) {
                return Err(StoreError::InvalidInputData(format!(
                    "Duplicate admin username {:?} in seed data",
                    admin.username
                )));
            }
        }
        for (i, booking) in seed.bookings.iter().enumerate() {
            if booking.status.is_active()
                && seed.bookings[..i].iter().any(|b| {
                    b.status.is_active() && b.room_id == booking.room_id && b.date == booking.date
                })
            {
                return Err(StoreError::InvalidInputData(format!(
                    "Multiple active bookings for room {} on {} in seed data",
                    booking.room_id, booking.date
                )));
            }
        }
        let mut data = self.lock()?;
        data.rooms = seed.rooms;
        data.bookings = seed.bookings;
        data.admins = seed.admins;
        Ok(())
    }
}
