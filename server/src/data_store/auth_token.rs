use crate::cli::CliAuthTokenKey;
use crate::data_store::StoreError;

/// Authorization token for authorizing access to the data_store.
///
/// The AuthToken holds the list of active [AccessRole]s of the current client context. These
/// imply specific [Privilege]s.
///
/// This structure is our main protection against accidental unauthorized-access bugs: All
/// data_store access functions require an AuthToken and check it for the required privilege. An
/// AuthToken can only be created by
/// [crate::data_store::HallbookStoreFacade::get_auth_token_for_session], based on the
/// authenticated admin accounts in a client's session, and by cli functions via [create_for_cli].
///
/// For store-wide bulk operations (seed import), a [GlobalAuthToken] is required instead.
pub struct AuthToken {
    roles: Vec<AccessRole>,
}

impl AuthToken {
    /// Create a new AuthToken for a client session.
    ///
    /// This function must only be used by implementations of
    /// [crate::data_store::HallbookStoreFacade::get_auth_token_for_session] after checking the
    /// validity of the client's authenticated admin ids!
    pub(super) fn create_for_session(roles: Vec<AccessRole>) -> Self {
        AuthToken { roles }
    }

    /// Create a new AuthToken for a command line interface functionality.
    ///
    /// The AuthToken is created with all access roles.
    ///
    /// This function must only be used by command line interface functions, not in the context of
    /// the web server!
    pub fn create_for_cli(_key: &CliAuthTokenKey) -> Self {
        AuthToken {
            roles: vec![AccessRole::Requester, AccessRole::Admin],
        }
    }

    /// Check if the AuthToken authorizes for the given `privilege`.
    ///
    /// The actual authorization check is delegated to [Privilege::qualifying_roles], by checking
    /// if any of the roles contained in the AuthToken qualifies.
    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        privilege
            .qualifying_roles()
            .iter()
            .any(|role| self.roles.contains(role))
    }

    /// Check if the AuthToken authorizes for the given `privilege`. If not, return an appropriate
    /// PermissionDenied error.
    pub fn check_privilege(&self, privilege: Privilege) -> Result<(), StoreError> {
        if self.has_privilege(privilege) {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied {
                required_privilege: privilege,
            })
        }
    }

    /// Get the list of active access roles in the API representation.
    ///
    /// This is used by the authorization-check endpoint, allowing the client to query its current
    /// active roles.
    pub fn list_api_access_roles(&self) -> Vec<hallbook_api_types::Authorization> {
        self.roles
            .iter()
            .map(|role| hallbook_api_types::Authorization {
                role: (*role).into(),
            })
            .collect()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&AccessRole::Admin)
    }
}

/// Authorization token for store-wide bulk operations (seed import), which are not available to
/// web clients at all.
///
/// Together with [AuthToken], this structure is our main protection against accidental
/// unauthorized-access bugs. A GlobalAuthToken can only be created by cli functions.
pub struct GlobalAuthToken {
    _private: (),
}

impl GlobalAuthToken {
    pub fn create_for_cli(_key: &CliAuthTokenKey) -> Self {
        GlobalAuthToken { _private: () }
    }
}

/// The access roles a client context can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRole {
    /// Any visitor of the booking calendar: club presidents and students requesting slots
    Requester,
    /// A logged-in administrator account
    Admin,
}

impl AccessRole {
    pub fn name(&self) -> &'static str {
        match self {
            AccessRole::Requester => "Requester",
            AccessRole::Admin => "Admin",
        }
    }
}

impl From<AccessRole> for hallbook_api_types::AuthorizationRole {
    fn from(value: AccessRole) -> Self {
        match value {
            AccessRole::Requester => Self::Requester,
            AccessRole::Admin => Self::Admin,
        }
    }
}

/// The privileges required by the individual data_store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    ViewRooms,
    ViewCalendar,
    RequestBooking,
    ManageRooms,
    ManageBookings,
    ManageAdmins,
}

impl Privilege {
    /// The access roles that qualify for this privilege.
    pub fn qualifying_roles(&self) -> &'static [AccessRole] {
        match self {
            Privilege::ViewRooms | Privilege::ViewCalendar | Privilege::RequestBooking => {
                &[AccessRole::Requester, AccessRole::Admin]
            }
            Privilege::ManageRooms | Privilege::ManageBookings | Privilege::ManageAdmins => {
                &[AccessRole::Admin]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requester_privileges() {
        let token = AuthToken::create_for_session(vec![AccessRole::Requester]);
        assert!(token.has_privilege(Privilege::ViewCalendar));
        assert!(token.has_privilege(Privilege::RequestBooking));
        assert!(!token.has_privilege(Privilege::ManageBookings));
        assert!(!token.is_admin());
        assert!(matches!(
            token.check_privilege(Privilege::ManageAdmins),
            Err(StoreError::PermissionDenied {
                required_privilege: Privilege::ManageAdmins
            })
        ));
    }

    #[test]
    fn test_admin_privileges() {
        let token = AuthToken::create_for_session(vec![AccessRole::Requester, AccessRole::Admin]);
        assert!(token.has_privilege(Privilege::ManageRooms));
        assert!(token.has_privilege(Privilege::ManageAdmins));
        assert!(token.is_admin());
    }
}
