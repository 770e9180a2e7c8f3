//! Field mapping from source profiles to destination contacts

use crate::model::{DestinationContact, SourceUser};

/// Map a source profile onto a destination contact
///
/// Total and field-preserving: `name → name`, `email → email`,
/// `location → address`, `handle → alt_handle`. No validation happens here;
/// the lookup-key check belongs to the destination.
pub fn to_destination_contact(user: &SourceUser) -> DestinationContact {
    DestinationContact {
        name: user.name.clone(),
        email: user.email.clone(),
        address: user.location.clone(),
        alt_handle: user.handle.clone(),
    }
}

impl From<&SourceUser> for DestinationContact {
    fn from(user: &SourceUser) -> Self {
        to_destination_contact(user)
    }
}
