// Account stores
pub mod accounts;
pub mod artists;
pub mod users;

// Catalogue
pub mod paintings;
pub mod pricing;

// Orders
pub mod order_status;
pub mod orders;

use crate::errors::ServiceError;
use uuid::Uuid;

/// Parses a path id. Anything that is not a UUID cannot name a record.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::not_found(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn malformed_ids_are_not_found() {
        assert_matches!(
            parse_id("64f1c0ffee", "Painting"),
            Err(ServiceError::NotFound(entity)) if entity == "Painting"
        );
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Painting").unwrap(), id);
    }
}
