use mongodb::bson::oid::ObjectId;

use crate::utils::error::CustomError;

/// Parse a hex document id from a path or payload, with a readable 400.
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw).map_err(|_| CustomError::BadRequestError(format!("Invalid {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "post ID").unwrap(), id);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_object_id("not-an-id", "post ID").unwrap_err();
        assert!(matches!(err, CustomError::BadRequestError(_)));
        assert!(err.to_string().contains("post ID"));
    }
}
