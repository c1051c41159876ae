use mongodb::bson::oid::ObjectId;

use crate::utils::error::CustomError;

/// A resource with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> &ObjectId;
}

/// Single authorization predicate for owner-only mutations.
/// Callers run this after fetching the resource and before any write,
/// so a denied request leaves the store unchanged.
pub fn ensure_owner<T: Owned>(resource: &T, requester: &ObjectId) -> Result<(), CustomError> {
    if resource.owner_id() == requester {
        Ok(())
    } else {
        Err(CustomError::PermissionDeniedError(
            "You do not own this resource".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        author_id: ObjectId,
    }

    impl Owned for Note {
        fn owner_id(&self) -> &ObjectId {
            &self.author_id
        }
    }

    #[test]
    fn owner_passes() {
        let me = ObjectId::new();
        let note = Note { author_id: me };
        assert!(ensure_owner(&note, &me).is_ok());
    }

    #[test]
    fn non_owner_is_permission_denied() {
        let note = Note {
            author_id: ObjectId::new(),
        };
        let err = ensure_owner(&note, &ObjectId::new()).unwrap_err();
        assert!(matches!(err, CustomError::PermissionDeniedError(_)));
    }
}
