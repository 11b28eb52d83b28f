//! Clock and identity functions: `now`, `uuid`.

/// Current Unix time in whole seconds.
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A freshly generated random v4 UUID string.
pub(crate) fn uuid_v4() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_positive() {
        assert!(now() > 0);
    }

    #[test]
    fn test_uuid_shape() {
        let id = uuid_v4();
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|c| *c == '-').count(), 4);
    }

    #[test]
    fn test_uuid_is_random() {
        assert_ne!(uuid_v4(), uuid_v4());
    }
}
