//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the STORE operation (POST /store)
///
/// An empty `data` string is a valid payload and is stored like any other.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_deserialize() {
        let json = r#"{"data": "hello"}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.data, "hello");
    }

    #[test]
    fn test_store_request_empty_data() {
        let req: StoreRequest = serde_json::from_str(r#"{"data": ""}"#).unwrap();
        assert!(req.data.is_empty());
    }

    #[test]
    fn test_store_request_missing_data() {
        assert!(serde_json::from_str::<StoreRequest>("{}").is_err());
    }
}
