use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::api::responses::ValidationErrorDetail;
use crate::models::AccountProfile;

/// Body of `POST /register` and `POST /accounts`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 50, message = "firstName must be 1 to 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "lastName must be 1 to 50 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

impl From<CreateAccountRequest> for AccountProfile {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

/// Body of `POST /transfer`. The source account comes from the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequestBody {
    pub to_id: Uuid,
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
}

/// Flattens validator output into the API's detail list, sorted by field.
pub fn validation_details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| ValidationErrorDetail {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "analytical".to_string(),
        }
    }

    #[test]
    fn test_create_account_request_validation() {
        assert!(create_request().validate().is_ok());

        let mut invalid = create_request();
        invalid.email = "not-an-email".to_string();
        invalid.first_name = String::new();

        let errors = invalid.validate().unwrap_err();
        let details = validation_details(&errors);
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "email");
        assert_eq!(details[1].field, "first_name");
    }

    #[test]
    fn test_create_account_request_camel_case() {
        let json = r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","password":"pw"}"#;
        let request: CreateAccountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.first_name, "Ada");

        let profile = AccountProfile::from(request);
        assert_eq!(profile.last_name, "Lovelace");
    }

    #[test]
    fn test_transfer_body_validation() {
        let valid = TransferRequestBody {
            to_id: Uuid::new_v4(),
            amount: 30,
        };
        assert!(valid.validate().is_ok());

        let zero = TransferRequestBody {
            to_id: Uuid::new_v4(),
            amount: 0,
        };
        let details = validation_details(&zero.validate().unwrap_err());
        assert_eq!(details[0].field, "amount");
        assert_eq!(details[0].message, "amount must be positive");
    }

    #[test]
    fn test_transfer_body_deserializes() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"toId":"{}","amount":25}}"#, id);
        let body: TransferRequestBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body.to_id, id);
        assert_eq!(body.amount, 25);
    }
}
