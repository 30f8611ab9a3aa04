//! Bank accounts users send money to.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq)]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BankAccount {
    /// Validates and normalizes the account details.
    ///
    /// - holder name must not be blank
    /// - account number: 6 to 18 digits (spaces are stripped)
    /// - IFSC: 4 letters, a `0`, then 6 alphanumerics (upper-cased)
    pub fn new(
        user_id: String,
        account_holder_name: &str,
        account_number: &str,
        ifsc_code: &str,
        bank_name: Option<&str>,
    ) -> ResultEngine<Self> {
        let account_holder_name = account_holder_name.trim();
        if account_holder_name.is_empty() {
            return Err(EngineError::Validation(
                "account holder name must not be empty".to_string(),
            ));
        }

        let account_number: String = account_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !(6..=18).contains(&account_number.len())
            || !account_number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(EngineError::Validation(
                "account number must be 6 to 18 digits".to_string(),
            ));
        }

        let ifsc_code = ifsc_code.trim().to_ascii_uppercase();
        if !is_valid_ifsc(&ifsc_code) {
            return Err(EngineError::Validation(format!(
                "invalid IFSC code: {ifsc_code}"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            account_holder_name: account_holder_name.to_string(),
            account_number,
            ifsc_code,
            bank_name: crate::util::normalize_optional_text(bank_name),
            created_at: Utc::now(),
        })
    }
}

fn is_valid_ifsc(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 11
        && bytes[..4].iter().all(u8::is_ascii_uppercase)
        && bytes[4] == b'0'
        && bytes[5..].iter().all(u8::is_ascii_alphanumeric)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankAccount> for ActiveModel {
    fn from(value: &BankAccount) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            account_holder_name: ActiveValue::Set(value.account_holder_name.clone()),
            account_number: ActiveValue::Set(value.account_number.clone()),
            ifsc_code: ActiveValue::Set(value.ifsc_code.clone()),
            bank_name: ActiveValue::Set(value.bank_name.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for BankAccount {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "bank account")?,
            user_id: model.user_id,
            account_holder_name: model.account_holder_name,
            account_number: model.account_number,
            ifsc_code: model.ifsc_code,
            bank_name: model.bank_name,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_details() {
        let account = BankAccount::new(
            "alice".to_string(),
            "  Alice Rao ",
            "1234 5678 9012",
            "hdfc0001234",
            Some("  "),
        )
        .unwrap();
        assert_eq!(account.account_holder_name, "Alice Rao");
        assert_eq!(account.account_number, "123456789012");
        assert_eq!(account.ifsc_code, "HDFC0001234");
        assert_eq!(account.bank_name, None);
    }

    #[test]
    fn new_rejects_bad_account_number() {
        for number in ["12345", "1234567890123456789", "12345a789"] {
            let err = BankAccount::new("a".to_string(), "A", number, "HDFC0001234", None)
                .unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)), "{number}");
        }
    }

    #[test]
    fn new_rejects_bad_ifsc() {
        for code in ["HDFC1001234", "HDF00001234", "HDFC000123", "HDFC0001234X"] {
            let err = BankAccount::new("a".to_string(), "A", "123456", code, None).unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)), "{code}");
        }
    }
}
