//! Money requests: deposits (`fund`) and withdrawals (`transfer`).
//!
//! Both kinds share one table. A row only becomes a [`MoneyRequest`] after
//! the kind-specific columns have been checked, so the rest of the engine
//! never sees a transfer without its bank snapshot.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    BankAccount, EngineError, MoneyCents, RequestKind, RequestStatus, ResultEngine,
    util::parse_uuid,
};

/// Bank details copied onto a transfer when it is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankSnapshot {
    pub account_id: Uuid,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

impl From<&BankAccount> for BankSnapshot {
    fn from(account: &BankAccount) -> Self {
        Self {
            account_id: account.id,
            account_holder_name: account.account_holder_name.clone(),
            account_number: account.account_number.clone(),
            ifsc_code: account.ifsc_code.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestDetails {
    Fund { location: String },
    Transfer { bank: BankSnapshot },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoneyRequest {
    pub id: Uuid,
    pub user_id: String,
    pub amount: MoneyCents,
    pub fee: Option<MoneyCents>,
    pub description: String,
    pub status: RequestStatus,
    pub transaction_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub details: RequestDetails,
}

impl MoneyRequest {
    fn new(
        user_id: String,
        amount: MoneyCents,
        fee: Option<MoneyCents>,
        description: String,
        details: RequestDetails,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if fee.is_some_and(MoneyCents::is_negative) {
            return Err(EngineError::InvalidAmount(
                "fee_minor must be >= 0".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            fee,
            description,
            status: RequestStatus::Pending,
            transaction_id: None,
            rejection_reason: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
            details,
        })
    }

    /// A new deposit request; `location` must not be blank.
    pub fn fund(
        user_id: String,
        amount: MoneyCents,
        location: &str,
        description: String,
    ) -> ResultEngine<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(EngineError::Validation(
                "location must not be empty".to_string(),
            ));
        }
        Self::new(
            user_id,
            amount,
            None,
            description,
            RequestDetails::Fund {
                location: location.to_string(),
            },
        )
    }

    /// A new withdrawal request to `bank`. A zero fee is stored as absent.
    pub fn transfer(
        user_id: String,
        amount: MoneyCents,
        fee: MoneyCents,
        bank: BankSnapshot,
        description: String,
    ) -> ResultEngine<Self> {
        let fee = (!fee.is_zero()).then_some(fee);
        Self::new(
            user_id,
            amount,
            fee,
            description,
            RequestDetails::Transfer { bank },
        )
    }

    pub fn kind(&self) -> RequestKind {
        match self.details {
            RequestDetails::Fund { .. } => RequestKind::Fund,
            RequestDetails::Transfer { .. } => RequestKind::Transfer,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "money_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub fee_minor: Option<i64>,
    pub description: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<String>,
    pub location: Option<String>,
    pub account_id: Option<String>,
    pub account_holder_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MoneyRequest> for ActiveModel {
    fn from(req: &MoneyRequest) -> Self {
        let (location, bank) = match &req.details {
            RequestDetails::Fund { location } => (Some(location.clone()), None),
            RequestDetails::Transfer { bank } => (None, Some(bank)),
        };
        Self {
            id: ActiveValue::Set(req.id.to_string()),
            kind: ActiveValue::Set(req.kind().as_str().to_string()),
            user_id: ActiveValue::Set(req.user_id.clone()),
            amount_minor: ActiveValue::Set(req.amount.cents()),
            fee_minor: ActiveValue::Set(req.fee.map(MoneyCents::cents)),
            description: ActiveValue::Set(req.description.clone()),
            status: ActiveValue::Set(req.status.as_str().to_string()),
            transaction_id: ActiveValue::Set(req.transaction_id.clone()),
            rejection_reason: ActiveValue::Set(req.rejection_reason.clone()),
            reviewed_by: ActiveValue::Set(req.reviewed_by.clone()),
            location: ActiveValue::Set(location),
            account_id: ActiveValue::Set(bank.map(|b| b.account_id.to_string())),
            account_holder_name: ActiveValue::Set(bank.map(|b| b.account_holder_name.clone())),
            account_number: ActiveValue::Set(bank.map(|b| b.account_number.clone())),
            ifsc_code: ActiveValue::Set(bank.map(|b| b.ifsc_code.clone())),
            created_at: ActiveValue::Set(req.created_at),
            updated_at: ActiveValue::Set(req.updated_at),
        }
    }
}

fn required(value: Option<String>, field: &str, id: &str) -> ResultEngine<String> {
    value.ok_or_else(|| EngineError::Corrupted(format!("request {id} is missing {field}")))
}

impl TryFrom<Model> for MoneyRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = RequestKind::try_from(model.kind.as_str())?;
        let details = match kind {
            RequestKind::Fund => RequestDetails::Fund {
                location: required(model.location, "location", &model.id)?,
            },
            RequestKind::Transfer => {
                let account_id = required(model.account_id, "account_id", &model.id)?;
                RequestDetails::Transfer {
                    bank: BankSnapshot {
                        account_id: parse_uuid(&account_id, "bank account")?,
                        account_holder_name: required(
                            model.account_holder_name,
                            "account_holder_name",
                            &model.id,
                        )?,
                        account_number: required(
                            model.account_number,
                            "account_number",
                            &model.id,
                        )?,
                        ifsc_code: required(model.ifsc_code, "ifsc_code", &model.id)?,
                    },
                }
            }
        };

        let status = RequestStatus::try_from(model.status.as_str())?;
        if status == RequestStatus::Rejected && model.rejection_reason.is_none() {
            return Err(EngineError::Corrupted(format!(
                "rejected request {} has no reason",
                model.id
            )));
        }

        Ok(Self {
            id: parse_uuid(&model.id, "request")?,
            user_id: model.user_id,
            amount: MoneyCents::new(model.amount_minor),
            fee: model.fee_minor.map(MoneyCents::new),
            description: model.description,
            status,
            transaction_id: model.transaction_id,
            rejection_reason: model.rejection_reason,
            reviewed_by: model.reviewed_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> BankSnapshot {
        BankSnapshot {
            account_id: Uuid::new_v4(),
            account_holder_name: "Alice Rao".to_string(),
            account_number: "123456789".to_string(),
            ifsc_code: "HDFC0001234".to_string(),
        }
    }

    fn model_of(req: &MoneyRequest) -> Model {
        let active = ActiveModel::from(req);
        Model {
            id: active.id.unwrap(),
            kind: active.kind.unwrap(),
            user_id: active.user_id.unwrap(),
            amount_minor: active.amount_minor.unwrap(),
            fee_minor: active.fee_minor.unwrap(),
            description: active.description.unwrap(),
            status: active.status.unwrap(),
            transaction_id: active.transaction_id.unwrap(),
            rejection_reason: active.rejection_reason.unwrap(),
            reviewed_by: active.reviewed_by.unwrap(),
            location: active.location.unwrap(),
            account_id: active.account_id.unwrap(),
            account_holder_name: active.account_holder_name.unwrap(),
            account_number: active.account_number.unwrap(),
            ifsc_code: active.ifsc_code.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
        }
    }

    #[test]
    fn new_requests_start_pending() {
        let req = MoneyRequest::fund(
            "alice".to_string(),
            MoneyCents::new(100),
            "Pune branch",
            "cash".to_string(),
        )
        .unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
        assert_eq!(req.kind(), RequestKind::Fund);
        assert!(req.transaction_id.is_none());
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [0, -5] {
            let err = MoneyRequest::transfer(
                "alice".to_string(),
                MoneyCents::new(amount),
                MoneyCents::ZERO,
                bank(),
                String::new(),
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidAmount(_)));
        }
    }

    #[test]
    fn fund_requires_location() {
        let err = MoneyRequest::fund("alice".to_string(), MoneyCents::new(1), " ", String::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn zero_fee_is_stored_as_absent() {
        let req = MoneyRequest::transfer(
            "alice".to_string(),
            MoneyCents::new(200),
            MoneyCents::ZERO,
            bank(),
            String::new(),
        )
        .unwrap();
        assert_eq!(req.fee, None);
    }

    #[test]
    fn transfer_row_without_snapshot_is_corrupted() {
        let req = MoneyRequest::transfer(
            "alice".to_string(),
            MoneyCents::new(200),
            MoneyCents::new(10),
            bank(),
            "rent".to_string(),
        )
        .unwrap();
        let mut model = model_of(&req);
        assert_eq!(MoneyRequest::try_from(model.clone()).unwrap(), req);

        model.ifsc_code = None;
        assert!(matches!(
            MoneyRequest::try_from(model),
            Err(EngineError::Corrupted(_))
        ));
    }

    #[test]
    fn legacy_approved_rows_read_as_completed() {
        let req = MoneyRequest::fund(
            "alice".to_string(),
            MoneyCents::new(100),
            "Pune",
            String::new(),
        )
        .unwrap();
        let mut model = model_of(&req);
        model.status = "APPROVED".to_string();
        assert_eq!(
            MoneyRequest::try_from(model).unwrap().status,
            RequestStatus::Completed
        );
    }
}
