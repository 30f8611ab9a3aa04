//! Conversions between engine values and wire types.

use api_types::{
    Currency as ApiCurrency,
    bank_account::BankAccountView,
    request::{
        MoneyRequestView, RequestDetails as ApiDetails, RequestKind as ApiKind, RequestPage,
        RequestStatus as ApiStatus, StatusCount as ApiStatusCount,
    },
    wallet::{WalletStatus as ApiWalletStatus, WalletView},
};
use engine::{
    BankAccount, Currency, EngineError, MoneyRequest, Page, RequestDetails, RequestKind,
    RequestStatus, StatusCount, Wallet, WalletStatus,
};

pub fn currency(value: Currency) -> ApiCurrency {
    match value {
        Currency::Inr => ApiCurrency::Inr,
        Currency::Eur => ApiCurrency::Eur,
        Currency::Usd => ApiCurrency::Usd,
    }
}

pub fn wallet(value: &Wallet) -> WalletView {
    WalletView {
        id: value.id,
        user_id: value.user_id.clone(),
        balance_minor: value.balance.cents(),
        currency: currency(value.currency),
        status: match value.status {
            WalletStatus::Active => ApiWalletStatus::Active,
            WalletStatus::Frozen => ApiWalletStatus::Frozen,
        },
        updated_at: value.updated_at,
    }
}

pub fn bank_account(value: BankAccount) -> BankAccountView {
    BankAccountView {
        id: value.id,
        account_holder_name: value.account_holder_name,
        account_number: value.account_number,
        ifsc_code: value.ifsc_code,
        bank_name: value.bank_name,
        created_at: value.created_at,
    }
}

pub fn kind(value: ApiKind) -> RequestKind {
    match value {
        ApiKind::Fund => RequestKind::Fund,
        ApiKind::Transfer => RequestKind::Transfer,
    }
}

pub fn api_kind(value: RequestKind) -> ApiKind {
    match value {
        RequestKind::Fund => ApiKind::Fund,
        RequestKind::Transfer => ApiKind::Transfer,
    }
}

/// Resolves the `{kind}` segment of the admin routes.
pub fn kind_from_path(segment: &str) -> Result<RequestKind, EngineError> {
    ApiKind::from_path_segment(segment)
        .map(kind)
        .ok_or_else(|| EngineError::KeyNotFound(format!("request kind {segment}")))
}

pub fn status(value: ApiStatus) -> RequestStatus {
    match value {
        ApiStatus::Pending => RequestStatus::Pending,
        ApiStatus::Processing => RequestStatus::Processing,
        ApiStatus::Completed => RequestStatus::Completed,
        ApiStatus::Rejected => RequestStatus::Rejected,
    }
}

fn api_status(value: RequestStatus) -> ApiStatus {
    match value {
        RequestStatus::Pending => ApiStatus::Pending,
        RequestStatus::Processing => ApiStatus::Processing,
        RequestStatus::Completed => ApiStatus::Completed,
        RequestStatus::Rejected => ApiStatus::Rejected,
    }
}

pub fn request(value: MoneyRequest) -> MoneyRequestView {
    let details = match value.details {
        RequestDetails::Fund { location } => ApiDetails::Fund { location },
        RequestDetails::Transfer { bank } => ApiDetails::Transfer {
            account_id: bank.account_id,
            account_holder_name: bank.account_holder_name,
            account_number: bank.account_number,
            ifsc_code: bank.ifsc_code,
        },
    };
    MoneyRequestView {
        id: value.id,
        user_id: value.user_id,
        amount_minor: value.amount.cents(),
        fee_minor: value.fee.map(|fee| fee.cents()),
        description: value.description,
        status: api_status(value.status),
        transaction_id: value.transaction_id,
        rejection_reason: value.rejection_reason,
        reviewed_by: value.reviewed_by,
        created_at: value.created_at,
        updated_at: value.updated_at,
        details,
    }
}

pub fn page(value: Page<MoneyRequest>) -> RequestPage {
    RequestPage {
        items: value.items.into_iter().map(request).collect(),
        page: value.page,
        limit: value.limit,
        total: value.total,
        total_pages: value.total_pages,
    }
}

pub fn status_count(value: StatusCount) -> ApiStatusCount {
    ApiStatusCount {
        status: api_status(value.status),
        count: value.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_survives_the_wire() {
        for value in RequestStatus::ALL {
            assert_eq!(status(api_status(value)), value);
        }
    }

    #[test]
    fn unknown_kind_segment_is_not_found() {
        assert!(matches!(kind_from_path("add-money"), Ok(RequestKind::Fund)));
        assert!(matches!(
            kind_from_path("refunds"),
            Err(EngineError::KeyNotFound(_))
        ));
    }
}
