//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use uuid::Uuid;

use crate::{MoneyCents, RequestKind, RequestStatus};

/// Create a deposit request for `user_id`.
#[derive(Clone, Debug)]
pub struct FundRequestCmd {
    pub user_id: String,
    pub amount: MoneyCents,
    pub location: String,
    pub description: String,
}

impl FundRequestCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: MoneyCents, location: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            location: location.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Create a withdrawal request from `user_id`'s wallet to one of their
/// bank accounts.
#[derive(Clone, Debug)]
pub struct TransferRequestCmd {
    pub user_id: String,
    pub amount: MoneyCents,
    pub account_id: Uuid,
    pub description: String,
}

impl TransferRequestCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: MoneyCents, account_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            account_id,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Register a bank account for `user_id`.
#[derive(Clone, Debug)]
pub struct BankAccountCmd {
    pub user_id: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: Option<String>,
}

/// One page of requests of a kind in a status.
///
/// `page` is 1-based; `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
#[derive(Clone, Copy, Debug)]
pub struct PageCmd {
    pub kind: RequestKind,
    pub status: RequestStatus,
    pub page: u64,
    pub limit: u64,
}

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

impl PageCmd {
    #[must_use]
    pub fn new(kind: RequestKind, status: RequestStatus) -> Self {
        Self {
            kind,
            status,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    #[must_use]
    pub fn page(mut self, page: Option<u64>) -> Self {
        self.page = page.unwrap_or(1).max(1);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        self
    }
}
