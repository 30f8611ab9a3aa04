use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Eur,
    Usd,
}

pub mod error {
    use super::*;

    /// Body of every non-2xx response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WalletStatus {
        Active,
        Frozen,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub user_id: String,
        pub balance_minor: i64,
        pub currency: Currency,
        pub status: WalletStatus,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BalanceView {
        pub balance_minor: i64,
        pub currency: Currency,
    }
}

pub mod bank_account {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BankAccountNew {
        pub account_holder_name: String,
        pub account_number: String,
        pub ifsc_code: String,
        pub bank_name: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BankAccountView {
        pub id: Uuid,
        pub account_holder_name: String,
        pub account_number: String,
        pub ifsc_code: String,
        pub bank_name: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod request {
    use super::*;

    /// Which workflow a money request belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RequestKind {
        /// Cash-in: money added to the wallet.
        Fund,
        /// Cash-out: money sent from the wallet to a bank account.
        Transfer,
    }

    impl RequestKind {
        pub const ALL: [RequestKind; 2] = [RequestKind::Fund, RequestKind::Transfer];

        /// Path segment used by the admin routes (`/admin/{segment}/...`).
        pub fn path_segment(self) -> &'static str {
            match self {
                Self::Fund => "add-money",
                Self::Transfer => "transfer-money",
            }
        }

        pub fn from_path_segment(segment: &str) -> Option<Self> {
            match segment {
                "add-money" => Some(Self::Fund),
                "transfer-money" => Some(Self::Transfer),
                _ => None,
            }
        }
    }

    /// Lifecycle status of a money request.
    ///
    /// `APPROVED` is accepted when reading and is treated as `COMPLETED`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum RequestStatus {
        Pending,
        Processing,
        #[serde(alias = "APPROVED")]
        Completed,
        Rejected,
    }

    impl RequestStatus {
        pub const ALL: [RequestStatus; 4] = [
            RequestStatus::Pending,
            RequestStatus::Processing,
            RequestStatus::Completed,
            RequestStatus::Rejected,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "PENDING",
                Self::Processing => "PROCESSING",
                Self::Completed => "COMPLETED",
                Self::Rejected => "REJECTED",
            }
        }

        pub fn is_terminal(self) -> bool {
            matches!(self, Self::Completed | Self::Rejected)
        }

        pub fn is_success(self) -> bool {
            matches!(self, Self::Completed)
        }
    }

    impl std::str::FromStr for RequestStatus {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_uppercase().as_str() {
                "PENDING" => Ok(Self::Pending),
                "PROCESSING" => Ok(Self::Processing),
                "COMPLETED" | "APPROVED" => Ok(Self::Completed),
                "REJECTED" => Ok(Self::Rejected),
                other => Err(format!("invalid status: {other}")),
            }
        }
    }

    /// Kind-specific part of a money request.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum RequestDetails {
        Fund {
            location: String,
        },
        Transfer {
            account_id: Uuid,
            account_holder_name: String,
            account_number: String,
            ifsc_code: String,
        },
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MoneyRequestView {
        pub id: Uuid,
        pub user_id: String,
        pub amount_minor: i64,
        /// Only ever present on transfers; absent means no fee.
        pub fee_minor: Option<i64>,
        pub description: String,
        pub status: RequestStatus,
        pub transaction_id: Option<String>,
        pub rejection_reason: Option<String>,
        pub reviewed_by: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        #[serde(flatten)]
        pub details: RequestDetails,
    }

    impl MoneyRequestView {
        pub fn kind(&self) -> RequestKind {
            match self.details {
                RequestDetails::Fund { .. } => RequestKind::Fund,
                RequestDetails::Transfer { .. } => RequestKind::Transfer,
            }
        }

        pub fn account_holder_name(&self) -> Option<&str> {
            match &self.details {
                RequestDetails::Transfer {
                    account_holder_name,
                    ..
                } => Some(account_holder_name),
                RequestDetails::Fund { .. } => None,
            }
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct FundRequestNew {
        pub amount_minor: i64,
        pub location: String,
        pub description: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransferRequestNew {
        pub amount_minor: i64,
        pub account_id: Uuid,
        pub description: String,
    }

    /// Query string of the admin list endpoints.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct PageQuery {
        pub status: RequestStatus,
        /// 1-based, defaults to 1.
        pub page: Option<u64>,
        /// Defaults to 10, clamped to 100.
        pub limit: Option<u64>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RequestPage {
        pub items: Vec<MoneyRequestView>,
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub total_pages: u64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct StatusCount {
        pub status: RequestStatus,
        pub count: u64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RequestSummary {
        pub kind: RequestKind,
        pub counts: Vec<StatusCount>,
    }
}

pub mod transition {
    use super::*;
    use crate::request::MoneyRequestView;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MoveToProcessing {
        pub transaction_id: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RejectRequest {
        pub reason: String,
    }

    /// Fixed list of reasons offered to an admin rejecting a request.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RejectionReason {
        InvalidBankDetails,
        InsufficientDocumentation,
        SuspiciousActivity,
        DuplicateRequest,
        AmountMismatch,
        PaymentNotReceived,
        /// Free text supplied by the admin.
        Other,
    }

    impl RejectionReason {
        pub const ALL: [RejectionReason; 7] = [
            RejectionReason::InvalidBankDetails,
            RejectionReason::InsufficientDocumentation,
            RejectionReason::SuspiciousActivity,
            RejectionReason::DuplicateRequest,
            RejectionReason::AmountMismatch,
            RejectionReason::PaymentNotReceived,
            RejectionReason::Other,
        ];

        pub fn label(self) -> &'static str {
            match self {
                Self::InvalidBankDetails => "Invalid bank details",
                Self::InsufficientDocumentation => "Insufficient documentation",
                Self::SuspiciousActivity => "Suspicious activity",
                Self::DuplicateRequest => "Duplicate request",
                Self::AmountMismatch => "Amount mismatch",
                Self::PaymentNotReceived => "Payment not received",
                Self::Other => "Other",
            }
        }
    }

    /// Result of an admin transition.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransitionOutcome {
        pub request: MoneyRequestView,
        /// Owner's wallet balance after an approval; absent for other
        /// transitions.
        pub balance_after_minor: Option<i64>,
    }
}
