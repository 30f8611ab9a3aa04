use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    BankAccount, BankAccountCmd, Currency, Engine, EngineError, FundRequestCmd, MoneyCents,
    MoneyRequest, PageCmd, RequestKind, RequestStatus, Role, TransferRequestCmd, WalletStatus,
    TRANSACTION_ID_REQUIRED,
};
use migration::MigratorTrait;

const FEE: MoneyCents = MoneyCents::new(10);

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .transfer_fee(FEE)
        .currency(Currency::Inr)
        .build()
        .await
        .unwrap();
    engine.new_user("alice", "password", Role::User).await.unwrap();
    engine.new_user("bob", "password", Role::User).await.unwrap();
    engine.new_user("root", "password", Role::Admin).await.unwrap();
    (engine, db)
}

async fn bank_account(engine: &Engine, user: &str) -> BankAccount {
    engine
        .add_bank_account(BankAccountCmd {
            user_id: user.to_string(),
            account_holder_name: "Alice Rao".to_string(),
            account_number: "123456789012".to_string(),
            ifsc_code: "HDFC0001234".to_string(),
            bank_name: Some("HDFC".to_string()),
        })
        .await
        .unwrap()
}

async fn deposit(engine: &Engine, user: &str, amount: i64) -> MoneyRequest {
    let req = engine
        .create_fund_request(FundRequestCmd::new(user, MoneyCents::new(amount), "Pune branch"))
        .await
        .unwrap();
    engine
        .move_to_processing(RequestKind::Fund, req.id, "UTR-1", "root")
        .await
        .unwrap();
    engine
        .approve(RequestKind::Fund, req.id, "root")
        .await
        .unwrap()
        .request
}

#[tokio::test]
async fn deposit_then_transfer_settles_balance() {
    let (engine, _db) = engine_with_db().await;
    let account = bank_account(&engine, "alice").await;

    let fund = deposit(&engine, "alice", 500).await;
    assert_eq!(fund.status, RequestStatus::Completed);
    assert_eq!(fund.reviewed_by.as_deref(), Some("root"));
    assert_eq!(
        engine.wallet("alice").await.unwrap().balance,
        MoneyCents::new(500)
    );

    let transfer = engine
        .create_transfer_request(TransferRequestCmd::new(
            "alice",
            MoneyCents::new(200),
            account.id,
        ))
        .await
        .unwrap();
    assert_eq!(transfer.fee, Some(FEE));
    // Creating a request does not touch the balance.
    assert_eq!(
        engine.wallet("alice").await.unwrap().balance,
        MoneyCents::new(500)
    );

    engine
        .move_to_processing(RequestKind::Transfer, transfer.id, "NEFT-77", "root")
        .await
        .unwrap();
    let settlement = engine
        .approve(RequestKind::Transfer, transfer.id, "root")
        .await
        .unwrap();

    assert_eq!(settlement.request.status, RequestStatus::Completed);
    assert_eq!(
        settlement.request.transaction_id.as_deref(),
        Some("NEFT-77")
    );
    let wallet = settlement.wallet.unwrap();
    assert_eq!(wallet.balance, MoneyCents::new(290));
    assert_eq!(engine.wallet("alice").await.unwrap(), wallet);
}

#[tokio::test]
async fn second_approval_is_an_invalid_transition() {
    let (engine, _db) = engine_with_db().await;
    let fund = deposit(&engine, "alice", 500).await;

    let err = engine
        .approve(RequestKind::Fund, fund.id, "root")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
    assert_eq!(
        engine.wallet("alice").await.unwrap().balance,
        MoneyCents::new(500)
    );
}

#[tokio::test]
async fn blank_transaction_id_leaves_request_pending() {
    let (engine, _db) = engine_with_db().await;
    let req = engine
        .create_fund_request(FundRequestCmd::new("alice", MoneyCents::new(100), "Pune"))
        .await
        .unwrap();

    let err = engine
        .move_to_processing(RequestKind::Fund, req.id, "   ", "root")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(TRANSACTION_ID_REQUIRED.to_string())
    );
    let stored = engine.request(RequestKind::Fund, req.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(stored.transaction_id, None);
}

#[tokio::test]
async fn reject_requires_processing_and_a_reason() {
    let (engine, _db) = engine_with_db().await;
    let req = engine
        .create_fund_request(FundRequestCmd::new("alice", MoneyCents::new(100), "Pune"))
        .await
        .unwrap();

    let err = engine
        .reject(RequestKind::Fund, req.id, "Duplicate Request", "root")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));

    engine
        .move_to_processing(RequestKind::Fund, req.id, "UTR-9", "root")
        .await
        .unwrap();
    let err = engine
        .reject(RequestKind::Fund, req.id, "", "root")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let settlement = engine
        .reject(RequestKind::Fund, req.id, "Duplicate Request", "root")
        .await
        .unwrap();
    assert_eq!(settlement.request.status, RequestStatus::Rejected);
    assert_eq!(
        settlement.request.rejection_reason.as_deref(),
        Some("Duplicate Request")
    );
    assert!(settlement.wallet.is_none());
    assert_eq!(engine.wallet("alice").await.unwrap().balance, MoneyCents::ZERO);
}

#[tokio::test]
async fn transfer_creation_checks_balance_with_fee() {
    let (engine, _db) = engine_with_db().await;
    let account = bank_account(&engine, "alice").await;
    deposit(&engine, "alice", 200).await;

    let err = engine
        .create_transfer_request(TransferRequestCmd::new(
            "alice",
            MoneyCents::new(200),
            account.id,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    engine
        .create_transfer_request(TransferRequestCmd::new(
            "alice",
            MoneyCents::new(190),
            account.id,
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn approval_fails_when_balance_no_longer_covers_transfer() {
    let (engine, _db) = engine_with_db().await;
    let account = bank_account(&engine, "alice").await;
    deposit(&engine, "alice", 300).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = engine
            .create_transfer_request(TransferRequestCmd::new(
                "alice",
                MoneyCents::new(200),
                account.id,
            ))
            .await
            .unwrap();
        engine
            .move_to_processing(RequestKind::Transfer, req.id, "NEFT", "root")
            .await
            .unwrap();
        ids.push(req.id);
    }

    engine
        .approve(RequestKind::Transfer, ids[0], "root")
        .await
        .unwrap();
    let err = engine
        .approve(RequestKind::Transfer, ids[1], "root")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    let stored = engine.request(RequestKind::Transfer, ids[1]).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Processing);
    assert_eq!(
        engine.wallet("alice").await.unwrap().balance,
        MoneyCents::new(90)
    );
}

#[tokio::test]
async fn transfer_to_foreign_account_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let bobs = bank_account(&engine, "bob").await;
    deposit(&engine, "alice", 500).await;

    let err = engine
        .create_transfer_request(TransferRequestCmd::new(
            "alice",
            MoneyCents::new(100),
            bobs.id,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn frozen_wallet_accepts_no_new_requests() {
    let (engine, _db) = engine_with_db().await;
    engine
        .set_wallet_status("alice", WalletStatus::Frozen)
        .await
        .unwrap();

    let err = engine
        .create_fund_request(FundRequestCmd::new("alice", MoneyCents::new(100), "Pune"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn listing_returns_only_the_requested_kind_and_status() {
    let (engine, _db) = engine_with_db().await;
    let account = bank_account(&engine, "alice").await;
    deposit(&engine, "alice", 1_000).await;

    for amount in [10, 20, 30] {
        engine
            .create_fund_request(FundRequestCmd::new("bob", MoneyCents::new(amount), "Pune"))
            .await
            .unwrap();
    }
    let transfer = engine
        .create_transfer_request(TransferRequestCmd::new(
            "alice",
            MoneyCents::new(50),
            account.id,
        ))
        .await
        .unwrap();

    let page = engine
        .requests_page(PageCmd::new(RequestKind::Fund, RequestStatus::Pending).limit(Some(2)))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
    assert!(
        page.items
            .iter()
            .all(|r| r.kind() == RequestKind::Fund && r.status == RequestStatus::Pending)
    );

    let second = engine
        .requests_page(
            PageCmd::new(RequestKind::Fund, RequestStatus::Pending)
                .page(Some(2))
                .limit(Some(2)),
        )
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);

    let completed = engine
        .requests_page(PageCmd::new(RequestKind::Fund, RequestStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.total, 1);

    let transfers = engine
        .requests_page(PageCmd::new(RequestKind::Transfer, RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(
        transfers.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![transfer.id]
    );

    let past_end = engine
        .requests_page(PageCmd::new(RequestKind::Fund, RequestStatus::Pending).page(Some(9)))
        .await
        .unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 3);

    let hand_built = engine
        .requests_page(PageCmd {
            kind: RequestKind::Fund,
            status: RequestStatus::Pending,
            page: 0,
            limit: 0,
        })
        .await
        .unwrap();
    assert_eq!(hand_built.page, 1);
    assert_eq!(hand_built.limit, 1);
    assert_eq!(hand_built.items.len(), 1);
    assert_eq!(hand_built.total_pages, 3);
}

#[tokio::test]
async fn summary_counts_legacy_approved_rows_as_completed() {
    let (engine, db) = engine_with_db().await;
    let fund = deposit(&engine, "alice", 100).await;
    engine
        .create_fund_request(FundRequestCmd::new("alice", MoneyCents::new(5), "Pune"))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE money_requests SET status = ? WHERE id = ?",
        vec!["APPROVED".into(), fund.id.to_string().into()],
    ))
    .await
    .unwrap();

    let summary = engine.request_summary(RequestKind::Fund).await.unwrap();
    let count_of = |status: RequestStatus| {
        summary
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap()
    };
    assert_eq!(count_of(RequestStatus::Pending), 1);
    assert_eq!(count_of(RequestStatus::Completed), 1);
    assert_eq!(count_of(RequestStatus::Rejected), 0);

    let stored = engine.request(RequestKind::Fund, fund.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Completed);
}

#[tokio::test]
async fn request_ids_are_scoped_by_kind() {
    let (engine, _db) = engine_with_db().await;
    let req = engine
        .create_fund_request(FundRequestCmd::new("alice", MoneyCents::new(100), "Pune"))
        .await
        .unwrap();

    let err = engine
        .move_to_processing(RequestKind::Transfer, req.id, "X", "root")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .request(RequestKind::Fund, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn users_and_credentials() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_user("alice", "other", Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let admin = engine.authenticate("root", "password").await.unwrap().unwrap();
    assert!(admin.is_admin());
    assert!(engine.authenticate("root", "nope").await.unwrap().is_none());
    assert!(engine.authenticate("ghost", "password").await.unwrap().is_none());

    let wallet = engine.wallet("bob").await.unwrap();
    assert_eq!(wallet.currency, Currency::Inr);
    assert_eq!(wallet.status, WalletStatus::Active);
}
