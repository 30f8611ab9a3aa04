use api_types::{
    bank_account::BankAccountNew,
    request::{RequestKind, RequestStatus},
    transition::RejectionReason,
};
use engine::{Currency, Engine, MoneyCents, Role, WalletStatus};
use migration::MigratorTrait;
use paydesk_client::{
    AdminDesk, Client, ClientError, Credentials, DeskError, FALLBACK_MESSAGE, RejectInput,
    WalletSession,
};
use sea_orm::Database;

async fn spawn_server() -> String {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .transfer_fee(MoneyCents::new(10))
        .currency(Currency::Inr)
        .build()
        .await
        .unwrap();
    engine.new_user("alice", "secret", Role::User).await.unwrap();
    engine.new_user("root", "secret", Role::Admin).await.unwrap();
    engine.new_user("carol", "secret", Role::User).await.unwrap();
    engine
        .set_wallet_status("carol", WalletStatus::Frozen)
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, listener).unwrap();
    format!("http://{addr}")
}

fn client(base_url: &str, username: &str) -> Client {
    Client::new(
        base_url,
        Credentials {
            username: username.to_string(),
            password: "secret".to_string(),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn deposit_and_transfer_through_the_desk() {
    let base_url = spawn_server().await;
    let mut alice = WalletSession::new(client(&base_url, "alice"));
    let desk = AdminDesk::new(client(&base_url, "root"));

    let deposit = alice.deposit(500, "Pune", "cash").await.unwrap();
    desk.load_tab(RequestKind::Fund, RequestStatus::Pending, 1)
        .await
        .unwrap();
    assert_eq!(desk.tab(RequestKind::Fund, RequestStatus::Pending).len(), 1);

    desk.move_to_processing(RequestKind::Fund, deposit.id, "UTR-500")
        .await
        .unwrap();
    let approved = desk.approve(RequestKind::Fund, deposit.id).await.unwrap();
    assert_eq!(approved.balance_after_minor, Some(500));
    assert!(approved.newly_settled);

    alice.refresh_requests().await.unwrap();
    assert_eq!(alice.balance().unwrap().balance_minor, 500);

    let account = alice
        .add_bank_account(&BankAccountNew {
            account_holder_name: "Alice Rao".to_string(),
            account_number: "123456789012".to_string(),
            ifsc_code: "HDFC0001234".to_string(),
            bank_name: None,
        })
        .await
        .unwrap();
    let transfer = alice.send(200, account.id, "rent").await.unwrap();
    assert_eq!(transfer.fee_minor, Some(10));

    desk.move_to_processing(RequestKind::Transfer, transfer.id, "UTR-200")
        .await
        .unwrap();
    let settled = desk.approve(RequestKind::Transfer, transfer.id).await.unwrap();
    assert_eq!(settled.balance_after_minor, Some(290));
    assert_eq!(desk.mirrored_balance("alice"), Some(290));

    let err = desk
        .approve(RequestKind::Transfer, transfer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Client(ClientError::Conflict(_))));
    assert_eq!(desk.mirrored_balance("alice"), Some(290));

    alice.refresh_requests().await.unwrap();
    assert_eq!(alice.balance().unwrap().balance_minor, 290);
}

#[tokio::test]
async fn rejection_keeps_balance_and_needs_admin() {
    let base_url = spawn_server().await;
    let mut alice = WalletSession::new(client(&base_url, "alice"));
    let request = alice.deposit(100, "Pune", "").await.unwrap();

    let not_admin = AdminDesk::new(client(&base_url, "alice"));
    let err = not_admin
        .load_tab(RequestKind::Fund, RequestStatus::Pending, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Client(ClientError::Forbidden(_))));

    let desk = AdminDesk::new(client(&base_url, "root"));
    desk.move_to_processing(RequestKind::Fund, request.id, "UTR-1")
        .await
        .unwrap();
    let rejected = desk
        .reject(
            RequestKind::Fund,
            request.id,
            &RejectInput::listed(RejectionReason::PaymentNotReceived),
        )
        .await
        .unwrap();
    assert_eq!(rejected.request.status, RequestStatus::Rejected);
    assert_eq!(
        rejected.request.rejection_reason.as_deref(),
        Some("Payment not received")
    );
    assert_eq!(rejected.balance_after_minor, None);

    assert_eq!(alice.refresh_balance().await.unwrap().balance_minor, 0);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let base_url = spawn_server().await;
    let intruder = Client::new(
        &base_url,
        Credentials {
            username: "alice".to_string(),
            password: "guess".to_string(),
        },
    )
    .unwrap();
    let mut session = WalletSession::new(intruder);
    let err = session.refresh_balance().await.unwrap_err();
    assert!(matches!(err, DeskError::Client(ClientError::Unauthorized(_))));
}

#[tokio::test]
async fn server_messages_reach_the_user() {
    let base_url = spawn_server().await;

    let desk = AdminDesk::new(client(&base_url, "root"));
    let err = desk
        .approve(RequestKind::Fund, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Client(ClientError::NotFound(_))));
    assert_ne!(err.user_message(), FALLBACK_MESSAGE);
    assert!(err.user_message().contains("key not found"));

    let mut carol = WalletSession::new(client(&base_url, "carol"));
    let err = carol.deposit(100, "Pune", "").await.unwrap_err();
    assert!(matches!(err, DeskError::Client(ClientError::Forbidden(_))));
    assert!(err.user_message().contains("frozen"));
}
