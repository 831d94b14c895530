use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use zap_common::Cents;
use zap_shift_engine::{
    checkout_objects::{CheckoutConfig, SessionInfo},
    db_types::{NewParcel, ParcelId, PaymentStatus},
    CheckoutApi,
    ParcelManagement,
    ReconciliationApi,
    SqliteDatabase,
};

use super::{helpers::send_request, mocks::StubGateway};
use crate::{
    data_objects::ReconciliationResponse,
    routes::{CheckoutSessionRoute, PaymentSuccessRoute},
};

fn configure_checkout(gateway: StubGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CheckoutApi::new(gateway, CheckoutConfig::new("https://zap.example", "usd"));
        cfg.app_data(web::Data::new(api)).service(CheckoutSessionRoute::<StubGateway>::new());
    }
}

fn configure_reconciliation(db: SqliteDatabase, gateway: StubGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ReconciliationApi::new(db, gateway)))
            .service(PaymentSuccessRoute::<SqliteDatabase, StubGateway>::new());
    }
}

/// A single-connection in-memory store, so that every query sees the same database.
async fn memory_db() -> SqliteDatabase {
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn paid_session(parcel_id: ParcelId) -> SessionInfo {
    SessionInfo {
        session_id: "cs_test_1".into(),
        payment_status: "paid".into(),
        transaction_id: Some("pi_3Ab".into()),
        amount_total: Some(Cents::from(2599)),
        currency: Some("usd".into()),
        customer_email: Some("a@x.com".into()),
        parcel_id: Some(parcel_id.to_string()),
        parcel_name: Some("Books".into()),
    }
}

async fn payment_success(db: &SqliteDatabase, gateway: &StubGateway, uri: &str) -> (StatusCode, String) {
    let req = TestRequest::patch().uri(uri);
    send_request(req, configure_reconciliation(db.clone(), gateway.clone())).await
}

#[actix_web::test]
async fn checkout_returns_the_hosted_page_url() {
    let req = TestRequest::post().uri("/payment-checkout-session").set_json(json!({
        "cost": 25.99, "parcelId": "17", "parcelName": "Books", "senderEmail": "a@x.com"
    }));
    let (status, body) = send_request(req, configure_checkout(StubGateway::default())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"url":"https://checkout.test/c/pay/cs_test_1"}"#);
}

#[actix_web::test]
async fn checkout_rejects_amounts_below_a_cent() {
    for cost in [0.0, 0.001, -5.0] {
        let req = TestRequest::post()
            .uri("/payment-checkout-session")
            .set_json(json!({"cost": cost, "parcelId": 17, "parcelName": "Books"}));
        let (status, body) = send_request(req, configure_checkout(StubGateway::default())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "cost {cost} gave {body}");
    }
}

#[actix_web::test]
async fn checkout_rejects_malformed_bodies() {
    let req = TestRequest::post()
        .uri("/payment-checkout-session")
        .set_json(json!({"cost": 25.99, "parcelId": "not-an-id", "parcelName": "Books"}));
    let (status, _) = send_request(req, configure_checkout(StubGateway::default())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn payment_success_records_once_and_replays_the_tracking_id() {
    let db = memory_db().await;
    let parcel = db.insert_parcel(NewParcel::new("a@x.com", "Books", 25.99)).await.unwrap();
    let gateway = StubGateway::with_session(paid_session(parcel.id));

    let (status, body) = payment_success(&db, &gateway, "/payment-success?session_id=cs_test_1").await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    let first: ReconciliationResponse = serde_json::from_str(&body).unwrap();
    assert!(first.success);
    assert!(first.message.is_none());
    let update = first.modify_parcel.unwrap();
    assert_eq!((update.matched_count, update.modified_count), (1, 1));
    let payment = first.payment_info.unwrap();
    assert_eq!(payment.amount, 25.99);
    assert_eq!(payment.transaction_id, "pi_3Ab");
    let tracking_id = first.tracking_id.unwrap();
    assert_eq!(payment.tracking_id, tracking_id);

    for _ in 0..3 {
        let (status, body) = payment_success(&db, &gateway, "/payment-success?session_id=cs_test_1").await;
        assert_eq!(status, StatusCode::OK);
        let replay: ReconciliationResponse = serde_json::from_str(&body).unwrap();
        assert!(replay.success);
        assert_eq!(replay.message.as_deref(), Some("already exist"));
        assert_eq!(replay.tracking_id.as_deref(), Some(tracking_id.as_str()));
        assert!(replay.payment_info.is_none());
    }

    let parcel = db.fetch_parcel(parcel.id).await.unwrap().unwrap();
    assert_eq!(parcel.payment_status, PaymentStatus::Paid);
    assert_eq!(parcel.tracking_id.as_deref(), Some(tracking_id.as_str()));
}

#[actix_web::test]
async fn unpaid_sessions_are_not_recorded() {
    let db = memory_db().await;
    let mut session = paid_session(ParcelId(1));
    session.payment_status = "unpaid".into();
    session.transaction_id = None;
    let gateway = StubGateway::with_session(session);
    let (status, body) = payment_success(&db, &gateway, "/payment-success?session_id=cs_test_1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":false}"#);
}

#[actix_web::test]
async fn payment_success_needs_a_known_session() {
    let db = memory_db().await;
    let gateway = StubGateway::default();
    let (status, _) = payment_success(&db, &gateway, "/payment-success").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = payment_success(&db, &gateway, "/payment-success?session_id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = payment_success(&db, &gateway, "/payment-success?session_id=cs_unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("cs_unknown"), "was: {body}");
}

#[actix_web::test]
async fn paid_sessions_without_parcel_metadata_are_unprocessable() {
    let db = memory_db().await;
    let mut session = paid_session(ParcelId(1));
    session.parcel_id = None;
    let gateway = StubGateway::with_session(session);
    let (status, body) = payment_success(&db, &gateway, "/payment-success?session_id=cs_test_1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("error"), "was: {body}");
}
