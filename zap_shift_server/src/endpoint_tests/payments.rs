use actix_web::{http::StatusCode, web, web::ServiceConfig};
use zap_shift_engine::{db_types::Payment, PaymentsApi};

use super::{
    helpers::{get_request, payment},
    mocks::{verifier_for_a, MockPaymentManager},
};
use crate::{middleware::IdentityMiddlewareFactory, routes::PaymentsRoute};

fn configure(db: MockPaymentManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let scope = web::scope("/payments")
            .wrap(IdentityMiddlewareFactory::new(verifier_for_a()))
            .service(PaymentsRoute::<MockPaymentManager>::new());
        cfg.app_data(web::Data::new(PaymentsApi::new(db))).service(scope);
    }
}

fn history_for_a() -> MockPaymentManager {
    let mut db = MockPaymentManager::new();
    db.expect_find_payments()
        .withf(|filter, _| filter.customer_email.as_deref() == Some("a@x.com"))
        .returning(|_, _| {
            Ok(vec![
                payment(2, "a@x.com", "pi_2", "PRCL-20250302-00AB12"),
                payment(1, "a@x.com", "pi_1", "PRCL-20250301-FF0012"),
            ])
        });
    db
}

#[actix_web::test]
async fn fetch_my_payments() {
    let (status, body) = get_request("Bearer token-a", "/payments?email=a@x.com", configure(history_for_a())).await;
    assert_eq!(status, StatusCode::OK);
    let payments: Vec<Payment> = serde_json::from_str(&body).unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].transaction_id, "pi_2");
    assert!(body.contains(r#""trackingId":"PRCL-20250302-00AB12""#), "was: {body}");
    assert!(body.contains(r#""paidAt":"2025-03-01T10:00:00Z""#), "was: {body}");
}

#[actix_web::test]
async fn fetch_another_users_payments_is_forbidden() {
    let mut db = MockPaymentManager::new();
    db.expect_find_payments().never();
    let (status, body) = get_request("Bearer token-a", "/payments?email=b@x.com", configure(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Insufficient Permissions. You may only view your own payments"}"#);
}

#[actix_web::test]
async fn fetch_all_payments_without_a_filter() {
    let mut db = MockPaymentManager::new();
    db.expect_find_payments()
        .withf(|filter, _| filter.is_empty())
        .returning(|_, _| Ok(vec![payment(1, "b@x.com", "pi_1", "PRCL-20250301-FF0012")]));
    let (status, body) = get_request("Bearer token-a", "/payments", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""customerEmail":"b@x.com""#), "was: {body}");
}

#[actix_web::test]
async fn fetch_payments_without_a_credential() {
    let mut db = MockPaymentManager::new();
    db.expect_find_payments().never();
    let (status, body) = get_request("", "/payments?email=a@x.com", configure(db)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. No bearer credential was provided."}"#);
}

#[actix_web::test]
async fn fetch_payments_with_an_invalid_credential() {
    let mut db = MockPaymentManager::new();
    db.expect_find_payments().never();
    let (status, body) = get_request("Bearer token-b", "/payments?email=a@x.com", configure(db)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("The credential could not be verified"), "was: {body}");
    let mut db = MockPaymentManager::new();
    db.expect_find_payments().never();
    let (status, _) = get_request("Basic YTpi", "/payments", configure(db)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
