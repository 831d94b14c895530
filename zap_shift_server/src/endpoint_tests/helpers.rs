use actix_web::{http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use log::debug;
use zap_shift_engine::db_types::{Parcel, ParcelId, Payment, PaymentStatus};

pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init();
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn get_request<F>(auth_header: &str, path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let mut req = TestRequest::get().uri(path);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", auth_header));
    }
    send_request(req, configure).await
}

pub fn parcel(id: i64, sender: &str, name: &str) -> Parcel {
    Parcel {
        id: ParcelId(id),
        sender_email: sender.to_string(),
        parcel_name: name.to_string(),
        cost: 25.99,
        payment_status: PaymentStatus::Unpaid,
        tracking_id: None,
        receiver_name: None,
        receiver_email: None,
        pickup_address: None,
        delivery_address: None,
        parcel_weight: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
    }
}

pub fn payment(id: i64, email: &str, transaction_id: &str, tracking_id: &str) -> Payment {
    Payment {
        id,
        amount: 25.99,
        currency: "usd".to_string(),
        customer_email: Some(email.to_string()),
        parcel_id: ParcelId(id),
        parcel_name: "Books".to_string(),
        transaction_id: transaction_id.to_string(),
        payment_status: "paid".to_string(),
        paid_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
        tracking_id: tracking_id.to_string(),
    }
}
