use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use serde_json::json;
use zap_shift_engine::{
    db_types::{Parcel, ParcelId, User},
    ParcelApi,
    UserApi,
};

use super::{
    helpers::{get_request, parcel, send_request},
    mocks::{MockParcelManager, MockUserManager},
};
use crate::routes::{CreateParcelRoute, DeleteParcelRoute, ParcelByIdRoute, ParcelsRoute, RegisterUserRoute};

fn configure(db: MockParcelManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ParcelApi::new(db)))
            .service(ParcelsRoute::<MockParcelManager>::new())
            .service(CreateParcelRoute::<MockParcelManager>::new())
            .service(ParcelByIdRoute::<MockParcelManager>::new())
            .service(DeleteParcelRoute::<MockParcelManager>::new());
    }
}

#[actix_web::test]
async fn list_parcels_for_a_sender() {
    let mut db = MockParcelManager::new();
    db.expect_find_parcels()
        .withf(|filter, _| filter.sender_email.as_deref() == Some("a@x.com"))
        .returning(|_, _| Ok(vec![parcel(2, "a@x.com", "Shoes"), parcel(1, "a@x.com", "Books")]));
    let (status, body) = get_request("", "/parcels?email=a@x.com", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let parcels: Vec<Parcel> = serde_json::from_str(&body).unwrap();
    assert_eq!(parcels.len(), 2);
    assert_eq!(parcels[0].parcel_name, "Shoes");
    assert!(body.contains(r#""_id":2"#), "was: {body}");
    assert!(body.contains(r#""paymentStatus":"unpaid""#), "was: {body}");
}

#[actix_web::test]
async fn fetch_a_single_parcel() {
    let mut db = MockParcelManager::new();
    db.expect_fetch_parcel().withf(|id| *id == ParcelId(1)).returning(|_| Ok(Some(parcel(1, "a@x.com", "Books"))));
    let (status, body) = get_request("", "/parcels/1", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""parcelName":"Books""#), "was: {body}");

    let mut db = MockParcelManager::new();
    db.expect_fetch_parcel().returning(|_| Ok(None));
    let (status, body) = get_request("", "/parcels/9", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "null");
}

#[actix_web::test]
async fn parcel_ids_must_be_numeric() {
    let mut db = MockParcelManager::new();
    db.expect_fetch_parcel().never();
    let (status, body) = get_request("", "/parcels/6581f0c2a1", configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("is not a valid parcel id"), "was: {body}");
}

#[actix_web::test]
async fn book_a_parcel() {
    let mut db = MockParcelManager::new();
    db.expect_insert_parcel()
        .withf(|p| p.sender_email == "a@x.com" && p.parcel_name == "Books" && p.cost == 25.99)
        .returning(|_| Ok(parcel(7, "a@x.com", "Books")));
    let req = TestRequest::post()
        .uri("/parcels")
        .set_json(json!({"senderEmail": "a@x.com", "parcelName": "Books", "cost": 25.99, "receiverName": "B"}));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"insertedId":7}"#);
}

#[actix_web::test]
async fn parcels_must_have_a_positive_cost() {
    let mut db = MockParcelManager::new();
    db.expect_insert_parcel().never();
    let req = TestRequest::post()
        .uri("/parcels")
        .set_json(json!({"senderEmail": "a@x.com", "parcelName": "Books", "cost": -3.0}));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Cost must be a positive amount"), "was: {body}");
}

#[actix_web::test]
async fn delete_a_parcel() {
    let mut db = MockParcelManager::new();
    db.expect_delete_parcel().withf(|id| *id == ParcelId(3)).returning(|_| Ok(1));
    let req = TestRequest::delete().uri("/parcels/3");
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"deletedCount":1}"#);
}

#[actix_web::test]
async fn register_users_idempotently() {
    let user = User {
        id: 4,
        email: "a@x.com".into(),
        name: Some("A".into()),
        photo_url: None,
        role: "user".into(),
        created_at: Utc::now(),
    };
    for created in [true, false] {
        let mut db = MockUserManager::new();
        let u = user.clone();
        db.expect_insert_user()
            .withf(|n| n.email == "a@x.com" && n.name.as_deref() == Some("A"))
            .returning(move |_| Ok((u.clone(), created)));
        let req = TestRequest::post().uri("/users").set_json(json!({"email": "a@x.com", "displayName": "A"}));
        let (status, body) = send_request(req, move |cfg: &mut ServiceConfig| {
            cfg.app_data(web::Data::new(UserApi::new(db))).service(RegisterUserRoute::<MockUserManager>::new());
        })
        .await;
        let expected = if created { StatusCode::CREATED } else { StatusCode::OK };
        assert_eq!(status, expected);
        assert!(body.contains(r#""role":"user""#), "was: {body}");
    }
}
