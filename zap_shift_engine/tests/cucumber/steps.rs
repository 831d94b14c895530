use cucumber::{then, when};
use zap_shift_engine::{
    checkout_objects::CheckoutRequest,
    db_types::{NewParcel, PaymentStatus},
    helpers::is_valid_tracking_id,
    payment_objects::PaymentQueryFilter,
    traits::data_objects::Sort,
    GatewayError,
    PaymentManagement,
    ReconciliationResult,
};

use crate::cucumber::ParcelWorld;

#[when(expr = "{string} books a parcel named {string} costing {float}")]
async fn book_parcel(world: &mut ParcelWorld, sender: String, name: String, cost: f64) {
    let parcel = NewParcel::new(sender, name.clone(), cost);
    let parcel = world.system().parcels.create_parcel(parcel).await.expect("Error booking parcel");
    world.parcels.insert(name, parcel.id);
}

#[when(expr = "the sender opens a checkout session for {string}")]
async fn open_checkout(world: &mut ParcelWorld, name: String) {
    let system = world.system();
    let parcel = system.parcels.parcel_by_id(world.parcel_id(&name)).await.unwrap().expect("Parcel does not exist");
    let request = CheckoutRequest {
        cost: parcel.cost,
        parcel_id: parcel.id,
        parcel_name: parcel.parcel_name,
        sender_email: Some(parcel.sender_email),
    };
    let result = system.checkout.create_checkout_session(request).await;
    world.checkout_result = Some(result);
}

#[when(expr = "the customer pays session {word} with transaction {word}")]
async fn customer_pays(world: &mut ParcelWorld, session_id: String, transaction_id: String) {
    world.system().gateway.pay(&session_id, &transaction_id);
}

#[when(expr = "the site reconciles session {word}")]
async fn reconcile(world: &mut ParcelWorld, session_id: String) {
    match world.system().reconciliation.reconcile_session(&session_id).await {
        Ok(result) => world.results.push(result),
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "the site reconciles session {word} {int} times")]
async fn reconcile_many(world: &mut ParcelWorld, session_id: String, count: usize) {
    for _ in 0..count {
        reconcile(world, session_id.clone()).await;
    }
}

#[then(expr = "the checkout page is {string}")]
async fn checkout_page(world: &mut ParcelWorld, url: String) {
    let result = world.checkout_result.as_ref().expect("No checkout was attempted");
    assert_eq!(result.as_deref().ok(), Some(url.as_str()));
}

#[then("the checkout is rejected as an invalid amount")]
async fn checkout_rejected(world: &mut ParcelWorld) {
    let result = world.checkout_result.as_ref().expect("No checkout was attempted");
    assert!(matches!(result, Err(GatewayError::InvalidAmount(_))), "{result:?}");
    assert!(world.system().gateway.created_sessions().is_empty(), "The provider must not be contacted");
}

#[then(expr = "the provider was asked to charge {int} cents for {string}")]
async fn provider_charge(world: &mut ParcelWorld, cents: i64, product: String) {
    let sessions = world.system().gateway.created_sessions();
    let session = sessions.last().expect("No checkout session was created");
    assert_eq!(session.amount.value(), cents);
    assert_eq!(session.product_name, product);
    assert_eq!(session.success_url, "https://zap.example/dashboard/payment-success?session_id={CHECKOUT_SESSION_ID}");
}

#[then("the payment is recorded with a tracking id")]
async fn payment_recorded(world: &mut ParcelWorld) {
    let result = world.results.last().expect("No reconciliation result");
    assert!(result.is_recorded(), "{result:?}");
    assert!(is_valid_tracking_id(result.tracking_id().unwrap_or_default()));
}

#[then("nothing was recorded")]
async fn nothing_recorded(world: &mut ParcelWorld) {
    assert_eq!(world.results.last(), Some(&ReconciliationResult::NotPaid));
    let payments = world.system().db.find_payments(PaymentQueryFilter::default(), Sort::default()).await.unwrap();
    assert!(payments.is_empty());
}

#[then("every reconciliation returned the same tracking id")]
async fn same_tracking_id(world: &mut ParcelWorld) {
    let first = world.results.first().and_then(|r| r.tracking_id()).expect("No tracking id issued");
    assert!(world.results.iter().all(|r| r.tracking_id() == Some(first)));
    assert_eq!(world.results.iter().filter(|r| r.is_recorded()).count(), 1);
}

#[then(expr = "the parcel {string} is paid with that tracking id")]
async fn parcel_paid(world: &mut ParcelWorld, name: String) {
    let tracking_id = world.results.last().and_then(|r| r.tracking_id()).expect("No tracking id issued");
    let parcel = world.system().parcels.parcel_by_id(world.parcel_id(&name)).await.unwrap().unwrap();
    assert_eq!(parcel.payment_status, PaymentStatus::Paid);
    assert_eq!(parcel.tracking_id.as_deref(), Some(tracking_id));
}

#[then(expr = "the parcel {string} is unpaid")]
async fn parcel_unpaid(world: &mut ParcelWorld, name: String) {
    let parcel = world.system().parcels.parcel_by_id(world.parcel_id(&name)).await.unwrap().unwrap();
    assert_eq!(parcel.payment_status, PaymentStatus::Unpaid);
    assert!(parcel.tracking_id.is_none());
}

#[then(expr = "the ledger holds {int} payment(s) for transaction {word} with amount {float}")]
async fn ledger_holds(world: &mut ParcelWorld, count: usize, transaction_id: String, amount: f64) {
    let filter = PaymentQueryFilter::default().with_transaction_id(transaction_id);
    let payments = world.system().db.find_payments(filter, Sort::default()).await.unwrap();
    assert_eq!(payments.len(), count);
    assert!(payments.iter().all(|p| p.amount == amount));
}

#[then(expr = "reconciliation failed because the session was not found")]
async fn session_not_found(world: &mut ParcelWorld) {
    let err = world.last_error.as_ref().expect("Reconciliation did not fail");
    assert!(matches!(err, zap_shift_engine::ReconciliationError::Gateway(GatewayError::SessionNotFound(_))));
}
