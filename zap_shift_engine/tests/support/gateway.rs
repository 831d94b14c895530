use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
};

use zap_common::Cents;
use zap_shift_engine::{
    checkout_objects::{CheckoutSessionRequest, SessionInfo},
    GatewayError,
    PaymentSessionGateway,
};

/// A payment provider that lives in memory. Sessions are created unpaid, and tests move them along with
/// [`InMemoryGateway::pay`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    sessions: Arc<Mutex<HashMap<String, SessionInfo>>>,
    created: Arc<Mutex<Vec<CheckoutSessionRequest>>>,
    retrievals: Arc<AtomicUsize>,
    outage: Arc<Mutex<Option<GatewayError>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&self, session: SessionInfo) {
        self.sessions.lock().unwrap().insert(session.session_id.clone(), session);
    }

    /// Adds a session that the provider reports as paid.
    pub fn add_paid_session(&self, session_id: &str, transaction_id: &str, parcel_id: &str, amount: i64) {
        self.add_session(paid_session(session_id, transaction_id, parcel_id, amount));
    }

    /// Simulates the customer completing payment on the hosted page.
    pub fn pay(&self, session_id: &str, transaction_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(session_id).expect("No such session");
        session.payment_status = "paid".into();
        session.transaction_id = Some(transaction_id.into());
    }

    pub fn set_outage(&self, error: Option<GatewayError>) {
        *self.outage.lock().unwrap() = error;
    }

    pub fn created_sessions(&self) -> Vec<CheckoutSessionRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn retrievals(&self) -> usize {
        self.retrievals.load(Ordering::SeqCst)
    }
}

pub fn paid_session(session_id: &str, transaction_id: &str, parcel_id: &str, amount: i64) -> SessionInfo {
    SessionInfo {
        session_id: session_id.into(),
        payment_status: "paid".into(),
        transaction_id: Some(transaction_id.into()),
        amount_total: Some(Cents::from(amount)),
        currency: Some("usd".into()),
        customer_email: Some("a@x.com".into()),
        parcel_id: Some(parcel_id.into()),
        parcel_name: Some("Books".into()),
    }
}

impl PaymentSessionGateway for InMemoryGateway {
    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<String, GatewayError> {
        if let Some(e) = self.outage.lock().unwrap().clone() {
            return Err(e);
        }
        let mut created = self.created.lock().unwrap();
        let session_id = format!("cs_test_{}", created.len() + 1);
        let session = SessionInfo {
            session_id: session_id.clone(),
            payment_status: "unpaid".into(),
            transaction_id: None,
            amount_total: Some(request.amount),
            currency: Some(request.currency.clone()),
            customer_email: request.customer_email.clone(),
            parcel_id: Some(request.parcel_id.to_string()),
            parcel_name: Some(request.parcel_name.clone()),
        };
        created.push(request);
        self.sessions.lock().unwrap().insert(session_id.clone(), session);
        Ok(format!("https://checkout.test/c/pay/{session_id}"))
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionInfo, GatewayError> {
        self.retrievals.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.outage.lock().unwrap().clone() {
            return Err(e);
        }
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| GatewayError::SessionNotFound(session_id.to_string()))
    }
}
