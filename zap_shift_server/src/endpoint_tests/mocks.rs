use mockall::mock;
use zap_shift_engine::{
    checkout_objects::{CheckoutSessionRequest, SessionInfo},
    db_types::{NewParcel, NewPayment, NewUser, Parcel, ParcelId, Payment, User},
    parcel_objects::{ParcelQueryFilter, ParcelUpdate},
    payment_objects::{PaymentQueryFilter, PaymentUpdate},
    traits::{
        data_objects::{ParcelSortField, PaymentSortField, Sort},
        GatewayError,
        ParcelManagement,
        PaymentManagement,
        PaymentSessionGateway,
        StoreError,
        UpdateResult,
        UserManagement,
    },
};

use crate::{
    auth::{IdentityVerifier, VerifiedIdentity},
    errors::AuthError,
};

mock! {
    pub ParcelManager {}
    impl ParcelManagement for ParcelManager {
        async fn insert_parcel(&self, parcel: NewParcel) -> Result<Parcel, StoreError>;
        async fn fetch_parcel(&self, id: ParcelId) -> Result<Option<Parcel>, StoreError>;
        async fn find_one_parcel(&self, filter: ParcelQueryFilter) -> Result<Option<Parcel>, StoreError>;
        async fn find_parcels(&self, filter: ParcelQueryFilter, sort: Sort<ParcelSortField>) -> Result<Vec<Parcel>, StoreError>;
        async fn update_parcel(&self, id: ParcelId, update: ParcelUpdate) -> Result<UpdateResult, StoreError>;
        async fn delete_parcel(&self, id: ParcelId) -> Result<u64, StoreError>;
    }
}

mock! {
    pub PaymentManager {}
    impl PaymentManagement for PaymentManager {
        async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError>;
        async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, StoreError>;
        async fn find_one_payment(&self, filter: PaymentQueryFilter) -> Result<Option<Payment>, StoreError>;
        async fn find_payments(&self, filter: PaymentQueryFilter, sort: Sort<PaymentSortField>) -> Result<Vec<Payment>, StoreError>;
        async fn update_payment(&self, id: i64, update: PaymentUpdate) -> Result<UpdateResult, StoreError>;
    }
}

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn insert_user(&self, user: NewUser) -> Result<(User, bool), StoreError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    }
}

mock! {
    pub Verifier {}
    impl IdentityVerifier for Verifier {
        async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
    }
}

/// A verifier that knows a single token, `token-a`, belonging to `a@x.com`.
pub fn verifier_for_a() -> MockVerifier {
    let mut verifier = MockVerifier::new();
    verifier.expect_verify_token().returning(|token| match token {
        "token-a" => Ok(VerifiedIdentity::new("a@x.com")),
        _ => Err(AuthError::InvalidCredential("The credential is invalid or has expired".into())),
    });
    verifier
}

/// A payment provider with a fixed set of sessions. Every checkout it opens is for `cs_test_1`.
#[derive(Clone, Default)]
pub struct StubGateway {
    pub sessions: Vec<SessionInfo>,
}

impl StubGateway {
    pub fn with_session(session: SessionInfo) -> Self {
        Self { sessions: vec![session] }
    }
}

impl PaymentSessionGateway for StubGateway {
    async fn create_checkout_session(&self, _request: CheckoutSessionRequest) -> Result<String, GatewayError> {
        Ok("https://checkout.test/c/pay/cs_test_1".to_string())
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionInfo, GatewayError> {
        self.sessions
            .iter()
            .find(|s| s.session_id == session_id)
            .cloned()
            .ok_or_else(|| GatewayError::SessionNotFound(session_id.to_string()))
    }
}
