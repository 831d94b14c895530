use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use thiserror::Error;
use zap_shift_engine::{GatewayError, ParcelApiError, PaymentsApiError, ReconciliationError, StoreError, UserApiError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("The database is unavailable. Please try again. {0}")]
    StorageUnavailable(String),
    #[error("The payment provider could not complete the request. Please try again. {0}")]
    PaymentProviderError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("The payment cannot be processed. {0}")]
    UnprocessablePayment(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnprocessablePayment(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingCredential => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
                AuthError::VerifierUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::PaymentProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No bearer credential was provided.")]
    MissingCredential,
    #[error("The credential is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("The credential could not be verified. {0}")]
    InvalidCredential(String),
    #[error("The identity service is unavailable. {0}")]
    VerifierUnavailable(String),
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DatabaseError(s) => {
                error!("🗃️ Database error: {s}");
                Self::StorageUnavailable(s)
            },
            StoreError::ParcelNotFound(id) => Self::NoRecordFound(format!("Parcel {id} does not exist")),
            StoreError::UpdateNoOp | StoreError::QueryError(_) | StoreError::InvalidParcelUpdate(_) => {
                Self::ValidationError(e.to_string())
            },
            _ => Self::BackendError(e.to_string()),
        }
    }
}

impl From<GatewayError> for ServerError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::InvalidAmount(_) | GatewayError::InvalidRequest(_) => Self::ValidationError(e.to_string()),
            GatewayError::SessionNotFound(_) => Self::NoRecordFound(e.to_string()),
            GatewayError::ProviderError(s) => Self::PaymentProviderError(s),
        }
    }
}

impl From<ReconciliationError> for ServerError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::MissingSessionId => Self::ValidationError(e.to_string()),
            ReconciliationError::Gateway(e) => e.into(),
            ReconciliationError::Store(e) => e.into(),
            ReconciliationError::InvalidSessionMetadata { .. } => Self::UnprocessablePayment(e.to_string()),
            ReconciliationError::TrackingIdExhausted(_) => Self::StorageUnavailable(e.to_string()),
        }
    }
}

impl From<ParcelApiError> for ServerError {
    fn from(e: ParcelApiError) -> Self {
        match e {
            ParcelApiError::InvalidParcel(_) => Self::ValidationError(e.to_string()),
            ParcelApiError::Store(e) => e.into(),
        }
    }
}

impl From<PaymentsApiError> for ServerError {
    fn from(e: PaymentsApiError) -> Self {
        match e {
            PaymentsApiError::Forbidden { .. } => {
                Self::InsufficientPermissions("You may only view your own payments".to_string())
            },
            PaymentsApiError::Store(e) => e.into(),
        }
    }
}

impl From<UserApiError> for ServerError {
    fn from(e: UserApiError) -> Self {
        match e {
            UserApiError::InvalidUser(_) => Self::ValidationError(e.to_string()),
            UserApiError::Store(e) => e.into(),
        }
    }
}
