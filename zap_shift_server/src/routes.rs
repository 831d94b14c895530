//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use zap_shift_engine::{
    checkout_objects::CheckoutRequest,
    db_types::{NewParcel, NewUser, ParcelId},
    traits::{ParcelManagement, PaymentManagement, PaymentSessionGateway, ReconciliationDatabase, UserManagement},
    CheckoutApi,
    ParcelApi,
    PaymentsApi,
    ReconciliationApi,
    UserApi,
};

use crate::{
    auth::VerifiedIdentity,
    data_objects::{CheckoutUrl, DeletedResponse, EmailQuery, InsertedResponse, ReconciliationResponse, SessionQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/")]
pub async fn banner() -> impl Responder {
    HttpResponse::Ok().body("zap is shifting shifting!")
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(register_user => Post "/users" impl UserManagement);
/// Registers a user after they sign up on the front end. Registering the same email twice is harmless: the existing
/// record is returned with a 200 rather than a 201.
pub async fn register_user<B: UserManagement>(
    body: web::Json<NewUser>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user = body.into_inner();
    debug!("💻️ POST register user {}", user.email);
    let (user, created) = api.register_user(user).await?;
    if created {
        Ok(HttpResponse::Created().json(user))
    } else {
        Ok(HttpResponse::Ok().json(user))
    }
}

//----------------------------------------------   Parcels  ----------------------------------------------------
route!(parcels => Get "/parcels" impl ParcelManagement);
/// Lists parcels, newest first. Pass `?email=` to list a single sender's parcels.
pub async fn parcels<B: ParcelManagement>(
    query: web::Query<EmailQuery>,
    api: web::Data<ParcelApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET parcels for {}", query.email().unwrap_or("everyone"));
    let parcels = api.parcels(query.email()).await?;
    Ok(HttpResponse::Ok().json(parcels))
}

route!(parcel_by_id => Get "/parcels/{id}" impl ParcelManagement);
/// Fetches a single parcel. Unknown ids return `null`.
pub async fn parcel_by_id<B: ParcelManagement>(
    path: web::Path<String>,
    api: web::Data<ParcelApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_parcel_id(&path)?;
    debug!("💻️ GET parcel {id}");
    let parcel = api.parcel_by_id(id).await?;
    Ok(HttpResponse::Ok().json(parcel))
}

route!(create_parcel => Post "/parcels" impl ParcelManagement);
pub async fn create_parcel<B: ParcelManagement>(
    body: web::Json<NewParcel>,
    api: web::Data<ParcelApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let parcel = body.into_inner();
    debug!("💻️ POST new parcel '{}' for {}", parcel.parcel_name, parcel.sender_email);
    let parcel = api.create_parcel(parcel).await?;
    Ok(HttpResponse::Ok().json(InsertedResponse { inserted_id: parcel.id.value() }))
}

route!(delete_parcel => Delete "/parcels/{id}" impl ParcelManagement);
pub async fn delete_parcel<B: ParcelManagement>(
    path: web::Path<String>,
    api: web::Data<ParcelApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = parse_parcel_id(&path)?;
    debug!("💻️ DELETE parcel {id}");
    let deleted_count = api.delete_parcel(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse { deleted_count }))
}

fn parse_parcel_id(s: &str) -> Result<ParcelId, ServerError> {
    s.parse::<ParcelId>().map_err(|e| {
        debug!("💻️ '{s}' is not a parcel id. {e}");
        ServerError::InvalidRequestPath(format!("'{s}' is not a valid parcel id"))
    })
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(checkout_session => Post "/payment-checkout-session" impl PaymentSessionGateway);
/// Opens a hosted checkout session for a parcel and returns the URL to send the customer to.
pub async fn checkout_session<G: PaymentSessionGateway>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<CheckoutApi<G>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST checkout session for parcel {} ({})", request.parcel_id, request.cost);
    let url = api.create_checkout_session(request).await?;
    Ok(HttpResponse::Ok().json(CheckoutUrl { url }))
}

route!(payment_success => Patch "/payment-success" impl ReconciliationDatabase, PaymentSessionGateway);
/// Reconciles the checkout session named in `?session_id=`.
///
/// The customer's browser calls this when it lands on the payment success page. It is safe to call any number of
/// times: every call for a paid session returns the same tracking id, and only the first one writes anything.
/// Sessions that have not been paid get `{"success": false}`.
pub async fn payment_success<B, G>(
    query: web::Query<SessionQuery>,
    api: web::Data<ReconciliationApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: ReconciliationDatabase,
    G: PaymentSessionGateway,
{
    debug!("💻️ PATCH payment success for session {}", query.session_id);
    let result = api.reconcile_session(&query.session_id).await?;
    Ok(HttpResponse::Ok().json(ReconciliationResponse::from(result)))
}

route!(payments => Get "" impl PaymentManagement);
/// Payment history, newest first. Mounted under `/payments` behind the identity middleware.
///
/// Callers may only filter by their own email. Asking for anybody else's history is refused with a 403. Without a
/// filter, the full history is returned.
pub async fn payments<B: PaymentManagement>(
    identity: VerifiedIdentity,
    query: web::Query<EmailQuery>,
    api: web::Data<PaymentsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payments for {} as {}", query.email().unwrap_or("everyone"), identity.email);
    let payments = api.payment_history(query.email(), &identity.email).await?;
    Ok(HttpResponse::Ok().json(payments))
}
