use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use zap_shift_engine::{CheckoutApi, ParcelApi, PaymentsApi, ReconciliationApi, SqliteDatabase, UserApi};

use crate::{
    audit_worker::start_audit_worker,
    auth::RemoteIdentityVerifier,
    config::ServerConfig,
    errors::ServerError,
    integrations::stripe::StripeGateway,
    middleware::IdentityMiddlewareFactory,
    routes::{
        banner,
        health,
        CheckoutSessionRoute,
        CreateParcelRoute,
        DeleteParcelRoute,
        ParcelByIdRoute,
        ParcelsRoute,
        PaymentSuccessRoute,
        PaymentsRoute,
        RegisterUserRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not migrate the database. {e}")))?;
    if config.audit_enabled {
        let _handle = start_audit_worker(db.clone(), config.audit_interval);
    } else {
        info!("🕵️ The payment audit worker is disabled");
    }
    let gateway = StripeGateway::new(config.stripe.clone())
        .map_err(|e| ServerError::InitializeError(format!("Could not create the Stripe client. {e}")))?;
    let verifier = RemoteIdentityVerifier::new(&config.identity)?;
    let srv = create_server_instance(config, db, gateway, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: StripeGateway,
    verifier: RemoteIdentityVerifier,
) -> Result<Server, ServerError> {
    let checkout_config = config.checkout_config();
    let srv = HttpServer::new(move || {
        let parcel_api = ParcelApi::new(db.clone());
        let payments_api = PaymentsApi::new(db.clone());
        let user_api = UserApi::new(db.clone());
        let checkout_api = CheckoutApi::new(gateway.clone(), checkout_config.clone());
        let reconciliation_api = ReconciliationApi::new(db.clone(), gateway.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("zap::access_log"))
            .app_data(web::Data::new(parcel_api))
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(user_api))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(reconciliation_api));
        // Routes that require a verified identity
        let payments_scope = web::scope("/payments")
            .wrap(IdentityMiddlewareFactory::new(verifier.clone()))
            .service(PaymentsRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(banner)
            .service(RegisterUserRoute::<SqliteDatabase>::new())
            .service(ParcelsRoute::<SqliteDatabase>::new())
            .service(CreateParcelRoute::<SqliteDatabase>::new())
            .service(ParcelByIdRoute::<SqliteDatabase>::new())
            .service(DeleteParcelRoute::<SqliteDatabase>::new())
            .service(CheckoutSessionRoute::<StripeGateway>::new())
            .service(PaymentSuccessRoute::<SqliteDatabase, StripeGateway>::new())
            .service(payments_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
