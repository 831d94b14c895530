use std::collections::HashMap;

use cucumber::World;
use log::*;
use zap_shift_engine::{
    checkout_objects::CheckoutConfig,
    db_types::ParcelId,
    CheckoutApi,
    GatewayError,
    ParcelApi,
    ReconciliationApi,
    ReconciliationError,
    ReconciliationResult,
    SqliteDatabase,
};

use crate::support::{gateway::InMemoryGateway, prepare_env::prepare_test_env};

#[derive(Default, Debug, World)]
pub struct ParcelWorld {
    pub system: Option<ZapShiftSystem>,
    pub parcels: HashMap<String, ParcelId>,
    pub results: Vec<ReconciliationResult>,
    pub last_error: Option<ReconciliationError>,
    pub checkout_result: Option<Result<String, GatewayError>>,
}

#[derive(Debug)]
pub struct ZapShiftSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub gateway: InMemoryGateway,
    pub parcels: ParcelApi<SqliteDatabase>,
    pub checkout: CheckoutApi<InMemoryGateway>,
    pub reconciliation: ReconciliationApi<SqliteDatabase, InMemoryGateway>,
}

impl ParcelWorld {
    pub fn system(&self) -> &ZapShiftSystem {
        self.system.as_ref().expect("System not initialised")
    }

    pub fn parcel_id(&self, name: &str) -> ParcelId {
        *self.parcels.get(name).unwrap_or_else(|| panic!("No parcel named {name}"))
    }
}

impl ZapShiftSystem {
    pub async fn new() -> Self {
        let (db_path, db) = prepare_test_env().await;
        debug!("Created database: {db_path}");
        let gateway = InMemoryGateway::new();
        let config = CheckoutConfig::new("https://zap.example", "usd");
        Self {
            parcels: ParcelApi::new(db.clone()),
            checkout: CheckoutApi::new(gateway.clone(), config),
            reconciliation: ReconciliationApi::new(db.clone(), gateway.clone()),
            db_path,
            db,
            gateway,
        }
    }
}
