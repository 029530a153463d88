//! Shared application state for the gateway

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use autosplit_config::RealtimeConfig;
use autosplit_database::{BillRepository, GroupRepository};
use autosplit_ledger::LedgerService;
use autosplit_rooms::RoomRegistry;

use crate::coordinator::Coordinator;

/// Shared application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub groups: Arc<GroupRepository>,
    pub bills: Arc<BillRepository>,
    pub coordinator: Arc<Coordinator>,
    pub rooms: Arc<RoomRegistry>,
    pub realtime: RealtimeConfig,
}

impl AppState {
    pub fn new(pool: SqlitePool, realtime: RealtimeConfig) -> Self {
        let rooms = Arc::new(RoomRegistry::new());
        let ledger = Arc::new(LedgerService::new(pool.clone()));
        let coordinator = Arc::new(Coordinator::new(
            ledger,
            Arc::clone(&rooms),
            Duration::from_millis(realtime.summary_retry_delay_ms),
        ));

        Self {
            groups: Arc::new(GroupRepository::new(pool.clone())),
            bills: Arc::new(BillRepository::new(pool)),
            coordinator,
            rooms,
            realtime,
        }
    }
}
