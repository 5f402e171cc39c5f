//! Engine wiring for the shell.

use std::sync::Arc;
use ticketing_engine::{
    DirectoryManager, NotificationCoordinator, RatingEngine, ReportEngine, SalesEngine,
    TripManager,
};
use ticketing_store::{MemoryStore, TicketingStore};

/// All engines over one shared in-memory store.
pub struct App {
    pub store: Arc<dyn TicketingStore>,
    pub coordinator: Arc<NotificationCoordinator>,
    pub trips: TripManager,
    pub sales: SalesEngine,
    pub ratings: RatingEngine,
    pub directory: DirectoryManager,
    pub reports: ReportEngine,
}

impl App {
    pub fn new() -> Self {
        let store: Arc<dyn TicketingStore> = Arc::new(MemoryStore::new());
        let coordinator = Arc::new(NotificationCoordinator::new(store.clone()));
        Self {
            trips: TripManager::new(store.clone(), coordinator.clone()),
            sales: SalesEngine::new(store.clone(), coordinator.clone()),
            ratings: RatingEngine::new(store.clone()),
            directory: DirectoryManager::new(store.clone()),
            reports: ReportEngine::new(store.clone()),
            coordinator,
            store,
        }
    }
}
