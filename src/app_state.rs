use crate::category_store::CategoryStore;
use crate::db::Database;
use crate::task_store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tasks: TaskStore,
    pub categories: CategoryStore,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            tasks: TaskStore::new(db.pool().clone()),
            categories: CategoryStore::new(db.pool().clone()),
            db,
        }
    }
}
