use crate::service::TaskService;

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(tasks: TaskService) -> Self {
        Self { tasks }
    }
}
