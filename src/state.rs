use crate::services::assistant::Assistant;

pub struct AppState {
    pub assistant: Assistant,
}
