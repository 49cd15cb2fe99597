use parking_lot::Mutex;

use crate::notify::UserAlerts;

#[derive(Debug, Default)]
pub(crate) struct RecordingAlerts {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl UserAlerts for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
