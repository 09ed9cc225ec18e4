use crate::domain::model::ProgressEvent;
use crate::domain::ports::ProgressReporter;
use std::sync::{Mutex, PoisonError};

/// 把進度逐行印到 stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: &ProgressEvent) {
        println!("{}", event);
    }
}

/// Keeps every event in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl ProgressReporter for MemoryReporter {
    fn report(&self, event: &ProgressEvent) {
        // 其他 thread panic 不應讓已記錄的事件消失
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for &R {
    fn report(&self, event: &ProgressEvent) {
        (**self).report(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_reporter_survives_poisoned_lock() {
        let reporter = Arc::new(MemoryReporter::new());
        reporter.report(&ProgressEvent::Started);

        let shared = Arc::clone(&reporter);
        let result = std::thread::spawn(move || {
            let _guard = shared.events.lock().unwrap();
            panic!("reporter user crashed while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(reporter.events.is_poisoned());

        reporter.report(&ProgressEvent::Finished);

        assert_eq!(
            reporter.lines(),
            vec!["Begin culling of Bad Layers", "Done culling Bad Layers"]
        );
    }
}
