use crate::alert_log::alert_record::AlertRecord;
use crate::alert_log::interface::AlertLog;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::library::shared_image::SharedImage;
use crate::monitoring_page::core::{AlertRow, Effect, Event, RowImageError, RowOutcome};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    alert_log: Arc<dyn AlertLog + Send + Sync>,
    event_sender: Sender<Event>,
    request_repaint: Arc<dyn Fn() + Send + Sync>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        alert_log: Arc<dyn AlertLog + Send + Sync>,
        event_sender: Sender<Event>,
        request_repaint: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("run_effect"),
            alert_log,
            event_sender,
            request_repaint,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::InitializeAndLoad { request } => {
                let result = self
                    .alert_log
                    .initialize()
                    .and_then(|_| self.alert_log.load());
                self.log_failure("Loading alerts", &result);
                self.send(Event::AlertsLoaded { request, result });
            }
            Effect::LoadAlerts { request } => {
                let result = self.alert_log.load();
                self.log_failure("Loading alerts", &result);
                self.send(Event::AlertsLoaded { request, result });
            }
            Effect::LoadRowImages { table } => {
                let outcomes = table.rows.iter().map(|r| self.load_row(r)).collect();
                self.send(Event::RowsLoaded { table, outcomes });
            }
            Effect::ClearLog => {
                let cleared = self.alert_log.clear();
                self.log_failure("Clearing alerts", &cleared);
                self.send(Event::Cleared(cleared));
            }
        }
    }

    fn send(&self, event: Event) {
        if self.event_sender.send(event).is_ok() {
            (self.request_repaint)();
        }
    }

    fn log_failure<T, E: std::fmt::Display>(&self, what: &str, result: &Result<T, E>) {
        if let Err(error) = result {
            let _ = self.logger.error(&format!("{} failed: {}", what, error));
        }
    }

    /// A row whose image is gone is reported on its own; the others still load.
    fn load_row(&self, record: &AlertRecord) -> RowOutcome {
        let path = Path::new(&record.image);
        if record.image.is_empty() || !path.is_file() {
            return Err(RowImageError::NotFound {
                path: record.image.clone(),
            });
        }

        let image = image::open(path).map_err(|e| RowImageError::Unreadable {
            path: record.image.clone(),
            reason: e.to_string(),
        })?;

        let width = self.config.thumbnail_width;
        let thumbnail = if image.width() > width {
            image.thumbnail(width, u32::MAX)
        } else {
            image
        };

        Ok(AlertRow::new(record, SharedImage::new(&thumbnail)))
    }
}
