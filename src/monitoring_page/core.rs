use crate::alert_log::alert_record::{AlertRecord, AlertTable, TIME_FORMAT};
use crate::alert_log::interface::AlertLogError;
use crate::library::notice::Notice;
use crate::library::shared_image::SharedImage;

/// One displayable row: the record's cells plus its loaded thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRow {
    pub time: String,
    pub animal: String,
    /// Two decimals.
    pub confidence: String,
    pub image_path: String,
    pub thumbnail: SharedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowImageError {
    #[error("Image not found or path is invalid. ({path})")]
    NotFound { path: String },
    #[error("Image could not be read: {path} ({reason})")]
    Unreadable { path: String, reason: String },
}

pub type RowOutcome = Result<AlertRow, RowImageError>;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    /// Table read; thumbnails being loaded.
    Loaded {
        table: AlertTable,
    },
    RenderedEmpty {
        notices: Vec<Notice>,
    },
    RenderedWithRows {
        table: AlertTable,
        rows: Vec<AlertRow>,
        notices: Vec<Notice>,
    },
    Failed {
        message: String,
    },
}

impl View {
    #[allow(dead_code)]
    pub fn is_rendered(&self) -> bool {
        matches!(
            self,
            View::RenderedEmpty { .. } | View::RenderedWithRows { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub view: View,
    /// Only the log read tagged with this id is applied. Refresh and Clear
    /// both move it on, so reads started before them are dropped.
    pub load_request: u64,
}

#[derive(Debug)]
pub enum Event {
    RefreshClicked,
    ClearClicked,
    AlertsLoaded {
        request: u64,
        result: Result<AlertTable, AlertLogError>,
    },
    RowsLoaded {
        table: AlertTable,
        outcomes: Vec<RowOutcome>,
    },
    Cleared(Result<(), AlertLogError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Creates a header-only log when none exists, then loads it.
    InitializeAndLoad { request: u64 },
    LoadAlerts { request: u64 },
    LoadRowImages { table: AlertTable },
    ClearLog,
}

impl AlertRow {
    pub fn new(record: &AlertRecord, thumbnail: SharedImage) -> Self {
        Self {
            time: record.time.format(TIME_FORMAT).to_string(),
            animal: record.animal.clone(),
            confidence: format!("{:.2}", record.confidence),
            image_path: record.image.clone(),
            thumbnail,
        }
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State {
            view: View::Loading,
            load_request: 1,
        },
        vec![Effect::InitializeAndLoad { request: 1 }],
    )
}

fn show(table: AlertTable) -> (View, Vec<Effect>) {
    if table.is_empty() {
        (View::RenderedEmpty { notices: vec![] }, vec![])
    } else {
        (
            View::Loaded {
                table: table.clone(),
            },
            vec![Effect::LoadRowImages { table }],
        )
    }
}

/// Refresh only re-renders when some cell differs.
fn on_loaded(view: View, table: AlertTable) -> (View, Vec<Effect>) {
    let unchanged = match &view {
        View::RenderedEmpty { .. } => table.is_empty(),
        View::RenderedWithRows { table: current, .. } => *current == table,
        _ => false,
    };
    if unchanged {
        (view, vec![])
    } else {
        show(table)
    }
}

fn on_rows_loaded(view: View, loaded: AlertTable, outcomes: Vec<RowOutcome>) -> View {
    match view {
        View::Loaded { table } if table == loaded => {
            let mut rows = vec![];
            let mut notices = vec![];
            for outcome in outcomes {
                match outcome {
                    Ok(row) => rows.push(row),
                    Err(error) => notices.push(Notice::error(error.to_string())),
                }
            }
            View::RenderedWithRows {
                table,
                rows,
                notices,
            }
        }
        // Thumbnails for a table that is no longer shown
        view => view,
    }
}

fn with_error(view: View, message: String) -> View {
    match view {
        View::RenderedEmpty { mut notices } => {
            notices.push(Notice::error(message));
            View::RenderedEmpty { notices }
        }
        View::RenderedWithRows {
            table,
            rows,
            mut notices,
        } => {
            notices.push(Notice::error(message));
            View::RenderedWithRows {
                table,
                rows,
                notices,
            }
        }
        _ => View::Failed { message },
    }
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    let State { view, load_request } = state;

    match event {
        Event::RefreshClicked => match view {
            View::RenderedEmpty { .. } | View::RenderedWithRows { .. } | View::Failed { .. } => {
                let request = load_request + 1;
                let view = match view {
                    View::Failed { .. } => View::Loading,
                    view => view,
                };
                (
                    State {
                        view,
                        load_request: request,
                    },
                    vec![Effect::LoadAlerts { request }],
                )
            }
            // Already loading
            view => (State { view, load_request }, vec![]),
        },

        Event::AlertsLoaded { request, .. } if request != load_request => {
            (State { view, load_request }, vec![])
        }
        Event::AlertsLoaded {
            result: Ok(table), ..
        } => {
            let (view, effects) = on_loaded(view, table);
            (State { view, load_request }, effects)
        }
        Event::AlertsLoaded {
            result: Err(error), ..
        } => (
            State {
                view: with_error(view, format!("Failed to load alerts: {}", error)),
                load_request,
            },
            vec![],
        ),

        Event::RowsLoaded { table, outcomes } => (
            State {
                view: on_rows_loaded(view, table, outcomes),
                load_request,
            },
            vec![],
        ),

        Event::ClearClicked => (
            State {
                view,
                load_request: load_request + 1,
            },
            vec![Effect::ClearLog],
        ),
        Event::Cleared(Ok(())) => (
            State {
                view: View::RenderedEmpty {
                    notices: vec![Notice::success("All alerts have been deleted.")],
                },
                load_request,
            },
            vec![],
        ),
        Event::Cleared(Err(error)) => (
            State {
                view: with_error(view, format!("Failed to clear alerts: {}", error)),
                load_request,
            },
            vec![],
        ),
    }
}
