use crate::alert_log::alert_record::AlertRecord;
use crate::config::Config;
use crate::deny_list::is_dangerous;
use crate::image_classifier::interface::Classification;
use crate::library::notice::Notice;
use crate::library::shared_image::SharedImage;
use chrono::NaiveDateTime;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub path: PathBuf,
    pub captured_at: NaiveDateTime,
    pub image: SharedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("Unable to open the webcam. Please check your webcam connection.")]
    DeviceUnavailable,
    #[error("Failed to capture frame from the webcam.")]
    PreviewReadFailed,
    #[error("Failed to capture image from the webcam.")]
    CaptureReadFailed,
    #[error("Failed to store the captured image: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Observing {
        remaining_secs: u64,
    },
    Classifying {
        capture: CapturedFrame,
    },
    Logging {
        capture: CapturedFrame,
        classification: Classification,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub phase: Phase,
    /// Messages of the current interaction, oldest first.
    pub notices: Vec<Notice>,
    /// Live preview while observing, the stored frame afterwards.
    pub frame: Option<SharedImage>,
}

impl State {
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    fn idle_with(mut self, notice: Notice) -> Self {
        self.phase = Phase::Idle;
        self.notices.push(notice);
        self
    }
}

#[derive(Debug)]
pub enum Event {
    CaptureClicked,
    PreviewFrame {
        frame: SharedImage,
        remaining_secs: u64,
    },
    CaptureDone(Result<CapturedFrame, CaptureError>),
    ClassifyDone(Result<Classification, Box<dyn std::error::Error + Send + Sync>>),
    AlertLogged(Result<(), Box<dyn std::error::Error + Send + Sync>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CaptureFrame,
    ClassifyFrame { path: PathBuf },
    LogAlert { record: AlertRecord },
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State {
            phase: Phase::Idle,
            notices: vec![],
            frame: None,
        },
        vec![],
    )
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    match (state.phase.clone(), event) {
        (Phase::Idle, Event::CaptureClicked) => (
            State {
                phase: Phase::Observing {
                    remaining_secs: config.observation_window.as_secs(),
                },
                notices: vec![],
                frame: None,
            },
            vec![Effect::CaptureFrame],
        ),

        (
            Phase::Observing { .. },
            Event::PreviewFrame {
                frame,
                remaining_secs,
            },
        ) => (
            State {
                phase: Phase::Observing { remaining_secs },
                frame: Some(frame),
                ..state
            },
            vec![],
        ),
        (Phase::Observing { .. }, Event::CaptureDone(Ok(capture))) => {
            let mut notices = state.notices;
            notices.push(Notice::success("Image captured successfully!"));
            let path = capture.path.clone();
            (
                State {
                    frame: Some(capture.image.clone()),
                    phase: Phase::Classifying { capture },
                    notices,
                },
                vec![Effect::ClassifyFrame { path }],
            )
        }
        (Phase::Observing { .. }, Event::CaptureDone(Err(error))) => {
            (state.idle_with(Notice::error(error.to_string())), vec![])
        }

        (Phase::Classifying { capture }, Event::ClassifyDone(Ok(classification))) => {
            let mut notices = state.notices.clone();
            notices.push(Notice::info(format!(
                "Predicted animal: {} with confidence {:.2}",
                classification.label, classification.confidence
            )));

            if is_dangerous(&classification.label) {
                notices.push(Notice::warning(format!(
                    "Warning! Dangerous animal detected: {}",
                    classification.label
                )));
                let record = AlertRecord::new(
                    capture.captured_at,
                    &classification.label,
                    classification.confidence,
                    &capture.path,
                );
                (
                    State {
                        phase: Phase::Logging {
                            capture,
                            classification,
                        },
                        notices,
                        ..state
                    },
                    vec![Effect::LogAlert { record }],
                )
            } else {
                notices.push(Notice::info(format!(
                    "Detected animal: {} is not a threat.",
                    classification.label
                )));
                (
                    State {
                        phase: Phase::Idle,
                        notices,
                        ..state
                    },
                    vec![],
                )
            }
        }
        (Phase::Classifying { .. }, Event::ClassifyDone(Err(error))) => (
            state.idle_with(Notice::error(format!("Classification failed: {}", error))),
            vec![],
        ),

        (Phase::Logging { classification, .. }, Event::AlertLogged(Ok(()))) => (
            state.idle_with(Notice::success(format!(
                "Alert logged for {}",
                classification.label
            ))),
            vec![],
        ),
        (Phase::Logging { .. }, Event::AlertLogged(Err(error))) => (
            state.idle_with(Notice::error(format!("Failed to log alert: {}", error))),
            vec![],
        ),

        // Clicks while busy and late events from an earlier interaction
        _ => (state, vec![]),
    }
}
