use crate::alert_log::interface::AlertLog;
use crate::capture_page::core::{init, transition, Effect, Event, State};
use crate::capture_page::render::Render;
use crate::capture_page::run_effect::RunEffect;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

pub struct CapturePage {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    state: State,
    run_effect: RunEffect,
    event_receiver: Receiver<Event>,
    render: Render,
}

impl CapturePage {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        alert_log: Arc<dyn AlertLog + Send + Sync>,
        request_repaint: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("capture_page");
        let (event_sender, event_receiver) = channel();
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            device_camera,
            image_classifier,
            alert_log,
            event_sender,
            request_repaint,
        );
        let (state, effects) = init();

        let page = Self {
            config,
            logger,
            state,
            run_effect,
            event_receiver,
            render: Render::new(),
        };
        page.spawn_effects(effects);
        page
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn dispatch(&mut self, event: Event) {
        if !matches!(event, Event::PreviewFrame { .. }) {
            let _ = self.logger.info(&format!("event: {:?}", event));
        }

        let (new_state, effects) = transition(&self.config, self.state.clone(), event);

        if new_state.phase != self.state.phase {
            let _ = self.logger.info(&format!(
                "phase: {:?}, effects: {:?}",
                new_state.phase, effects
            ));
        }

        self.state = new_state;
        self.spawn_effects(effects);
    }

    /// Applies every event the effect workers have reported so far.
    pub fn process_pending_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.dispatch(event);
        }
    }

    /// Blocks for at most `timeout` waiting for one worker event.
    #[allow(dead_code)]
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.event_receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.dispatch(event);
                true
            }
            Err(_) => false,
        }
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }
}

impl eframe::App for CapturePage {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_events();

        for event in self.render.render(ctx, &self.state) {
            self.dispatch(event);
        }
    }
}
