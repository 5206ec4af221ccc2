use crate::alert_log::interface::AlertLog;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::monitoring_page::core::{init, transition, Effect, Event, State, View};
use crate::monitoring_page::render::Render;
use crate::monitoring_page::run_effect::RunEffect;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

pub struct MonitoringPage {
    logger: Arc<dyn Logger + Send + Sync>,
    state: State,
    effect_sender: Sender<Effect>,
    event_receiver: Receiver<Event>,
    render: Render,
}

impl MonitoringPage {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        alert_log: Arc<dyn AlertLog + Send + Sync>,
        request_repaint: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("monitoring_page");
        let (event_sender, event_receiver) = channel();
        let run_effect = RunEffect::new(
            config,
            logger.clone(),
            alert_log,
            event_sender,
            request_repaint,
        );

        // One worker, so log reads and writes never overlap. It exits once
        // the page drops its sender.
        let (effect_sender, effect_receiver) = channel::<Effect>();
        std::thread::spawn(move || {
            for effect in effect_receiver {
                run_effect.run_effect(effect);
            }
        });

        let (state, effects) = init();

        let page = Self {
            logger,
            state,
            effect_sender,
            event_receiver,
            render: Render::new(),
        };
        page.queue_effects(effects);
        page
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn dispatch(&mut self, event: Event) {
        let _ = self.logger.info(&format!("event: {:?}", event));

        let (new_state, effects) = transition(self.state.clone(), event);

        let _ = self.logger.info(&format!(
            "state: {}, effects: {:?}",
            describe(&new_state),
            effects
        ));

        self.state = new_state;
        self.queue_effects(effects);
    }

    pub fn process_pending_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.dispatch(event);
        }
    }

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

    fn queue_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(error) = self.effect_sender.send(effect) {
                let _ = self
                    .logger
                    .error(&format!("Effect worker gone, dropped {:?}", error.0));
            }
        }
    }
}

fn describe(state: &State) -> String {
    let view = match &state.view {
        View::Loading => "Loading".to_string(),
        View::Loaded { table } => format!("Loaded ({} rows)", table.len()),
        View::RenderedEmpty { .. } => "RenderedEmpty".to_string(),
        View::RenderedWithRows { rows, notices, .. } => format!(
            "RenderedWithRows ({} rows, {} notices)",
            rows.len(),
            notices.len()
        ),
        View::Failed { message } => format!("Failed ({})", message),
    };
    format!("{} [load #{}]", view, state.load_request)
}

impl eframe::App for MonitoringPage {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_events();

        for event in self.render.render(ctx, &self.state) {
            self.dispatch(event);
        }
    }
}
