use std::{
    collections::VecDeque,
    sync::{mpsc::Receiver, Arc, Mutex, PoisonError},
    thread,
};

use eframe::CreationContext;
use egui::plot::{Line, Plot};

/// Sent to the GUI on each logged training step: (iteration, training error)
pub type IterationState = (usize, f64);

/// Any type that can be rendered and updated during training
pub trait Visualizer: eframe::App + 'static {
    const DATA_LIMIT: usize = 20_000;
    fn new(cc: &CreationContext, rx: Receiver<IterationState>) -> Self;
}

/// Plots the training error against the iteration count.
pub struct NNGui {
    points: Arc<Mutex<VecDeque<IterationState>>>,
}

impl Visualizer for NNGui {
    /// Starts a listener thread that appends every received state and asks
    /// egui for a repaint. The thread ends when the training side hangs up.
    fn new(cc: &CreationContext, rx: Receiver<IterationState>) -> Self {
        let points = Arc::new(Mutex::new(VecDeque::new()));
        let shared = points.clone();

        let ctx = cc.egui_ctx.clone();
        thread::spawn(move || {
            for state in rx {
                let mut points = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if points.len() == Self::DATA_LIMIT {
                    points.pop_front();
                }
                points.push_back(state);
                ctx.request_repaint();
            }
        });

        Self { points }
    }
}

impl eframe::App for NNGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let line: Vec<[f64; 2]> = self
            .snapshot()
            .into_iter()
            .map(|(i, error)| [i as f64, error])
            .collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical(|ui| {
                match line.last() {
                    Some([i, error]) => {
                        ui.heading(format!("Iteration {} error: {error:.6}", *i as usize))
                    }
                    None => ui.heading("Waiting for the first training step"),
                };
                Plot::new("Error").show(ui, |plot_ui| plot_ui.line(Line::new(line)));
            });
        });
    }
}

impl NNGui {
    /// Copy of the points received so far, oldest first
    pub fn snapshot(&self) -> Vec<IterationState> {
        let points = self.points.lock().unwrap_or_else(PoisonError::into_inner);
        points.iter().copied().collect()
    }
}
