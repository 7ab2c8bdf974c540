use super::{display::DisplayTerminal, Scheduler, Simulation, TickObserver};
use std::io;

pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    Digit(char),
    Backspace,
    Advance,
    Tick,
    None,
}

const MAX_PENDING_DIGITS: usize = 6;

/// Interactive driver: one screen per input event, ticks on demand.
pub struct ProcessRunner<S> {
    terminal: DisplayTerminal,
    simulation: Simulation<S>,
    observers: Vec<Box<dyn TickObserver>>,
    paused: bool,
    pending: String,
}

impl<S: Scheduler> ProcessRunner<S> {
    pub fn new(simulation: Simulation<S>) -> io::Result<Self> {
        let terminal = DisplayTerminal::new()?;

        Ok(Self {
            terminal,
            simulation,
            observers: Vec::new(),
            paused: true,
            pending: String::new(),
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn TickObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn simulation(&self) -> &Simulation<S> {
        &self.simulation
    }

    pub fn into_simulation(self) -> Simulation<S> {
        self.simulation
    }

    fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            if !self.simulation.step() {
                break;
            }
            let snapshot = self.simulation.snapshot();
            for observer in &mut self.observers {
                observer.observe(&snapshot);
            }
        }
    }

    fn status(&self) -> String {
        if self.simulation.is_finished() {
            return format!(
                "Finished at t={}. Press q to see the statistics.",
                self.simulation.clock()
            );
        }
        let mode = if self.paused { "paused" } else { "auto" };
        if self.pending.is_empty() {
            format!("Mode: {mode}")
        } else {
            format!("Mode: {mode} | advance {} ticks?", self.pending)
        }
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> io::Result<bool> {
        let status = self.status();
        self.terminal.draw(&self.simulation.snapshot(), &status)?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => {
                self.pending.clear();
                self.paused = false;
            }
            RunnerEvent::Step if self.paused => self.advance(1),
            RunnerEvent::Digit(digit) if self.paused => {
                if self.pending.len() < MAX_PENDING_DIGITS {
                    self.pending.push(digit);
                }
            }
            RunnerEvent::Backspace => {
                self.pending.pop();
            }
            RunnerEvent::Advance if self.paused => {
                let ticks = self.pending.parse::<u64>().unwrap_or(1).max(1);
                self.pending.clear();
                self.advance(ticks);
            }
            RunnerEvent::Tick if !self.paused => self.advance(1),
            _ => {}
        }
        Ok(true)
    }
}
