use crate::scheduler::{Process, TickObserver, TickSnapshot};
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use tracing::warn;

const RULE: &str = "────────────────────────────────────────────────────────────────";
const TERMINATED_TAIL: usize = 5;

/// Plain-text snapshot view for continuous runs.
pub struct ConsoleView<W: Write> {
    out: W,
    clear_screen: bool,
    progress_bars: bool,
    bar_width: usize,
    failed: bool,
}

impl ConsoleView<io::Stdout> {
    pub fn stdout(clear_screen: bool, progress_bars: bool, bar_width: usize) -> Self {
        ConsoleView::new(io::stdout(), clear_screen, progress_bars, bar_width)
    }
}

impl<W: Write> ConsoleView<W> {
    pub const MIN_BAR_WIDTH: usize = 10;

    pub fn new(out: W, clear_screen: bool, progress_bars: bool, bar_width: usize) -> Self {
        Self {
            out,
            clear_screen,
            progress_bars,
            bar_width: bar_width.max(Self::MIN_BAR_WIDTH),
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, snapshot: &TickSnapshot) -> io::Result<()> {
        if self.clear_screen {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        writeln!(self.out, "t={}  | policy={}", snapshot.clock, snapshot.policy_name)?;
        writeln!(self.out, "{RULE}")?;

        match &snapshot.running {
            Some(process) => {
                writeln!(self.out, "RUNNING:")?;
                writeln!(self.out, "  {}", self.process_line(process))?;
            }
            None => writeln!(self.out, "RUNNING: (idle)")?,
        }
        writeln!(self.out)?;

        writeln!(self.out, "READY ({}):", snapshot.ready.len())?;
        if snapshot.ready.is_empty() {
            writeln!(self.out, "  (empty queue)")?;
        }
        for (index, process) in snapshot.ready.iter().enumerate() {
            writeln!(self.out, "  {:2}) {}", index + 1, self.process_line(process))?;
        }
        writeln!(self.out)?;

        writeln!(self.out, "WAITING ({}):", snapshot.waiting.len())?;
        if snapshot.waiting.is_empty() {
            writeln!(self.out, "  (no process waiting on IO)")?;
        }
        for process in &snapshot.waiting {
            writeln!(self.out, "  - {}", self.process_line(process))?;
        }
        writeln!(self.out)?;

        let terminated = &snapshot.terminated;
        writeln!(self.out, "TERMINATED ({}):", terminated.len())?;
        if terminated.is_empty() {
            writeln!(self.out, "  (none yet)")?;
        }
        let tail = &terminated[terminated.len().saturating_sub(TERMINATED_TAIL)..];
        for process in tail {
            writeln!(self.out, "  ✓ {}", self.process_line(process))?;
        }
        if terminated.len() > TERMINATED_TAIL {
            writeln!(self.out, "  ...")?;
        }
        writeln!(self.out, "{RULE}")?;
        self.out.flush()
    }

    fn process_line(&self, process: &Process) -> String {
        let profile = process.profile();
        format!(
            "PID={:3} {:<3} CPU {:3}/{:<3} IO {:3}/{:<3}{}",
            process.pid(),
            if profile.io_bound { "IO" } else { "CPU" },
            process.cpu_done(),
            profile.total_cpu,
            process.io_done(),
            profile.total_io,
            self.bar(process.cpu_done(), profile.total_cpu)
        )
    }

    fn bar(&self, done: u32, total: u32) -> String {
        if !self.progress_bars || total == 0 {
            return String::new();
        }
        let ratio = f64::from(done) / f64::from(total);
        let filled = ((ratio * self.bar_width as f64).round() as usize).min(self.bar_width);
        format!(" [{}{}]", "#".repeat(filled), "-".repeat(self.bar_width - filled))
    }
}

impl<W: Write> TickObserver for ConsoleView<W> {
    fn observe(&mut self, snapshot: &TickSnapshot) {
        if self.failed {
            return;
        }
        if let Err(err) = self.render(snapshot) {
            warn!(error = %err, "console view disabled");
            self.failed = true;
        }
    }
}
