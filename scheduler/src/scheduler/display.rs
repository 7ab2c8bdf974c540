use super::{runner::RunnerEvent, Process, TickSnapshot};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

const TICK_RATE: Duration = Duration::from_millis(200);
const TERMINATED_ROWS: usize = 5;
const TABLE_WIDTHS: [Constraint; 4] = [
    Constraint::Length(5),
    Constraint::Length(4),
    Constraint::Length(9),
    Constraint::Length(9),
];

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new() -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        // Set up the input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = TICK_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= TICK_RATE {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        // Set up the terminal-user-interface
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw(&mut self, snapshot: &TickSnapshot, status: &str) -> io::Result<()> {
        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(6),
                    Constraint::Length(TERMINATED_ROWS as u16 + 3),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let running = Paragraph::new(match &snapshot.running {
                Some(process) => format!("t={} | {}", snapshot.clock, process),
                None => format!("t={} | CPU idle", snapshot.clock),
            })
            .style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Running | {}", snapshot.policy_name))
                    .border_type(BorderType::Rounded),
            );
            f.render_widget(running, chunks[0]);

            let queues = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);

            let ready = process_table(
                snapshot.ready.iter(),
                format!("Ready ({})", snapshot.ready.len()),
                Color::LightGreen,
            );
            f.render_widget(ready, queues[0]);

            let waiting = process_table(
                snapshot.waiting.iter(),
                format!("Waiting ({})", snapshot.waiting.len()),
                Color::LightYellow,
            );
            f.render_widget(waiting, queues[1]);

            let terminated = &snapshot.terminated;
            let tail = &terminated[terminated.len().saturating_sub(TERMINATED_ROWS)..];
            let terminated = process_table(
                tail.iter().rev(),
                format!("Terminated ({})", terminated.len()),
                Color::Gray,
            );
            f.render_widget(terminated, chunks[2]);

            let controls = Paragraph::new(status.to_owned()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("[Enter/s] step | <N> Enter advance N | [a] auto | [p] pause | [q] quit"),
            );
            f.render_widget(controls, chunks[3]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // Get the user's input and return a matching event
        let Ok(event) = self.input_rx.recv() else {
            return RunnerEvent::Quit;
        };

        match event {
            DisplayEvent::Input(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    return RunnerEvent::Quit;
                }
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    match key.code {
                        KeyCode::Char('q') => return RunnerEvent::Quit,
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('a') | KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        KeyCode::Enter => return RunnerEvent::Advance,
                        KeyCode::Backspace => return RunnerEvent::Backspace,
                        KeyCode::Char(c) if c.is_ascii_digit() => return RunnerEvent::Digit(c),
                        _ => {}
                    };
                }
            }
            DisplayEvent::Tick => return RunnerEvent::Tick,
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn process_table<'a>(
    processes: impl Iterator<Item = &'a Process>,
    title: String,
    color: Color,
) -> Table<'a> {
    let rows = processes.map(|process| {
        let profile = process.profile();
        Row::new(vec![
            Cell::from(process.pid().to_string())
                .style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(if profile.io_bound { "IO" } else { "CPU" }),
            Cell::from(format!("{}/{}", process.cpu_done(), profile.total_cpu)),
            Cell::from(format!("{}/{}", process.io_done(), profile.total_io)),
        ])
    });

    Table::new(rows.collect::<Vec<_>>())
        .header(
            Row::new(vec!["PID", "Kind", "CPU", "IO"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .widths(&TABLE_WIDTHS)
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(color))
        .column_spacing(1)
}
