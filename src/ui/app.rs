//! Main TUI application state and logic

use crate::host::CapturedOutput;
use crate::interpreter::driver::Driver;
use crate::interpreter::engine::{Status, Step, VmState};
use crate::interpreter::errors::{RuntimeError, StructuralError};
use crate::ui::editor::SourceEditor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

/// Half period of the input prompt blink
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Delay between instructions in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(50);

/// Instructions executed per frame while running, so keys are still read
/// between slices of a long or endless program
pub const RUN_SLICE: usize = 20_000;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Input,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> input -> output)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Input,
            FocusedPane::Input => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Input => FocusedPane::Source,
            FocusedPane::Output => FocusedPane::Input,
        }
    }
}

/// The main application state
pub struct App {
    /// The program text, editable in the program pane
    pub editor: SourceEditor,

    /// VM and type-ahead queue; `None` when the program failed validation
    pub driver: Option<Driver<CapturedOutput>>,

    /// Why the program could not be loaded
    pub structural_error: Option<StructuralError>,

    /// Fatal error from the current run
    pub runtime_error: Option<RuntimeError>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Run to the next suspension as soon as input arrives (after F5)
    pub auto_run: bool,

    /// Executing in slices of [`RUN_SLICE`] instructions per frame
    pub running: bool,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Blink phase of the input prompt
    pub prompt_visible: bool,
    pub last_blink: Instant,
}

impl App {
    /// Create a new app for `source_code`, with `initial_input` already typed
    pub fn new(source_code: String, initial_input: &[u8]) -> Self {
        let mut app = App {
            editor: SourceEditor::new(source_code),
            driver: None,
            structural_error: None,
            runtime_error: None,
            focused_pane: FocusedPane::Input,
            source_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready! Press F5 to run"),
            auto_run: false,
            running: false,
            is_playing: false,
            last_play_time: Instant::now(),
            prompt_visible: true,
            last_blink: Instant::now(),
        };
        app.load(initial_input);
        app
    }

    /// Build a fresh VM from the editor text, queueing `carry` as type-ahead input
    fn load(&mut self, carry: &[u8]) {
        self.runtime_error = None;
        self.output_scroll = 0;
        self.is_playing = false;
        self.running = false;
        self.editor.mark_loaded();

        match Driver::new(self.editor.text(), CapturedOutput::new()) {
            Ok(mut driver) => {
                driver.feed(carry);
                self.driver = Some(driver);
                self.structural_error = None;
            }
            Err(e) => {
                info!("program rejected: {}", e);
                self.driver = None;
                self.structural_error = Some(e);
                self.status_message = format!("Structural error: {}", e);
            }
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.tick_blink();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.running {
                self.run_slice(RUN_SLICE);
            } else if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                self.step_once();
                self.last_play_time = Instant::now();
            }

            // Don't wait for keys while a run has work left
            let timeout = if self.running {
                Duration::ZERO
            } else {
                Duration::from_millis(50)
            };
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn vm_state(&self) -> Option<VmState> {
        self.driver.as_ref().map(|d| d.vm().state())
    }

    fn is_waiting(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|d| d.vm().host().is_waiting())
    }

    fn tick_blink(&mut self) {
        if !self.is_waiting() {
            self.prompt_visible = true;
            self.last_blink = Instant::now();
            return;
        }
        if self.last_blink.elapsed() >= BLINK_INTERVAL {
            self.prompt_visible = !self.prompt_visible;
            self.last_blink = Instant::now();
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Program (top) | Input line | Output (bottom)
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(60),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(main_chunks[0]);

        let state = self.vm_state();
        let source_focused = self.focused_pane == FocusedPane::Source;

        // Positions from the VM only make sense for the text it was built from
        let stale = self.editor.is_modified();
        let markers = super::panes::SourceMarkers {
            pc: if stale {
                None
            } else {
                self.driver
                    .as_ref()
                    .map(|d| d.vm().program_counter())
                    .or_else(|| self.runtime_error.and_then(|e| e.pc()))
            },
            error: if stale {
                None
            } else {
                self.structural_error.map(|e| e.position())
            },
            awaiting_input: state == Some(VmState::AwaitingInput),
            cursor: source_focused.then(|| self.editor.cursor()),
        };

        super::panes::render_source_pane(
            frame,
            rows[0],
            self.editor.text(),
            markers,
            source_focused,
            &mut self.source_scroll,
        );

        let empty = VecDeque::new();
        let pending = self.driver.as_ref().map_or(&empty, |d| d.pending());
        super::panes::render_input_pane(
            frame,
            rows[1],
            pending,
            state == Some(VmState::AwaitingInput),
            self.prompt_visible,
            self.focused_pane == FocusedPane::Input,
        );

        let empty_output = CapturedOutput::new();
        let output = self
            .driver
            .as_ref()
            .map_or(&empty_output, |d| d.vm().host());
        super::panes::render_terminal_pane(
            frame,
            rows[2],
            output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let (program_counter, program_len, data_pointer, executed) = match &self.driver {
            Some(d) => (
                d.vm().program_counter(),
                d.vm().program_len(),
                d.vm().data_pointer(),
                d.vm().instructions_executed(),
            ),
            None => (0, 0, 0, 0),
        };

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            super::panes::StatusRenderData {
                message: &self.status_message,
                state,
                program_counter,
                program_len,
                data_pointer,
                executed,
                is_running: self.running,
                is_playing: self.is_playing,
                has_error: self.structural_error.is_some() || self.runtime_error.is_some(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::F(5) => self.run_program(),
            KeyCode::Char('r') if ctrl => self.run_program(),
            KeyCode::F(6) => {
                self.auto_run = false;
                self.running = false;
                self.is_playing = false;
                self.step_once();
            }
            KeyCode::F(7) => self.toggle_play(),
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            _ => match self.focused_pane {
                FocusedPane::Source => self.handle_edit_key(key, ctrl),
                FocusedPane::Input => self.handle_input_key(key, ctrl),
                FocusedPane::Output => match key.code {
                    KeyCode::Up => {
                        self.output_scroll = self.output_scroll.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        self.output_scroll = self.output_scroll.saturating_add(1);
                    }
                    _ => {}
                },
            },
        }
    }

    /// Keys typed into the program pane edit the program text
    fn handle_edit_key(&mut self, key: KeyEvent, ctrl: bool) {
        let edited = match key.code {
            KeyCode::Char(c) if !ctrl => {
                self.editor.insert(c);
                true
            }
            KeyCode::Enter => {
                self.editor.insert('\n');
                true
            }
            KeyCode::Backspace => {
                self.editor.delete_backward();
                true
            }
            KeyCode::Delete => {
                self.editor.delete_forward();
                true
            }
            KeyCode::Left => {
                self.editor.move_left();
                false
            }
            KeyCode::Right => {
                self.editor.move_right();
                false
            }
            KeyCode::Up => {
                self.editor.move_up();
                false
            }
            KeyCode::Down => {
                self.editor.move_down();
                false
            }
            KeyCode::Home => {
                self.editor.move_home();
                false
            }
            KeyCode::End => {
                self.editor.move_end();
                false
            }
            _ => false,
        };

        if edited && self.editor.is_modified() {
            self.status_message = "Program edited, press F5 to run it".to_string();
        }
    }

    /// Keys typed into the input line go to the program
    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Backspace => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.retract();
                }
            }
            KeyCode::Enter => self.input_byte(b'\n'),
            KeyCode::Char(c) if !ctrl => match u8::try_from(u32::from(c)) {
                Ok(byte) => self.input_byte(byte),
                Err(_) => {
                    self.status_message = format!("'{}' does not fit in a single cell", c);
                }
            },
            _ => {}
        }
    }

    /// Start the program from the beginning; it runs in slices from the event loop
    fn run_program(&mut self) {
        let started = self
            .vm_state()
            .is_some_and(|state| state != VmState::Ready);
        if started || self.driver.is_none() || self.editor.is_modified() {
            let carry: Vec<u8> = self
                .driver
                .as_ref()
                .map(|d| d.pending().iter().copied().collect())
                .unwrap_or_default();
            self.load(&carry);
        }

        self.auto_run = true;
        self.is_playing = false;
        if self.driver.is_some() {
            self.running = true;
            self.status_message = "Running...".to_string();
        }
    }

    /// Execute up to `budget` instructions, stopping at halt, input or error
    fn run_slice(&mut self, budget: usize) {
        for _ in 0..budget {
            let Some(driver) = self.driver.as_mut() else {
                self.running = false;
                return;
            };
            match driver.step() {
                Ok(Step::Continue) => {}
                Ok(Step::AwaitingInput) => {
                    self.running = false;
                    self.report(Ok(Status::AwaitingInput));
                    return;
                }
                Ok(Step::Halted) => {
                    self.running = false;
                    self.report(Ok(Status::Halted));
                    return;
                }
                Err(e) => {
                    self.fail(e);
                    return;
                }
            }
        }
        self.output_scroll = usize::MAX;
    }

    /// Execute one instruction, as F6 or an auto-play tick
    fn step_once(&mut self) {
        let Some(driver) = self.driver.as_mut() else {
            self.is_playing = false;
            return;
        };

        match driver.step() {
            Ok(Step::Continue) => {
                self.status_message = format!("Stepped to {}", driver.vm().program_counter());
                self.output_scroll = usize::MAX;
            }
            Ok(Step::AwaitingInput) => {
                self.status_message = "Waiting for input...".to_string();
            }
            Ok(Step::Halted) => {
                self.is_playing = false;
                self.status_message = "Program finished".to_string();
                self.output_scroll = usize::MAX;
            }
            Err(e) => self.fail(e),
        }
    }

    fn toggle_play(&mut self) {
        if self.vm_state() == Some(VmState::Halted) || self.runtime_error.is_some() {
            self.status_message = "Nothing left to play, press F5 to restart".to_string();
            return;
        }
        self.auto_run = false;
        self.running = false;
        self.is_playing = !self.is_playing;
        self.status_message = if self.is_playing {
            "Playing...".to_string()
        } else {
            "Paused".to_string()
        };
    }

    /// Queue a typed byte; after F5 a waiting program picks it up right away
    fn input_byte(&mut self, byte: u8) {
        let Some(driver) = self.driver.as_mut() else {
            self.status_message = "The program did not load; fix it and press F5".to_string();
            return;
        };

        driver.feed(&[byte]);
        if self.auto_run && driver.vm().state() == VmState::AwaitingInput {
            self.running = true;
            self.status_message = "Running...".to_string();
        }
    }

    fn report(&mut self, result: Result<Status, RuntimeError>) {
        match result {
            Ok(Status::Halted) => {
                self.status_message = "Program finished".to_string();
            }
            Ok(Status::AwaitingInput) => {
                self.status_message = "Waiting for input...".to_string();
            }
            Err(e) => self.fail(e),
        }
        self.output_scroll = usize::MAX;
    }

    fn fail(&mut self, error: RuntimeError) {
        info!("run failed: {}", error);
        self.is_playing = false;
        self.running = false;
        self.auto_run = false;
        self.runtime_error = Some(error);
        self.status_message = format!("Runtime error: {}", error);
    }
}
