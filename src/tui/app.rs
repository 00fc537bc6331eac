//! Application state and main loop for the terminal search box.
//!
//! The loop is the single owner of the [`SearchController`]: each iteration
//! drains finished timers and fetches, draws the current view, then feeds at
//! most one terminal event back in.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Stdout;

use super::event::{Event, EventHandler};
use super::ui::{self, Hit, ScreenLayout};
use crate::core::controller::{SearchController, SearchKey};
use crate::core::pointer::{PointerHub, PointerPress};

/// Poll interval; also bounds how long a finished fetch waits to be drawn.
const TICK_RATE_MS: u64 = 50;

pub struct App {
    pub should_quit: bool,
    controller: SearchController,
    /// Document-level click target shared with the controller
    pointer: PointerHub,
    layout: ScreenLayout,
}

impl App {
    pub fn new(mut controller: SearchController) -> Self {
        let pointer = PointerHub::new();
        controller.attach_pointer(&pointer);

        Self {
            should_quit: false,
            controller,
            pointer,
            layout: ScreenLayout::default(),
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> std::io::Result<()> {
        let event_handler = EventHandler::new(TICK_RATE_MS);

        while !self.should_quit {
            self.controller.drain_events();

            let view = self.controller.view();
            let mut layout = ScreenLayout::default();
            terminal.draw(|frame| ui::draw(frame, &view, &mut layout))?;
            self.controller.set_hit_regions(layout.hit_regions());
            self.layout = layout;

            match event_handler.next()? {
                Event::Key(key) => self.handle_key(key.code, key.modifiers),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(_, _) => {} // Redrawn next iteration
                Event::Tick => {}
            }
        }

        self.controller.teardown();
        Ok(())
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.controller.on_key_down(SearchKey::Escape);
            }
            KeyCode::Up => {
                self.controller.on_key_down(SearchKey::ArrowUp);
            }
            KeyCode::Down => {
                self.controller.on_key_down(SearchKey::ArrowDown);
            }
            KeyCode::Enter => {
                self.controller.on_key_down(SearchKey::Enter);
            }
            KeyCode::Tab => {
                if self.controller.is_list_open() {
                    self.controller.on_blur();
                } else {
                    self.controller.on_focus();
                }
            }
            KeyCode::Backspace => {
                let mut text = self.controller.session().query.clone();
                text.pop();
                self.controller.on_input_change(&text);
            }
            KeyCode::Char(c) => {
                let mut text = self.controller.session().query.clone();
                text.push(c);
                self.controller.on_input_change(&text);
            }
            _ => {}
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Outside presses reach the controller through its subscription
                self.pointer.dispatch(PointerPress {
                    column: mouse.column,
                    row: mouse.row,
                });

                match self.layout.hit_test(mouse.column, mouse.row) {
                    Some(Hit::Candidate(index)) => {
                        let candidate = self.controller.session().candidates.get(index).cloned();
                        if candidate.is_some() {
                            self.controller.on_commit(candidate);
                        }
                    }
                    Some(Hit::Recent(index)) => self.controller.select_recent(index),
                    Some(Hit::Input) => self.controller.on_focus(),
                    None => {}
                }
            }
            MouseEventKind::Moved => {
                if let Some(Hit::Candidate(index)) = self.layout.hit_test(mouse.column, mouse.row) {
                    self.controller.on_hover(index);
                }
            }
            _ => {}
        }
    }
}
