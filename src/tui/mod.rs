pub mod action;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::logging;
use crate::store::Services;
use crate::submission::SubmissionPipeline;
use crate::upload::ImageFile;
use action::{Action, AppEvent};
use state::{AppState, InputMode};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    logging::init_file_logger(&config.data_dir()?, &config.log_level)?;
    let services = Services::open(&config)?;
    install_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, event_rx) = mpsc::channel(10);

    tokio::spawn(store_actor(services, action_rx, event_tx));

    let mut app_state = AppState::new(Duration::from_millis(config.search_debounce_ms));
    let _ = action_tx.send(Action::Refresh).await;
    let result = ui_loop(&mut terminal, &mut app_state, &action_tx, event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Gives the terminal back before the default hook prints, and keeps a copy in the log.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        log::error!("PANIC: {}", info);
        default_hook(info);
    }));
}

/// Owns the store; every mutation goes through here, one at a time.
async fn store_actor(
    services: Services,
    mut action_rx: mpsc::Receiver<Action>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    let pipeline = SubmissionPipeline::new(services.store.clone(), services.uploader.clone());

    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,

            Action::Refresh => {
                let _ = event_tx
                    .send(AppEvent::Status("Loading items...".to_string()))
                    .await;
                match services.store.list().await {
                    Ok(items) => {
                        let _ = event_tx.send(AppEvent::ItemsLoaded(items)).await;
                    }
                    Err(e) => {
                        log::error!("Loading items failed: {}", e);
                        let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                    }
                }
            }

            Action::Submit {
                mut form,
                image_path,
            } => {
                if let Some(path) = image_path {
                    match ImageFile::from_path(&path).await {
                        Ok(file) => form.image = Some(file),
                        Err(e) => {
                            let _ = event_tx
                                .send(AppEvent::SubmitFailed(format!("{}: {}", path, e)))
                                .await;
                            continue;
                        }
                    }
                }
                match pipeline.submit(&form).await {
                    Ok(item) => {
                        let _ = event_tx.send(AppEvent::Submitted(item)).await;
                    }
                    Err(e) => {
                        log::warn!("Submission failed: {}", e);
                        let _ = event_tx.send(AppEvent::SubmitFailed(e.to_string())).await;
                    }
                }
            }

            Action::SetStatus(id, status) => match services.store.update_status(&id, status).await {
                Ok(Some(item)) => {
                    let _ = event_tx.send(AppEvent::StatusChanged(item)).await;
                }
                Ok(None) => {
                    let _ = event_tx
                        .send(AppEvent::Error(format!("No item with id {}", id)))
                        .await;
                }
                Err(e) => {
                    let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                }
            },
        }
    }
}

async fn ui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app_state: &mut AppState,
    action_tx: &mpsc::Sender<Action>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| view::draw(f, app_state))?;

        while let Ok(event) = event_rx.try_recv() {
            match event {
                AppEvent::ItemsLoaded(items) => {
                    app_state.set_items(items);
                    app_state.message = app_state.listing().count_label;
                }
                AppEvent::Submitted(item) => app_state.submit_succeeded(item),
                AppEvent::SubmitFailed(msg) => app_state.submit_failed(msg),
                AppEvent::StatusChanged(item) => {
                    app_state.message = format!("'{}' marked {}", item.title, item.status.as_str());
                    app_state.replace_item(item);
                }
                AppEvent::Error(msg) => {
                    app_state.message = format!("Error: {}", msg);
                    app_state.loading = false;
                }
                AppEvent::Status(msg) => app_state.message = msg,
            }
        }

        app_state.tick(Instant::now());

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app_state.mode {
            InputMode::Searching => match key.code {
                KeyCode::Enter => app_state.finish_search(),
                KeyCode::Esc => app_state.cancel_search(),
                KeyCode::Char(c) => {
                    app_state.enter_char(c);
                    app_state.search_changed(Instant::now());
                }
                KeyCode::Backspace => {
                    app_state.delete_char();
                    app_state.search_changed(Instant::now());
                }
                KeyCode::Left => app_state.move_cursor_left(),
                KeyCode::Right => app_state.move_cursor_right(),
                _ => {}
            },

            InputMode::Reporting => match key.code {
                KeyCode::Esc => app_state.close_form(),
                KeyCode::Tab | KeyCode::Down => app_state.next_field(),
                KeyCode::BackTab | KeyCode::Up => app_state.previous_field(),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    submit(app_state, action_tx).await;
                }
                KeyCode::Enter => {
                    if app_state.is_last_field() {
                        submit(app_state, action_tx).await;
                    } else {
                        app_state.next_field();
                    }
                }
                KeyCode::Left
                    if matches!(
                        app_state.form_field,
                        state::FormField::Type | state::FormField::Category
                    ) =>
                {
                    app_state.cycle_choice(false)
                }
                KeyCode::Right
                    if matches!(
                        app_state.form_field,
                        state::FormField::Type | state::FormField::Category
                    ) =>
                {
                    app_state.cycle_choice(true)
                }
                KeyCode::Char(' ') if app_state.form_field == state::FormField::Type => {
                    app_state.cycle_choice(true)
                }
                KeyCode::Left => app_state.move_cursor_left(),
                KeyCode::Right => app_state.move_cursor_right(),
                KeyCode::Backspace => app_state.delete_char(),
                KeyCode::Char(c) if app_state.form_field != state::FormField::Type => {
                    app_state.enter_char(c)
                }
                _ => {}
            },

            InputMode::Normal => match key.code {
                KeyCode::Char('q') => {
                    let _ = action_tx.send(Action::Quit).await;
                    return Ok(());
                }
                KeyCode::Char('/') => app_state.start_search(),
                KeyCode::Char('a') => app_state.open_form(),
                KeyCode::Char('t') => app_state.cycle_type(),
                KeyCode::Char('c') => app_state.cycle_category(),
                KeyCode::Char('x') => app_state.reset_filters(),
                KeyCode::Char('g') => {
                    let _ = action_tx.send(Action::Refresh).await;
                }
                KeyCode::Char('m') => {
                    if let Err(e) = app_state.show_contact() {
                        app_state.message = format!("Error: {}", e);
                    }
                }
                KeyCode::Char('r') => {
                    if let Some(item) = app_state.selected_item() {
                        let id = item.id.clone();
                        let _ = action_tx
                            .send(Action::SetStatus(id, crate::model::ItemStatus::Resolved))
                            .await;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => app_state.next(),
                KeyCode::Up | KeyCode::Char('k') => app_state.previous(),
                KeyCode::PageDown => app_state.jump_forward(10),
                KeyCode::PageUp => app_state.jump_backward(10),
                _ => {}
            },
        }
    }
}

async fn submit(app_state: &mut AppState, action_tx: &mpsc::Sender<Action>) {
    if let Some((form, image_path)) = app_state.begin_submit() {
        let _ = action_tx.send(Action::Submit { form, image_path }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn panic_hook_hands_over_to_the_previous_hook() {
        static CHAINED: AtomicBool = AtomicBool::new(false);
        std::panic::set_hook(Box::new(|_| CHAINED.store(true, Ordering::SeqCst)));
        install_panic_hook();

        let caught = std::panic::catch_unwind(|| panic!("render failed"));
        // Back to the default hook for the rest of the suite.
        let _ = std::panic::take_hook();

        assert!(caught.is_err());
        assert!(CHAINED.load(Ordering::SeqCst));
    }
}
