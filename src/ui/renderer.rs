use crate::ui::app_component::AppComponent;
use crate::ui::core::{AppContext, Component, EventHandler, EventType};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tokio::time::{Duration, Instant};

/// How often finished tasks are checked for slow requests
const SLOW_TASK_CHECK: Duration = Duration::from_secs(5);

/// Run the dashboard until the user quits
pub async fn run_app(context: AppContext) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_handler = EventHandler::new(context.config.sync.interval());
    let mut app = AppComponent::new(context);
    app.start();
    info!("Dashboard started on {}", app.current_view().route());

    let result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppComponent,
    event_handler: &mut EventHandler,
) -> anyhow::Result<()> {
    let mut needs_render = true;
    let mut last_slow_check = Instant::now();

    loop {
        if needs_render {
            terminal.draw(|f| app.render(f, f.area()))?;
            needs_render = false;
        }

        match event_handler.next_event().await? {
            event @ (EventType::Key(_) | EventType::Resize(_, _) | EventType::Refresh) => {
                app.handle_event(event);
                needs_render = true;
            }
            EventType::Tick => {
                // Only background results trigger a redraw on tick
                for action in app.process_background_actions() {
                    let action = app.update(action);
                    app.handle_app_action(action);
                    needs_render = true;
                }

                if last_slow_check.elapsed() >= SLOW_TASK_CHECK {
                    app.warn_slow_tasks();
                    last_slow_check = Instant::now();
                }
            }
            EventType::Other => {}
        }

        if app.should_quit() {
            break;
        }
    }

    info!("Dashboard closed");
    Ok(())
}
