use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Command {
    None,
    Quit,
    /// Run `service.load_centers`(...) for the selected region
    LoadCenters,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Command {
    use KeyCode::{Char, Down, Enter, Esc, Left, Right, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Command::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Command::Quit;
    }

    let mut command = Command::None;

    match app.screen {
        Screen::RegionSelect => match key.code {
            Up | Char('k') => {
                app.region_list_index = app.region_list_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.region_list_index + 1 < app.regions.len() {
                    app.region_list_index += 1;
                }
            }
            Enter | Right | Char(' ') => {
                if app.select_current_region().is_some() {
                    command = Command::LoadCenters;
                }
            }
            _ => {}
        },

        Screen::CenterList => match key.code {
            Up | Char('k') => {
                app.center_list_index = app.center_list_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.center_list_index + 1 < app.state.recycling_centers().len() {
                    app.center_list_index += 1;
                }
            }
            Enter | Right => app.open_current_center(),
            Char('o') => app.cycle_open_filter(),
            Char('d') => app.cycle_distance_filter(),
            Char('r') => app.refresh_clock(true),
            Left | Esc => {
                app.screen = Screen::RegionSelect;
                app.center_list_index = 0;
            }
            _ => {}
        },

        Screen::CenterDetail => match key.code {
            Left | Esc | Char('b') => app.close_center(),
            Char('r') => app.refresh_clock(true),
            _ => {}
        },
    }
    command
}
