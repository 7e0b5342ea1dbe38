//! Dog Derby - Race simulation core with a Tauri backend
//!
//! The simulation lives in `game_server` and has no host dependencies.
//! With the `desktop` feature the crate also builds the Tauri app that
//! exposes it to the web frontend.

pub mod error;
pub mod game_server;

pub use error::{RaceError, RaceResult};

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Mutex;

    use tauri::State;

    use crate::game_server::betting::{BettingState, RaceHistoryEntry};
    use crate::game_server::racer::{Racer, RacerId, ROSTER};
    use crate::game_server::simulation::{GameServer, ServerStats};
    use crate::game_server::{GameStatus, PlayerAction, RaceConfig, RaceSnapshot};

    fn parse_racer(racer_id: &str) -> Result<RacerId, String> {
        racer_id.parse::<RacerId>().map_err(|e| e.to_string())
    }

    /// Static dog roster for the lanes
    #[tauri::command]
    fn get_roster() -> Vec<Racer> {
        ROSTER.to_vec()
    }

    /// Replace the race configuration (JSON, partial allowed)
    #[tauri::command]
    fn configure_race(
        server: State<'_, Mutex<GameServer>>,
        seed: Option<u64>,
        config_json: Option<String>,
    ) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;

        let mut config = match config_json {
            Some(json) => RaceConfig::from_json(&json).map_err(|e| e.to_string())?,
            None => RaceConfig::default(),
        };
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }

        server.configure(config).map_err(|e| e.to_string())?;
        log::info!("Race configured (seed: {:?})", seed);
        Ok(())
    }

    /// Start the race countdown
    #[tauri::command]
    fn start_race(server: State<'_, Mutex<GameServer>>) -> Result<bool, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.start_race())
    }

    /// Perform a simulation tick and return the published state
    #[tauri::command]
    fn tick(server: State<'_, Mutex<GameServer>>) -> Result<RaceSnapshot, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.tick())
    }

    /// Get the published snapshot without advancing simulation
    #[tauri::command]
    fn get_snapshot(server: State<'_, Mutex<GameServer>>) -> Result<RaceSnapshot, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_snapshot())
    }

    #[tauri::command]
    fn feed_treat(server: State<'_, Mutex<GameServer>>, racer_id: String) -> Result<bool, String> {
        let id = parse_racer(&racer_id)?;
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.feed_treat(id))
    }

    #[tauri::command]
    fn activate_cheetah(server: State<'_, Mutex<GameServer>>, racer_id: String) -> Result<bool, String> {
        let id = parse_racer(&racer_id)?;
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.activate_cheetah(id))
    }

    /// Keyboard shortcut: `1`-`5`, with `modifier` for cheetah mode
    #[tauri::command]
    fn handle_key(
        server: State<'_, Mutex<GameServer>>,
        key: char,
        modifier: bool,
    ) -> Result<Option<PlayerAction>, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.handle_key(key, modifier))
    }

    #[tauri::command]
    fn place_bet(server: State<'_, Mutex<GameServer>>, racer_id: String, amount: u32) -> Result<BettingState, String> {
        let id = parse_racer(&racer_id)?;
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.place_bet(id, amount).map_err(|e| e.to_string())?;
        Ok(server.get_betting())
    }

    #[tauri::command]
    fn cancel_bet(server: State<'_, Mutex<GameServer>>) -> Result<BettingState, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.cancel_bet();
        Ok(server.get_betting())
    }

    #[tauri::command]
    fn get_betting(server: State<'_, Mutex<GameServer>>) -> Result<BettingState, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_betting())
    }

    /// Finished races, newest first
    #[tauri::command]
    fn get_history(server: State<'_, Mutex<GameServer>>) -> Result<Vec<RaceHistoryEntry>, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_history())
    }

    /// Get server statistics
    #[tauri::command]
    fn get_stats(server: State<'_, Mutex<GameServer>>) -> Result<ServerStats, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_stats())
    }

    #[tauri::command]
    fn get_game_status(server: State<'_, Mutex<GameServer>>) -> Result<GameStatus, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_status())
    }

    /// Pause the simulation
    #[tauri::command]
    fn pause_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.pause();
        log::info!("Race paused");
        Ok(())
    }

    /// Resume the simulation
    #[tauri::command]
    fn resume_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.resume();
        log::info!("Race resumed");
        Ok(())
    }

    /// Back to the ready screen
    #[tauri::command]
    fn reset_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.reset();
        Ok(())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        tauri::Builder::default()
            .manage(Mutex::new(GameServer::new()))
            .setup(|app| {
                if cfg!(debug_assertions) {
                    app.handle().plugin(
                        tauri_plugin_log::Builder::default()
                            .level(log::LevelFilter::Info)
                            .build(),
                    )?;
                }
                log::info!("Dog Derby game server initialized");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                get_roster,
                configure_race,
                start_race,
                tick,
                get_snapshot,
                feed_treat,
                activate_cheetah,
                handle_key,
                place_bet,
                cancel_bet,
                get_betting,
                get_history,
                get_stats,
                get_game_status,
                pause_race,
                resume_race,
                reset_race,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
