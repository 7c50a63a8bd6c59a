use anyhow::Result;
use clap::Parser;
use console::{Term, style};
use log::{info, warn};
use media_housekeeping::cli::{Cli, dispatch};
use media_housekeeping::config::Config;
use media_housekeeping::init;
use media_housekeeping::menu::show_main_menu;
use media_housekeeping::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init::init();
    let shutdown_signal = setup_shutdown_signal()?;
    let mut config = Config::new()?;

    if let Some(command) = cli.command {
        return dispatch(command, config, &shutdown_signal);
    }

    let term = Term::stdout();
    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
