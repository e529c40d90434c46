use std::path::Path;

use crate::config;
use crate::error::Result;

pub fn handle_config(path: &Path, init: bool) -> Result<()> {
    if !init {
        println!("{}", path.display());
        if !path.exists() {
            println!();
            println!("No config file yet. Create one with: cpc config --init");
        }
        return Ok(());
    }

    if config::init_config(path)? {
        println!("Wrote config template to {}", path.display());
        println!("Open the file and set up your credentials.");
    } else {
        println!("Config already exists at {}", path.display());
    }

    // Catch a broken existing file early.
    config::load_config(path)?;
    Ok(())
}
