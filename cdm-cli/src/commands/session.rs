//! Session command handler

use anyhow::Result;
use cdm_client::Session;
use colored::*;

/// Print the session obtained at login
pub fn print_session(session: &Session) -> Result<()> {
    println!("{} {}", "Session ID obtained:".bold(), session.id().cyan());
    Ok(())
}
