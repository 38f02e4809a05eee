//! Profile and security command implementations

use anyhow::{anyhow, Context, Result};
use nova_core::models::SecurityFlag;
use nova_core::store::{set_security, update_user_name};
use nova_core::Store;

use super::parse_switch;

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn cmd_user_show(store: &Store) -> Result<()> {
    let user = &store.state().user;
    println!();
    println!("👤 {}", user.name);
    println!("   MFA:        {}", on_off(user.security.mfa_enabled));
    println!("   Biometric:  {}", on_off(user.security.biometric_enabled));
    Ok(())
}

pub fn cmd_user_name(store: &mut Store, name: &str) -> Result<()> {
    store
        .apply(|state| update_user_name(state, name))
        .context("Failed to update name")?;
    println!("✅ Name updated to {}", store.state().user.name);
    Ok(())
}

pub fn cmd_user_security(store: &mut Store, flag: &str, state: &str) -> Result<()> {
    let flag: SecurityFlag = flag.parse().map_err(|e: String| anyhow!(e))?;
    let enabled = parse_switch(state)?;

    store
        .apply(|s| set_security(s, flag, enabled))
        .context("Failed to update security settings")?;

    let label = match flag {
        SecurityFlag::Mfa => "MFA",
        SecurityFlag::Biometric => "Biometric login",
    };
    println!("🔒 {} turned {}", label, on_off(enabled));
    Ok(())
}
