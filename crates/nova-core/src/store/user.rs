//! Profile and security settings

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{AppState, SecurityFlag};

pub fn update_user_name(state: &mut AppState, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Name is required".to_string()));
    }
    state.user.name = name.to_string();
    info!(name, "Profile updated");
    Ok(())
}

pub fn set_security(state: &mut AppState, flag: SecurityFlag, enabled: bool) -> Result<()> {
    match flag {
        SecurityFlag::Mfa => state.user.security.mfa_enabled = enabled,
        SecurityFlag::Biometric => state.user.security.biometric_enabled = enabled,
    }
    info!(?flag, enabled, "Security setting changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_state;

    #[test]
    fn test_update_user_name() {
        let mut state = sample_state();
        update_user_name(&mut state, " Decio ").unwrap();
        assert_eq!(state.user.name, "Decio");
        assert!(update_user_name(&mut state, "").is_err());
        assert_eq!(state.user.name, "Decio");
    }

    #[test]
    fn test_set_security() {
        let mut state = sample_state();
        set_security(&mut state, SecurityFlag::Mfa, true).unwrap();
        assert!(state.user.security.mfa_enabled);
        assert!(!state.user.security.biometric_enabled);
        set_security(&mut state, SecurityFlag::Mfa, false).unwrap();
        assert!(!state.user.security.mfa_enabled);
    }
}
