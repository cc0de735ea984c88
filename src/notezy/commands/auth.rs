use super::helpers::require_identity;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ValidationError};
use crate::model::{Credential, UserProfile};
use crate::session::SessionProvider;
use crate::store::DocumentStore;
use crate::viewmodel::NoteSyncViewModel;

fn credential(email: &str, password: &str) -> Result<Credential> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials.into());
    }
    Ok(Credential::new(email, password))
}

pub fn register<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<CmdResult> {
    let credential = credential(email, password)?;
    vm.close();

    let id = vm.session().sign_up(&credential)?;
    let profile = UserProfile {
        id,
        email: credential.normalized_email(),
        name: name.filter(|n| !n.trim().is_empty()),
    };
    vm.store().put_profile(profile.clone())?;

    let message = CmdMessage::success(format!("Registered with {}", profile.email));
    Ok(CmdResult::default().with_profile(profile).with_message(message))
}

pub fn login<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    let credential = credential(email, password)?;
    vm.close();

    let id = vm.session().sign_in(&credential)?;
    let mut result = CmdResult::default().with_message(CmdMessage::success("Login successful"));
    if let Some(profile) = vm.store().profile(&id)? {
        result = result.with_profile(profile);
    }
    Ok(result)
}

pub fn logout<S: DocumentStore, P: SessionProvider>(
    vm: &mut NoteSyncViewModel<S, P>,
) -> Result<CmdResult> {
    vm.close();
    vm.session().sign_out()?;
    Ok(CmdResult::default().with_message(CmdMessage::success("Signed out")))
}

/// Greets the current user by profile name.
pub fn whoami<S: DocumentStore, P: SessionProvider>(
    vm: &NoteSyncViewModel<S, P>,
) -> Result<CmdResult> {
    let id = require_identity(vm.session().as_ref())?;
    match vm.store().profile(&id)? {
        Some(profile) => {
            let greeting = format!("Welcome {}!", profile.display_name());
            Ok(CmdResult::default()
                .with_profile(profile)
                .with_message(CmdMessage::info(greeting)))
        }
        None => Ok(CmdResult::default().with_message(CmdMessage::info("Welcome to NOTEZY!"))),
    }
}
