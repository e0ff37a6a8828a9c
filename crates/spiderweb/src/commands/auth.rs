//! Login / logout: session-token lifecycle.

use dialoguer::Input;
use secrecy::SecretString;

use spiderweb_core::{AuthCredentials, Controller};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;

/// Perform the login exchange and cache the issued token for the profile.
pub async fn login(global: &GlobalOpts, args: LoginArgs) -> Result<(), CliError> {
    let mut file = spiderweb_config::load_config_or_default();
    let profile_name = config::profile_name(global, &file);
    let mut profile = config::effective_profile(global, &file, &profile_name);

    if profile.backend.is_empty() {
        return Err(CliError::Config {
            message: "no backend URL -- pass --url (it will be saved to the profile)".into(),
        });
    }

    let username = match args.username.or_else(|| profile.username.clone()) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CliError::Other(format!("prompt failed: {e}")))?,
    };
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| CliError::Other(format!("prompt failed: {e}")))?;

    // Build the config, then force credential auth for the exchange --
    // any stale cached token must not short-circuit a fresh login.
    profile.token = None;
    profile.token_env = None;
    profile.username = Some(username.clone());
    profile.password = Some(password.clone());
    let mut backend =
        spiderweb_config::profile_to_backend_config(&profile, &profile_name, &file.defaults)?;
    backend.auth = AuthCredentials::Credentials {
        username: username.clone(),
        password: SecretString::from(password),
    };

    let token = Controller::login(backend)
        .await
        .map_err(|e| CliError::from_core(e, &profile_name))?;

    spiderweb_config::save_session_token(&profile_name, &token)?;

    // Remember the backend URL and username so the next invocation works
    // without flags. Secrets never land in the config file here.
    profile.password = None;
    profile.username = Some(username.clone());
    file.profiles.insert(profile_name.clone(), profile);
    spiderweb_config::save_config(&file)?;

    if !global.quiet {
        println!(
            "Logged in as {username}. Token cached at {}",
            spiderweb_config::token_path(&profile_name).display()
        );
    }
    Ok(())
}

/// Discard the cached session token (client-side logout, like clearing
/// the browser cookie).
pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let file = spiderweb_config::load_config_or_default();
    let profile_name = config::profile_name(global, &file);

    spiderweb_config::clear_session_token(&profile_name)?;
    if !global.quiet {
        println!("Logged out of profile '{profile_name}'.");
    }
    Ok(())
}
