use inquire::Text;
use serde::Serialize;

use super::credentials::load_credentials;
use super::http_client::ApiClient;
use crate::types::{Author, Profile};

#[derive(Serialize)]
struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
}

fn print_profile(profile: &Profile) {
    println!();
    println!("{}", Author::from(profile).display_name());
    println!(
        "  username:  {}",
        profile.username.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  full name: {}",
        profile.full_name.as_deref().unwrap_or("(not set)")
    );
    if let Some(email) = &profile.email {
        println!("  email:     {email}");
    }
    println!();
}

pub fn run_profile_show() -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let profile: Profile = client.get("/profile")?;
    print_profile(&profile);
    Ok(())
}

pub fn run_profile_update(
    username: Option<String>,
    full_name: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let (username, full_name) = if username.is_some() || full_name.is_some() {
        (username, full_name)
    } else if non_interactive {
        anyhow::bail!("--username or --full-name is required in non-interactive mode");
    } else {
        let current: Profile = client.get("/profile")?;
        let username = Text::new("Username:")
            .with_default(current.username.as_deref().unwrap_or(""))
            .prompt()?;
        let full_name = Text::new("Full name:")
            .with_default(current.full_name.as_deref().unwrap_or(""))
            .prompt()?;
        (Some(username), Some(full_name))
    };

    let profile: Profile = client.patch(
        "/profile",
        &UpdateProfileRequest {
            username,
            full_name,
        },
    )?;

    println!();
    println!("Profile updated.");
    print_profile(&profile);
    Ok(())
}
