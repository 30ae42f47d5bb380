use inquire::{Password, Text};
use serde::Serialize;

use super::credentials::{
    Credentials, delete_credentials, env_credentials, load_credentials, save_credentials,
};
use super::http_client::ApiClient;
use crate::auth::{normalize_email, validate_password};
use crate::server::dto::{SessionResponse, UserResponse};
use crate::types::{Author, Profile};

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    // Strip trailing API paths to avoid duplication when constructing request URLs
    let url = url
        .trim_end_matches("/api/v1")
        .trim_end_matches("/api")
        .trim_end_matches('/');

    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    // Default to http:// for localhost/127.0.0.1, https:// for others
    if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
        format!("http://{url}")
    } else {
        format!("https://{url}")
    }
}

fn prompt_server(server: Option<String>, non_interactive: bool) -> anyhow::Result<String> {
    let server = if let Some(s) = server {
        if s.trim().is_empty() {
            anyhow::bail!("Server URL cannot be empty");
        }
        s
    } else if non_interactive {
        anyhow::bail!("--server is required in non-interactive mode");
    } else {
        Text::new("Server URL:")
            .with_default("http://127.0.0.1:8080")
            .prompt()?
    };
    Ok(normalize_server_url(&server))
}

fn prompt_email(email: Option<String>, non_interactive: bool) -> anyhow::Result<String> {
    let email = if let Some(e) = email {
        e
    } else if non_interactive {
        anyhow::bail!("--email is required in non-interactive mode");
    } else {
        Text::new("Email:").prompt()?
    };
    Ok(normalize_email(&email)?)
}

fn prompt_password(
    password: Option<String>,
    non_interactive: bool,
    confirm: bool,
) -> anyhow::Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    if non_interactive {
        anyhow::bail!("--password is required in non-interactive mode");
    }
    let prompt = Password::new("Password:");
    let prompt = if confirm {
        prompt.with_custom_confirmation_message("Confirm password:")
    } else {
        prompt.without_confirmation()
    };
    Ok(prompt.prompt()?)
}

pub fn run_signup(
    server: Option<String>,
    email: Option<String>,
    password: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let server_url = prompt_server(server, non_interactive)?;
    let email = prompt_email(email, non_interactive)?;
    let password = prompt_password(password, non_interactive, true)?;
    validate_password(&password)?;

    let client = ApiClient::anonymous(&server_url)?;
    let user: UserResponse = client.post(
        "/auth/signup",
        &AuthRequest {
            email: &email,
            password: &password,
        },
    )?;

    println!();
    println!("Account created for {}.", user.email);
    println!("Run 'recipebox login' to sign in.");
    println!();

    Ok(())
}

pub fn run_login(
    server: Option<String>,
    email: Option<String>,
    password: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let server_url = prompt_server(server, non_interactive)?;
    let email = prompt_email(email, non_interactive)?;
    let password = prompt_password(password, non_interactive, false)?;

    let client = ApiClient::anonymous(&server_url)?;
    let session: SessionResponse = client.post(
        "/auth/login",
        &AuthRequest {
            email: &email,
            password: &password,
        },
    )?;

    save_credentials(&Credentials {
        server_url: server_url.clone(),
        token: session.token,
        email: Some(session.user.email),
    })?;

    println!();
    println!(
        "Logged in to {} as {}",
        server_url,
        Author::from(&session.profile).display_name()
    );
    println!();

    Ok(())
}

pub fn run_logout() -> anyhow::Result<()> {
    if env_credentials()?.is_some() {
        anyhow::bail!("Credentials come from the environment. Unset them to log out.");
    }

    // Best effort: the server may be gone, but local credentials still go.
    if let Ok(creds) = load_credentials() {
        let client = ApiClient::new(&creds)?;
        if let Err(e) = client.post_empty("/auth/logout") {
            tracing::warn!("Failed to end session on server: {e}");
        }
    }

    println!();
    if delete_credentials()? {
        println!("Logged out successfully.");
    } else {
        println!("No credentials found.");
    }
    println!();
    Ok(())
}

pub fn run_whoami() -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let user: UserResponse = client.get("/auth/user")?;
    let profile: Profile = client.get("/profile")?;

    println!();
    println!("{}", Author::from(&profile).display_name());
    println!("  email:    {}", user.email);
    if let Some(username) = &profile.username {
        println!("  username: {username}");
    }
    println!("  server:   {}", client.base_url());
    println!();

    Ok(())
}
