//! Login session commands.

use shopfront_client::{AuthError, ClientState};

#[allow(clippy::print_stdout)]
pub async fn send_otp(state: &ClientState, phone_number: &str) -> Result<(), AuthError> {
    state.auth().send_otp(phone_number).await?;
    println!("OTP sent to {phone_number}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn login(state: &ClientState, phone_number: &str, otp: &str) -> Result<(), AuthError> {
    let user = state.auth().login(phone_number, otp).await?;
    println!("Login successful");
    if let Some(name) = user.get("name").and_then(|name| name.as_str()) {
        println!("Signed in as {name}");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(state: &ClientState) -> Result<(), AuthError> {
    state.auth().logout()?;
    println!("Logged out");
    Ok(())
}

/// Verify the stored token; an invalid one is removed.
#[allow(clippy::print_stdout)]
pub async fn status(state: &ClientState) -> Result<(), AuthError> {
    let mut session = state.auth();
    if !session.is_authenticated() {
        println!("Not signed in");
        return Ok(());
    }

    match session.verify().await? {
        Some(user) => {
            println!("Signed in");
            println!("{}", serde_json::to_string_pretty(&user).unwrap_or_default());
        }
        None => println!("Session is no longer valid; log in again"),
    }
    Ok(())
}
