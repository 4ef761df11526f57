// src/handlers/auth.rs

use crate::{common::error::AppError, config::AppState, models::auth::LoginPayload};

pub async fn login(state: &mut AppState, email: String, password: String) -> Result<(), AppError> {
    let credentials = LoginPayload { email, password };
    state.session.login(&state.auth_api, &credentials).await?;

    // login() only succeeds with a user in place.
    if let Some(user) = state.session.current_user() {
        println!("Logged in as {} <{}>", user.username, user.email);
    }
    Ok(())
}

pub fn logout(state: &mut AppState) -> Result<(), AppError> {
    state.session.logout();
    println!("Logged out.");
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<(), AppError> {
    match state.session.current_user() {
        Some(user) => {
            println!("{} <{}>", user.username, user.email);
            if user.blocked {
                println!("warning: this account is blocked");
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
