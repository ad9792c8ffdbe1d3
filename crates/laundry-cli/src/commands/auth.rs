//! `login`, `logout` and `whoami`.

use anyhow::{Result, anyhow};
use colored::Colorize;
use laundry_core::auth::Credentials;

use crate::context::AppContext;
use crate::prompt::read_password;

pub async fn login(ctx: &AppContext, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password("Password: ").ok_or_else(|| anyhow!("Login cancelled"))?,
    };

    match ctx.session.login(&Credentials::new(email, password)).await {
        Ok(profile) => {
            println!(
                "{}",
                format!("Signed in as {} <{}>", profile.name, profile.email).bright_green()
            );
            Ok(())
        }
        Err(e) => Err(anyhow!(e.user_message())),
    }
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout().await?;
    println!("{}", "Signed out.".bright_green());
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    ctx.require_login().await?;
    let session = ctx.session.session().await;
    if let Some(user) = session.user() {
        println!("{} <{}> ({})", user.name.bold(), user.email, user.role);
    }
    if let Some(issued_at) = &session.issued_at {
        println!("{}", format!("Signed in at {}", issued_at).bright_black());
    }
    Ok(())
}
