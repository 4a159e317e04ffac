use super::context::AppContext;
use super::utils::password_or_prompt;
use anyhow::Result;

pub async fn login(ctx: &AppContext, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    ctx.auth().login(username, &password).await?;
    println!("✅ Logged in as {}", username.trim());
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth().logout()?;
    println!("👋 Logged out");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    let me = ctx.auth().current_user().await?;
    let role = if me.is_admin { "admin" } else { "user" };
    println!("{} <{}> ({}, id {})", me.username, me.email, role, me.id);
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    let profile = ctx.auth().register(username, email, &password).await?;
    println!("✅ Registered {} (id {})", profile.username, profile.id);
    println!("⏳ An admin must approve the account before you can log in.");
    Ok(())
}
