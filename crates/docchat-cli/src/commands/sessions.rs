use super::context::AppContext;
use super::utils::confirm;
use anyhow::{Result, bail};
use docchat_core::identifiers::SessionId;
use docchat_core::session::{MessageOrigin, SessionEngine};

/// Engine with a fresh directory and no selection or message log loaded.
async fn refreshed_engine(ctx: &AppContext) -> Result<SessionEngine> {
    let engine = ctx.session_engine();
    engine.refresh().await?;
    Ok(engine)
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let engine = refreshed_engine(ctx).await?;
    let sessions = engine.directory().await;
    if sessions.is_empty() {
        println!("No sessions yet. Create one with `docchat sessions create`.");
        return Ok(());
    }
    for session in sessions {
        println!(
            "{:>6}  {}  {}",
            session.id,
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.name
        );
    }
    Ok(())
}

pub async fn create(ctx: &AppContext, name: Option<&str>) -> Result<()> {
    let session = ctx.session_engine().create(name).await?;
    println!("✅ Created session {} '{}'", session.id, session.name);
    Ok(())
}

pub async fn rename(ctx: &AppContext, id: &str, name: &str) -> Result<()> {
    let engine = refreshed_engine(ctx).await?;
    let id = SessionId::from(id);
    engine.begin_edit(&id).await?;
    engine.rename(&id, name).await?;
    println!("✅ Renamed session {} to '{}'", id, name.trim());
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let engine = refreshed_engine(ctx).await?;
    let id = SessionId::from(id);
    engine.request_delete(&id).await?;

    let name = engine
        .directory()
        .await
        .into_iter()
        .find(|s| s.id == id)
        .map(|s| s.name)
        .unwrap_or_default();
    if !yes && !confirm(&format!("Delete session '{name}'?"))? {
        engine.cancel_delete().await;
        println!("Cancelled");
        return Ok(());
    }

    engine.confirm_delete().await?;
    println!("🗑️  Deleted session {}", id);
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let engine = refreshed_engine(ctx).await?;
    let id = SessionId::from(id);
    engine.select(&id).await?;
    let Some(detail) = engine.detail(&id).await else {
        bail!("messages of session {} could not be loaded", id);
    };

    println!("# {}", detail.session.name);
    for message in detail.messages {
        println!(
            "[{}] {}: {}",
            message.timestamp.format("%H:%M"),
            message.origin,
            message.text
        );
    }
    Ok(())
}

pub async fn send(ctx: &AppContext, session: Option<&str>, text: &str) -> Result<()> {
    let engine = ctx.session_engine();
    let id = match session {
        Some(id) => {
            engine.refresh().await?;
            let id = SessionId::from(id);
            engine.select(&id).await?;
            id
        }
        None => {
            engine.list().await?;
            match engine.selection().await.id() {
                Some(id) => id.clone(),
                None => engine.create(None).await?.id,
            }
        }
    };

    let message = engine.append(&id, text, MessageOrigin::User).await?;
    let name = engine
        .selected_session()
        .await
        .map(|s| s.name)
        .unwrap_or_default();
    println!("✅ Sent message {} to '{}'", message.id, name);
    Ok(())
}
