use super::context::AppContext;
use anyhow::{Context, Result};
use docchat_application::IndexOutcome;
use docchat_core::identifiers::DocumentId;
use std::path::Path;

pub async fn list(ctx: &AppContext) -> Result<()> {
    let documents = ctx.documents().list().await?;
    if documents.is_empty() {
        println!("No documents uploaded.");
    }
    for document in documents {
        println!(
            "{:>6}  {}  {}",
            document.id,
            document.uploaded_at.format("%Y-%m-%d %H:%M"),
            document.file_name
        );
    }
    Ok(())
}

pub async fn upload(ctx: &AppContext, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let receipt = ctx.documents().upload(file_name, bytes).await?;
    println!("✅ Uploaded {} (id {})", receipt.document.file_name, receipt.document.id);
    match receipt.index {
        IndexOutcome::Indexed => println!("🔎 Indexed for search"),
        IndexOutcome::Skipped => {}
        IndexOutcome::Failed(reason) => eprintln!("⚠️  Not indexed for search: {reason}"),
    }
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    let document = ctx.documents().delete(&DocumentId::from(id)).await?;
    println!("🗑️  Deleted {}", document.file_name);
    Ok(())
}

pub async fn query(ctx: &AppContext, query: &str, top_k: usize) -> Result<()> {
    let chunks = ctx.retrieval().query(query, top_k).await?;
    if chunks.is_empty() {
        println!("No matching passages.");
    }
    for (rank, chunk) in chunks.iter().enumerate() {
        println!("{}. {} (distance {:.3})", rank + 1, chunk.location(), chunk.distance);
        println!("   {}", chunk.text.replace('\n', " "));
    }
    Ok(())
}

pub async fn index_status(ctx: &AppContext) -> Result<()> {
    let health = ctx.retrieval().health().await?;
    println!(
        "{} {} on {}, {} chunks indexed",
        if health.is_healthy() { "✅" } else { "⚠️ " },
        health.status,
        health.device,
        health.chunks_indexed
    );
    Ok(())
}
