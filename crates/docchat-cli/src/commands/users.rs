use super::context::AppContext;
use anyhow::Result;
use docchat_application::UserApprovalUseCase;
use docchat_core::identifiers::UserId;

pub async fn list(ctx: &AppContext) -> Result<()> {
    for user in ctx.approvals().list_users().await? {
        let status = match (user.is_admin, user.is_approved) {
            (true, _) => "admin",
            (false, true) => "approved",
            (false, false) => "pending",
        };
        println!("{:>6}  {:<9} {} <{}>", user.id, status, user.username, user.email);
    }
    Ok(())
}

/// Lists first so local checks see the current state.
async fn primed(ctx: &AppContext) -> Result<UserApprovalUseCase> {
    let approvals = ctx.approvals();
    approvals.list_users().await?;
    Ok(approvals)
}

pub async fn approve(ctx: &AppContext, id: &str) -> Result<()> {
    let user = primed(ctx).await?.approve(&UserId::from(id)).await?;
    println!("✅ Approved {}", user.username);
    Ok(())
}

pub async fn disapprove(ctx: &AppContext, id: &str) -> Result<()> {
    let user = primed(ctx).await?.disapprove(&UserId::from(id)).await?;
    println!("✅ Disapproved {}", user.username);
    Ok(())
}
