//! Login / register / logout / profile commands.

use anyhow::Result;
use stagecast_client::{ProfileUpdate, RegisterRequest, User};

use super::{Runtime, print_json};
use crate::Output;

pub async fn login(rt: &Runtime, email: &str, password: &str) -> Result<()> {
    let user = rt.cache.login(email, password).await?;
    println!("Logged in as {}.", user.username);
    println!("Token saved to context \"{}\".", rt.context.name);
    Ok(())
}

pub async fn register(rt: &Runtime, req: &RegisterRequest) -> Result<()> {
    let user = rt.cache.register(req).await?;
    println!("Registered and logged in as {}.", user.username);
    Ok(())
}

pub async fn logout(rt: &Runtime) -> Result<()> {
    rt.cache.logout().await?;
    println!("Logged out from context \"{}\".", rt.context.name);
    Ok(())
}

pub async fn whoami(rt: &Runtime, out: Output) -> Result<()> {
    let user = rt.cache.load_own_profile().await.map_err(|e| {
        if e.is_unauthorized() {
            anyhow::anyhow!("{e}. Run `stagecast login`.")
        } else {
            e.into()
        }
    })?;
    print_user(&user, out)
}

pub async fn profile(rt: &Runtime, user_id: &str, out: Output) -> Result<()> {
    let user = rt.cache.load_profile(user_id).await?;
    print_user(&user, out)
}

pub async fn update_profile(rt: &Runtime, update: &ProfileUpdate, out: Output) -> Result<()> {
    let user = rt.cache.update_profile(update).await?;
    print_user(&user, out)
}

fn print_user(user: &User, out: Output) -> Result<()> {
    if out == Output::Json {
        return print_json(user);
    }
    println!("{} (@{})", user.display_name.as_deref().unwrap_or(&user.username), user.username);
    println!("  id:        {}", user.id);
    if let Some(bio) = &user.bio {
        println!("  bio:       {}", bio);
    }
    println!("  followers: {}", user.followers_count);
    println!("  following: {}", user.following_count);
    if let Some(following) = user.is_following {
        println!("  you follow: {}", if following { "yes" } else { "no" });
    }
    Ok(())
}
