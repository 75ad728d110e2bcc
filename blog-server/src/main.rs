use blog_axum::{AppState, blog_router};
use blog_core::hash_password;

mod server;

use crate::server::{PORT, cms_from_env, init_tracing, serve_http};

const USAGE: &str = "usage: blog-server [hash-password <password>]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => {}
        Some("hash-password") => {
            let password = args.next().ok_or(USAGE)?;
            println!("{}", hash_password(&password)?);
            return Ok(());
        }
        Some(_) => return Err(USAGE.into()),
    }

    init_tracing(env!("CARGO_CRATE_NAME"));

    let state = AppState::from_env(cms_from_env()?);
    let app = blog_router(state);

    serve_http(*PORT, app).await?;
    Ok(())
}
