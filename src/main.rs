use forum_client::guard::Access;
use forum_client::lifecycle::{setup_tracing, ClientConfig, ForumApp, LoadController};
use forum_client::model::Forum;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    let app = ForumApp::new(&config).map_err(|e| e.to_string())?;

    let mut args = std::env::args().skip(1);
    if let (Some(username), Some(password)) = (args.next(), args.next()) {
        let span = tracing::info_span!("login");
        async {
            info!(%username, "Logging in");
            app.auth
                .login(&username, &password)
                .await
                .map_err(|e| e.to_string())
        }
        .instrument(span)
        .await?;
    }

    if let Access::Deny { redirect_to } = app.guard.check_access() {
        info!(redirect_to, "Not logged in; pass a username and password");
        return Ok(());
    }

    let forums = app.forums.clone();
    let directory: LoadController<Vec<Forum>> = LoadController::new(move |_| {
        let forums = forums.clone();
        async move { forums.ensure_forums().await }
    });

    let span = tracing::info_span!("forum_directory");
    let loaded = async { directory.attach(()).await }.instrument(span).await;
    match loaded {
        Some(Ok(list)) => {
            for forum in &list {
                let posts = app
                    .forums
                    .forum_posts(forum.id)
                    .await
                    .map_err(|e| e.to_string())?;
                info!(forum_id = forum.id, title = %forum.title, posts = posts.len(), "Forum");
            }
        }
        Some(Err(e)) => warn!(code = e.code(), error = %e, "Could not load forums"),
        None => {}
    }

    info!(user = ?app.session.display_name(), "Done");
    Ok(())
}
