use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use console_shell::nav::SidebarState;
use console_shell::{AuthStatus, ConsoleSession, RouteResolution};

use crate::render;

/// Upper bound on waiting for the first approvals count before drawing the topbar.
const BADGE_WAIT: Duration = Duration::from_secs(3);

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Show the signed-in identity and its memberships
    Whoami,
    /// List scopes the identity may switch into
    Scopes,
    /// Make another scope active and reload the session in it
    SwitchScope {
        /// Scope id as listed by `scopes`
        id: String,
    },
    /// Show module permissions for the active scope
    Permissions,
    /// Render the topbar and sidebar as they appear on a page
    Nav {
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        collapsed: bool,
    },
    /// Resolve a path against the route table
    Route { path: String },
}

/// Run one command against `session`. Everything except `login` starts from
/// the stored session.
///
/// # Errors
/// Propagates API, storage and validation failures.
pub async fn execute(session: &ConsoleSession, command: Command) -> Result<String> {
    if !matches!(command, Command::Login { .. }) {
        let status = session.start().await;
        tracing::debug!(authenticated = (status == AuthStatus::Authenticated), "session restored");
    }

    match command {
        Command::Login { username, password } => login(session, &username, password).await,
        Command::Logout => {
            session.sign_out();
            Ok("Signed out".to_owned())
        }
        Command::Whoami => Ok(render::whoami(
            session.auth().status(),
            &session.access_context(),
        )),
        Command::Scopes => {
            require_session(session)?;
            Ok(render::scopes(&session.access_context()))
        }
        Command::SwitchScope { id } => switch_scope(session, id).await,
        Command::Permissions => {
            require_session(session)?;
            Ok(render::permissions(&session.auth().permissions()))
        }
        Command::Nav { path, collapsed } => nav(session, &path, collapsed).await,
        Command::Route { path } => Ok(render::resolution(&path, &session.navigate(&path))),
    }
}

fn require_session(session: &ConsoleSession) -> Result<()> {
    if session.auth().is_authenticated() {
        Ok(())
    } else {
        bail!("not signed in; run `login` first")
    }
}

async fn login(session: &ConsoleSession, username: &str, password: Option<String>) -> Result<String> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let status = session
        .sign_in(username, &password)
        .await
        .context("login failed")?;
    if status != AuthStatus::Authenticated {
        bail!("login did not produce a usable session");
    }
    Ok(render::whoami(status, &session.access_context()))
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        bail!("empty password");
    }
    Ok(password)
}

async fn switch_scope(session: &ConsoleSession, id: String) -> Result<String> {
    require_session(session)?;
    let switch = session.switch_scope(id)?;
    tracing::debug!(epoch = switch.epoch, "scope epoch advanced");
    if switch.reload_required {
        session.reload().await;
    }
    let ctx = session.access_context();
    let label = ctx
        .active_scope()
        .map_or_else(|| switch.scope_id.to_string(), console_security::AvailableScope::label);
    Ok(format!("Active scope: {label}"))
}

async fn nav(session: &ConsoleSession, path: &str, collapsed: bool) -> Result<String> {
    if let RouteResolution::Redirect { to, .. } = session.navigate(path)
        && to == console_shell::LOGIN_PATH
    {
        bail!("not signed in; run `login` first");
    }

    let pending = if session.auth().is_authenticated() {
        pending_approvals(session).await
    } else {
        None
    };

    let mut state = SidebarState::new();
    state.set_collapsed(collapsed);
    let sidebar = session.sidebar(&mut state, path);
    let topbar = session.topbar(path, pending);
    Ok([render::topbar(&topbar), render::sidebar(&sidebar)].join("\n\n"))
}

async fn pending_approvals(session: &ConsoleSession) -> Option<u32> {
    let badge = session.spawn_approvals_badge();
    let mut rx = badge.subscribe();
    let count = match tokio::time::timeout(BADGE_WAIT, rx.wait_for(Option::is_some)).await {
        Ok(Ok(count)) => *count,
        Ok(Err(_)) | Err(_) => None,
    };
    badge.shutdown().await;
    count
}
