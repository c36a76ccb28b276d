use std::path::PathBuf;

use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use verdict_core::app::AppBuilder;
use verdict_core::domain::{
    CollectionOutcome, Failure, FieldErrors, Outcome, PaginatedOutcome, TypedOutcome,
};
use verdict_core::projection::{NamingPolicy, ProjectionOptions, Response};
use verdict_core::typed::{CancelSignal, Fault, Handler, Request};

#[derive(Parser, Debug)]
#[command(
    name = "verdict",
    version,
    about = "Dispatch sample requests and print the projected responses"
)]
struct Cli {
    /// TOML file with a [projection] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Key naming policy (camelCase, snake_case, PascalCase, kebab-case, as-is)
    #[arg(long)]
    naming: Option<NamingPolicy>,

    /// Emit successful object payloads without the {data} envelope
    #[arg(long)]
    bare: bool,
}

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u32,
    name: String,
    locked: bool,
}

fn users() -> Vec<User> {
    (1..=47)
        .map(|id| User {
            id,
            name: format!("user-{id}"),
            locked: id % 2 == 0,
        })
        .collect()
}

// --- requests -------------------------------------------------------------

struct GetUser {
    id: u32,
}

impl Request for GetUser {
    type Output = TypedOutcome<User>;
}

struct DeleteLockedUser {
    id: u32,
}

impl Request for DeleteLockedUser {
    type Output = Outcome;
}

struct ListUsers {
    page: u64,
    per_page: u64,
}

impl Request for ListUsers {
    type Output = PaginatedOutcome<User>;
}

struct SearchUsers {
    query: String,
}

impl Request for SearchUsers {
    type Output = CollectionOutcome<User>;
}

/// Never registered; dispatching it shows the missing-handler path.
struct ExportUsers;

impl Request for ExportUsers {
    type Output = Outcome;
}

// --- handlers -------------------------------------------------------------

struct GetUserHandler;

#[async_trait]
impl Handler<GetUser> for GetUserHandler {
    async fn handle(
        &self,
        req: GetUser,
        _cancel: CancelSignal,
    ) -> Result<TypedOutcome<User>, Fault> {
        match users().into_iter().find(|u| u.id == req.id) {
            Some(user) => Ok(TypedOutcome::ok(user)),
            None => Ok(Failure::not_found(format!("user {} does not exist", req.id)).into()),
        }
    }
}

struct DeleteUserHandler;

#[async_trait]
impl Handler<DeleteLockedUser> for DeleteUserHandler {
    async fn handle(&self, req: DeleteLockedUser, _cancel: CancelSignal) -> Result<Outcome, Fault> {
        let Some(user) = users().into_iter().find(|u| u.id == req.id) else {
            return Ok(Failure::not_found(format!("user {} does not exist", req.id)).into());
        };
        if user.locked {
            return Ok(Failure::business_rule_violated("user is locked").into());
        }
        Ok(Outcome::message_only(format!("user {} deleted", user.id)))
    }
}

struct ListUsersHandler;

#[async_trait]
impl Handler<ListUsers> for ListUsersHandler {
    async fn handle(
        &self,
        req: ListUsers,
        cancel: CancelSignal,
    ) -> Result<PaginatedOutcome<User>, Fault> {
        cancel.check()?;
        let all = users();
        let total = all.len() as u64;
        let pages = total.div_ceil(req.per_page);
        let skip = (req.page.saturating_sub(1) * req.per_page) as usize;
        let items = all
            .into_iter()
            .skip(skip)
            .take(req.per_page as usize)
            .collect();
        Ok(PaginatedOutcome::ok(items, total, pages))
    }
}

struct SearchUsersHandler;

#[async_trait]
impl Handler<SearchUsers> for SearchUsersHandler {
    async fn handle(
        &self,
        req: SearchUsers,
        _cancel: CancelSignal,
    ) -> Result<CollectionOutcome<User>, Fault> {
        if req.query.trim().is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("query".to_string(), vec!["must not be empty".to_string()]);
            return Ok(Failure::validation_failed(errors, None).into());
        }
        let found = users()
            .into_iter()
            .filter(|u| u.name.ends_with(&req.query))
            .collect();
        Ok(CollectionOutcome::ok(found))
    }
}

fn load_options(cli: &Cli) -> Result<ProjectionOptions, Box<dyn std::error::Error>> {
    let mut options = match &cli.config {
        Some(path) => ProjectionOptions::from_path(path)?,
        None => ProjectionOptions::default(),
    };
    if let Some(naming) = cli.naming {
        options.naming = naming;
    }
    if cli.bare {
        options.use_object_envelope = false;
    }
    Ok(options)
}

fn print_response(label: &str, response: &Response) -> Result<(), serde_json::Error> {
    println!(
        "{label}: {} {}",
        response.status().as_u16(),
        response.reason()
    );
    if let Some(body) = response.body() {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli)?;
    info!(
        naming = %options.naming,
        object_envelope = options.use_object_envelope,
        "projection options"
    );

    // (A) handler を登録し、必要な request が揃っているかを起動時に確認
    let app = AppBuilder::new()
        .register::<GetUser, _>(GetUserHandler)?
        .register::<DeleteLockedUser, _>(DeleteUserHandler)?
        .register::<ListUsers, _>(ListUsersHandler)?
        .register::<SearchUsers, _>(SearchUsersHandler)?
        .expect::<GetUser>()
        .expect::<DeleteLockedUser>()
        .expect::<ListUsers>()
        .expect::<SearchUsers>()
        .options(options)
        .build()?;

    // (B) dispatch → project
    print_response("GetUser{id:1}", &app.respond(GetUser { id: 1 }).await)?;
    print_response("GetUser{id:99}", &app.respond(GetUser { id: 99 }).await)?;
    print_response(
        "DeleteLockedUser{id:2}",
        &app.respond(DeleteLockedUser { id: 2 }).await,
    )?;
    print_response(
        "DeleteLockedUser{id:3}",
        &app.respond(DeleteLockedUser { id: 3 }).await,
    )?;
    print_response(
        "ListUsers{page:5}",
        &app.respond(ListUsers { page: 5, per_page: 10 }).await,
    )?;
    print_response(
        "SearchUsers{query:\"7\"}",
        &app.respond(SearchUsers {
            query: "7".to_string(),
        })
        .await,
    )?;
    print_response(
        "SearchUsers{query:\"\"}",
        &app.respond(SearchUsers {
            query: String::new(),
        })
        .await,
    )?;

    // (C) 未登録の request は dispatch 時に HandlerNotFound
    let err = app
        .dispatcher()
        .dispatch(ExportUsers)
        .await
        .err()
        .map(|e| e.to_string());
    println!("ExportUsers: {}", err.as_deref().unwrap_or("dispatched"));
    print_response("ExportUsers", &app.respond(ExportUsers).await)?;

    print_response("ServiceUnavailable", &Response::service_unavailable(None))?;
    Ok(())
}
