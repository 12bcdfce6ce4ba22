//! One-shot commands. Each drives the same controller a TUI screen uses,
//! executing its requests inline instead of through the worker.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context as _, Result};
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::runtime::Runtime;

use auction_admin::api::{ApiClient, Resource, StatsRange};
use auction_admin::config::{Config, ConfigStore};
use auction_admin::controller::{
    ConfirmPrompt, DashboardController, DetailAction, DetailController, FieldValue, ListBody,
    ListController, ProfileController, SignInController,
};
use auction_admin::session::{Session, SessionStore};
use auction_admin::ui::notice::{Notice, NoticeLevel};
use auction_admin::ui::pagination::PageSize;
use auction_admin::ui::route::Route;
use auction_admin::ui::worker::server_message;

const PASSWORD_ENV: &str = "AUCTION_ADMIN_PASSWORD";

pub struct Context {
    config: Config,
    config_path: PathBuf,
    sessions: SessionStore,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(Config::config_path);
        let mut config = Config::load_from(&config_path)?;
        if let Some(base_url) = base_url {
            config.api.base_url = base_url;
            config.validate()?;
        }
        let session_path = config
            .session
            .path
            .clone()
            .unwrap_or_else(SessionStore::default_path);
        Ok(Self {
            config,
            config_path,
            sessions: SessionStore::new(session_path),
        })
    }

    fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.config.api)?)
    }

    fn session(&self) -> Result<Session> {
        self.sessions
            .load()?
            .ok_or_else(|| anyhow!("not signed in, run `auction-admin login` first"))
    }
}

pub struct ListArgs {
    pub resource: Resource,
    pub page: u32,
    pub page_size: Option<u32>,
    pub keyword: Option<String>,
    pub filters: Vec<String>,
    pub json: bool,
}

fn runtime() -> Result<Runtime> {
    Runtime::new().context("failed to start async runtime")
}

/// Print success and info notices; turn errors into a failed command.
fn report(notice: Notice) -> Result<()> {
    match notice.level {
        NoticeLevel::Error => bail!(notice.text),
        NoticeLevel::Success | NoticeLevel::Info => {
            println!("{}", notice.text);
            Ok(())
        }
    }
}

fn ask(prompt: &ConfirmPrompt) -> Result<bool> {
    eprint!("{}: {} [y/N] ", prompt.title, prompt.message);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn tui(context: Context, route: Option<String>) -> Result<()> {
    let initial = route.as_deref().map(Route::parse);
    let store = ConfigStore::new(context.config, context.config_path);
    auction_admin::ui::run(store, context.sessions, initial)?;
    Ok(())
}

pub fn login(context: Context, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    let mut form = SignInController::new();
    form.set_email(email);
    form.set_password(password);
    let request = form.submit()?;

    let client = context.client()?;
    let result = runtime()?.block_on(client.login(&request.email, request.password.expose()));
    let session = form.on_result(result).map_err(|notice| anyhow!(notice.text))?;
    context.sessions.save(&session)?;
    println!("Signed in as {} <{}>", session.user.name, session.user.email);
    Ok(())
}

pub fn logout(context: Context) -> Result<()> {
    context.sessions.clear()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(context: Context) -> Result<()> {
    let session = context.session()?;
    let client = context.client()?;
    let mut profile = ProfileController::new(Some(session.credential()));
    let request = profile
        .poll_effect()
        .ok_or_else(|| anyhow!("no profile request issued"))?;
    let result = runtime()?.block_on(client.my_profile(&request.credential));
    if let Some(notice) = profile.on_result(request.generation, result) {
        report(notice)?;
    }

    let view = profile.view();
    let rows = view
        .rows
        .into_iter()
        .map(|row| vec![row.label.to_string(), field_text(row.value)])
        .collect();
    println!("{}", table(vec!["Field".into(), "Value".into()], rows));
    Ok(())
}

fn field_text(value: FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text,
        FieldValue::Skeleton => String::new(),
    }
}

pub fn list(context: Context, args: ListArgs) -> Result<()> {
    let session = context.session()?;
    let page_size = match args.page_size {
        Some(size) => PageSize::from_u32(size)
            .ok_or_else(|| anyhow!("page size must be one of 5, 10, 15 (got {})", size))?,
        None => context.config.default_page_size(),
    };

    let mut list = ListController::new(args.resource, page_size, Some(session.credential()));
    for filter in &args.filters {
        let (key, value) = filter
            .split_once('=')
            .ok_or_else(|| anyhow!("filter '{}' must look like key=value", filter))?;
        if !list.set_filter(key, value) {
            let known: Vec<String> = args
                .resource
                .filters()
                .iter()
                .map(|spec| {
                    let options: Vec<&str> = spec.options.iter().map(|(v, _)| *v).collect();
                    format!("{}={}", spec.key, options.join("|"))
                })
                .collect();
            bail!(
                "unknown filter '{}' for {} (known: {})",
                filter,
                args.resource,
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            );
        }
    }
    if let Some(keyword) = &args.keyword {
        keyword.chars().for_each(|c| list.type_search(c));
        list.submit_search();
    }
    list.set_page(args.page);

    let request = list
        .poll_effect()
        .ok_or_else(|| anyhow!("no list request issued"))?;
    let client = context.client()?;
    let result = runtime()?.block_on(client.list(&request.credential, request.resource, &request.query));
    if let Some(notice) = list.on_list_result(request.generation, result) {
        report(notice)?;
    }

    if args.json {
        let items = list
            .state()
            .ready()
            .map(|page| page.items.clone())
            .unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let view = list.view();
    match view.body {
        ListBody::Rows(rows) => {
            let mut headers = vec!["#".to_string(), "Id".to_string()];
            headers.extend(view.headers.iter().map(|h| h.to_string()));
            let rows = rows
                .into_iter()
                .map(|row| {
                    let mut cells = vec![row.number.to_string(), row.id.unwrap_or_default()];
                    cells.extend(row.cells);
                    cells
                })
                .collect();
            println!("{}", table(headers, rows));
            println!(
                "Page {} of {} ({} matching)",
                view.page,
                view.total_pages.max(1),
                view.badge.unwrap_or(0)
            );
        }
        ListBody::Error(message) => bail!(message),
        ListBody::Empty | ListBody::Skeleton(_) => {
            println!("No {} found.", view.title.to_lowercase());
        }
    }
    Ok(())
}

/// Fetch one entity into a fresh detail controller.
fn load_detail(
    context: &Context,
    runtime: &Runtime,
    resource: Resource,
    id: String,
) -> Result<(ApiClient, DetailController)> {
    let session = context.session()?;
    let client = context.client()?;
    let mut detail = DetailController::new(resource, id, Some(session.credential()));
    let request = detail
        .poll_effect()
        .ok_or_else(|| anyhow!("no detail request issued"))?;
    let result = runtime.block_on(client.get(&request.credential, request.resource, &request.id));
    if let Some(notice) = detail.on_result(request.generation, result) {
        report(notice)?;
    }
    Ok((client, detail))
}

pub fn show(context: Context, resource: Resource, id: String, json: bool) -> Result<()> {
    let runtime = runtime()?;
    let (_, detail) = load_detail(&context, &runtime, resource, id)?;

    if json {
        let entity = detail
            .state()
            .ready()
            .ok_or_else(|| anyhow!("{} not loaded", resource.singular()))?;
        println!("{}", serde_json::to_string_pretty(entity)?);
        return Ok(());
    }

    let view = detail.view();
    if let Some(error) = view.error {
        bail!(error);
    }
    println!("{}", view.title);
    for section in view.sections {
        println!("\n{}", section.title);
        let rows = section
            .rows
            .into_iter()
            .map(|row| vec![row.label.to_string(), field_text(row.value)])
            .collect();
        println!("{}", table(vec!["Field".into(), "Value".into()], rows));
    }
    for related in view.related {
        println!("\n{}", related.title);
        match related.rows {
            Some(rows) if !rows.is_empty() => {
                let headers = related.headers.iter().map(|h| h.to_string()).collect();
                println!("{}", table(headers, rows));
            }
            _ => println!("{}", related.empty),
        }
    }
    if !view.actions.is_empty() {
        let labels: Vec<&str> = view.actions.iter().map(|a| a.label).collect();
        println!("\nAvailable actions: {}", labels.join(", "));
    }
    Ok(())
}

pub fn delete(context: Context, resource: Resource, id: String, yes: bool) -> Result<()> {
    let session = context.session()?;
    let mut list = ListController::new(
        resource,
        context.config.default_page_size(),
        Some(session.credential()),
    );
    let prompt = list
        .request_delete(&id)
        .ok_or_else(|| anyhow!("{} cannot be deleted", resource.plural()))?;
    let accept = yes || ask(&prompt)?;
    let Some(request) = list.confirm_delete(accept) else {
        println!("Cancelled.");
        return Ok(());
    };

    let client = context.client()?;
    let result = runtime()?.block_on(client.delete(&request.credential, request.resource, &request.id));
    report(list.on_delete_result(result))
}

pub fn action(context: Context, action: DetailAction, id: String, yes: bool) -> Result<()> {
    let resource = match action {
        DetailAction::Unlock => Resource::User,
        DetailAction::Refund => Resource::Auction,
    };
    let runtime = runtime()?;
    let (client, mut detail) = load_detail(&context, &runtime, resource, id)?;

    let prompt = detail.request_action(action).ok_or_else(|| {
        anyhow!(
            "{} is not available for this {}",
            action.label(),
            resource.singular().to_lowercase()
        )
    })?;
    let accept = yes || ask(&prompt)?;
    let Some(request) = detail.confirm_action(accept) else {
        println!("Cancelled.");
        return Ok(());
    };

    let result = runtime.block_on(async {
        match request.action {
            DetailAction::Unlock => client.unlock_user(&request.credential, &request.id).await,
            DetailAction::Refund => client
                .refund_payment(&request.credential, &request.id)
                .await
                .map(|body| server_message(&body)),
        }
    });
    report(detail.on_action_result(action, result))
}

pub fn stats(context: Context, range: String) -> Result<()> {
    let range = StatsRange::parse(&range).ok_or_else(|| {
        let known: Vec<&str> = StatsRange::all().iter().map(StatsRange::as_str).collect();
        anyhow!("unknown range '{}' (expected one of: {})", range, known.join(", "))
    })?;
    let session = context.session()?;
    let mut dashboard = DashboardController::new(Some(session.credential()));
    dashboard.set_range(range);
    let request = dashboard
        .poll_effect()
        .ok_or_else(|| anyhow!("no statistics request issued"))?;
    let client = context.client()?;
    let result = runtime()?.block_on(client.statistics(&request.credential, request.range));
    if let Some(notice) = dashboard.on_result(request.generation, result) {
        report(notice)?;
    }

    let view = dashboard.view();
    println!("Statistics ({})", view.range_label);
    let rows = view
        .tiles
        .into_iter()
        .map(|tile| vec![tile.label, tile.value])
        .collect();
    println!("{}", table(vec!["Metric".into(), "Value".into()], rows));
    Ok(())
}
