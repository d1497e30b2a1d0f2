//! Command-line front end: runs one table query against an endpoint and
//! prints the resulting page.

use std::fs::File;
use std::time::Duration;

use anyhow::Context;
use anyhow::anyhow;
use clap::Parser;
use log::info;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use tablequery_lib::TableController;
use tablequery_lib::ViewState;
use tablequery_lib::config::ControllerConfig;
use tablequery_lib::error::Error;
use tablequery_lib::model::Record;
use tablequery_lib::provider::HttpProvider;
use tablequery_lib::provider::RequestStyle;
use tablequery_lib::query::Direction;
use tablequery_lib::query::GlobalFilterPolicy;
use tablequery_lib::query::Intent;
use tablequery_lib::query::MatchMode;
use tablequery_lib::query::Pagination;
use tablequery_lib::query::SortPolicy;

#[derive(Parser)]
#[command(name = "tablequery")]
#[command(about = "Query a paged table endpoint", long_about = None)]
struct Args {
    /// Endpoint URL.
    #[arg(long)]
    url: String,
    /// How requests are sent: body, query or unpaginated.
    #[arg(long, default_value = "body", value_parser = parse_style)]
    style: RequestStyle,
    /// Rows per page.
    #[arg(long, default_value_t = 10)]
    page_size: usize,
    /// 1-based page to show.
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Keyword search across all columns.
    #[arg(long)]
    search: Option<String>,
    /// Column filter as `column=value[:mode]`; repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<FilterArg>,
    /// Sort as `field[:asc|desc]`; repeatable, applied in order.
    #[arg(long = "sort", value_parser = parse_sort)]
    sorts: Vec<SortArg>,
    /// single or multiple.
    #[arg(long, default_value = "multiple", value_parser = parse_sort_mode)]
    sort_mode: SortPolicy,
    /// How the keyword search combines with column filters: propagate or independent.
    #[arg(long, default_value = "propagate", value_parser = parse_global_policy)]
    global_policy: GlobalFilterPolicy,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// Where to write the log.
    #[arg(long, default_value = "tablequery.log")]
    log_file: String,
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

#[derive(Debug, Clone)]
struct FilterArg {
    column: String,
    value: String,
    mode: MatchMode,
}

#[derive(Debug, Clone)]
struct SortArg {
    field: String,
    direction: Option<Direction>,
}

fn parse_style(s: &str) -> Result<RequestStyle, String> {
    RequestStyle::parse(s).ok_or_else(|| format!("unknown request style '{}'", s))
}

fn parse_sort_mode(s: &str) -> Result<SortPolicy, String> {
    SortPolicy::parse(s).ok_or_else(|| format!("unknown sort mode '{}'", s))
}

fn parse_global_policy(s: &str) -> Result<GlobalFilterPolicy, String> {
    GlobalFilterPolicy::parse(s).ok_or_else(|| format!("unknown global filter policy '{}'", s))
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{}'", s))
}

fn parse_filter(s: &str) -> Result<FilterArg, String> {
    let (column, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected column=value[:mode], got '{}'", s))?;

    let (value, mode) = match rest.rsplit_once(':') {
        Some((value, mode)) => match MatchMode::parse(mode) {
            Some(mode) => (value, mode),
            None => return Err(format!("unknown match mode '{}'", mode)),
        },
        None => (rest, MatchMode::default()),
    };

    Ok(FilterArg {
        column: column.to_string(),
        value: value.to_string(),
        mode,
    })
}

fn parse_sort(s: &str) -> Result<SortArg, String> {
    let (field, direction) = match s.split_once(':') {
        Some((field, dir)) => {
            let dir = Direction::parse(dir).ok_or_else(|| format!("unknown direction '{}'", dir))?;
            (field, Some(dir))
        }
        None => (s, None),
    };

    Ok(SortArg {
        field: field.to_string(),
        direction,
    })
}

impl Args {
    /// Intents in the order a user would perform them; paging goes last
    /// because every filter edit returns to the first page.
    fn intents(&self) -> Result<Vec<Intent>, Error> {
        let mut intents = Vec::new();

        if let Some(term) = &self.search {
            intents.push(Intent::set_global_search(term.clone()));
        }
        for filter in &self.filters {
            intents.push(Intent::set_column_filter(
                filter.column.clone(),
                Some(filter.value.clone()),
                Some(filter.mode),
            ));
        }
        for sort in &self.sorts {
            intents.push(Intent::set_sort(sort.field.clone(), sort.direction));
        }
        let page = Pagination::for_page(self.page, self.page_size)?;
        if page.offset() > 0 {
            intents.push(Intent::set_page(page.offset(), page.page_size()));
        }

        Ok(intents)
    }

    fn config(&self) -> ControllerConfig {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));

        ControllerConfig::new()
            .with_page_size(self.page_size)
            .with_sort_policy(self.sort_mode)
            .with_global_filter_policy(self.global_policy)
            .with_request_timeout(timeout)
    }
}

fn print_view(view: &ViewState) {
    let cell = |v: &Option<String>| v.clone().unwrap_or_default();

    println!("{:<8} {:<24} {:<32} {:<16}", "id", "name", "address", "phoneNo");
    for Record {
        id,
        name,
        address,
        phone_no,
    } in view.visible_records()
    {
        println!(
            "{:<8} {:<24} {:<32} {:<16}",
            id.to_string(),
            cell(name),
            cell(address),
            cell(phone_no)
        );
    }

    println!(
        "page {} of {} ({} records)",
        view.page_number(),
        view.page_count().max(1),
        view.total_records()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.page_size == 0 {
        return Err(anyhow!("--page-size must be at least 1"));
    }
    let intents = args.intents().context("Invalid --page")?;

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("Failed to create log file {}", args.log_file))?;
    WriteLogger::init(args.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let provider = HttpProvider::builder()
        .url(args.url.clone())
        .style(args.style)
        .build()
        .context("Failed to build provider")?;
    info!("querying {:?}", provider);

    let controller = TableController::new(provider, args.config());

    if intents.is_empty() {
        controller.refresh().await?;
    }
    for intent in intents {
        let outcome = controller
            .submit(intent.clone())
            .await
            .with_context(|| format!("{:?} failed", intent))?;
        info!("{:?} -> {:?}", intent, outcome);
    }

    print_view(&controller.view());

    Ok(())
}
