use std::fs::File;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::Table;
use tracing::{info, info_span};

use taxi_ingest::{format_numeric, provider_for};
use taxi_load::{BulkLoader, PgConnection};
use taxi_model::{
    CoercionMode, DEFAULT_TABLE, DatabaseConfig, FillPolicy, LoadOptions, yellow_tripdata,
};

use taxi_cli::pipeline;
use taxi_cli::types::RunReport;

use crate::cli::{DbArgs, LoadArgs, SummaryArgs};
use crate::summary::apply_table_style;

/// Run the load pipeline against the configured warehouse.
pub fn run_load(args: &LoadArgs) -> Result<RunReport> {
    let contract = yellow_tripdata();
    let options = LoadOptions::new(args.table.as_str()).with_coercion(if args.strict_coercion {
        CoercionMode::Strict
    } else {
        CoercionMode::Lenient
    });
    let provider = provider_for(&args.dataset)?;
    let config = database_config(&args.db)?;
    let mut connection = PgConnection::connect(&config).context("connect to warehouse")?;
    let report = pipeline::run(
        provider.as_ref(),
        &args.dataset,
        &mut connection,
        &contract,
        &options,
    )?;
    Ok(report)
}

/// Export the daily trip summary for a pickup-date range as headered CSV.
pub fn run_summary(args: &SummaryArgs) -> Result<usize> {
    let span = info_span!("summary", table = %args.table);
    let _guard = span.enter();
    let start = Instant::now();

    let config = database_config(&args.db)?;
    let mut connection = PgConnection::connect(&config).context("connect to warehouse")?;
    let sql = summary_statement(&args.table);
    let rows = connection
        .client_mut()
        .query(&sql, &[&args.start, &args.end])
        .context("run summary query")?;

    let file = File::create(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([
        "pickup_date",
        "total_trips",
        "total_passengers",
        "total_trip_distance",
        "total_revenue",
    ])?;
    for row in &rows {
        let date: NaiveDate = row.get(0);
        let trips: i64 = row.get(1);
        let passengers: Option<f64> = row.get(2);
        let distance: Option<f64> = row.get(3);
        let revenue: Option<f64> = row.get(4);
        writer.write_record([
            date.to_string(),
            trips.to_string(),
            passengers.map(format_numeric).unwrap_or_default(),
            distance.map(format_numeric).unwrap_or_default(),
            revenue.map(format_numeric).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    info!(
        days = rows.len(),
        output = %args.output.display(),
        duration_ms = start.elapsed().as_millis(),
        "summary exported"
    );
    Ok(rows.len())
}

/// Print the canonical contract and the table DDL it produces.
pub fn run_schema() -> Result<()> {
    let contract = yellow_tripdata();
    let mut table = Table::new();
    table.set_header(vec!["Column", "Type", "Nullable", "Required", "Fill"]);
    apply_table_style(&mut table);
    for column in contract.columns() {
        let fill = match &column.fill {
            FillPolicy::None => String::new(),
            FillPolicy::Numeric(value) => format_numeric(*value),
            FillPolicy::Text(value) => value.clone(),
        };
        table.add_row(vec![
            column.name.clone(),
            column.data_type.ddl_type().to_string(),
            yes_no(column.nullable),
            yes_no(column.required),
            fill,
        ]);
    }
    println!("{table}");
    let loader = BulkLoader::new(&contract, DEFAULT_TABLE);
    println!("{}", loader.create_table_statement());
    Ok(())
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

/// The parameterized daily-aggregate query over the loaded table.
fn summary_statement(table: &str) -> String {
    format!(
        "SELECT tpep_pickup_datetime::date AS pickup_date,\n\
         \x20      COUNT(*)              AS total_trips,\n\
         \x20      SUM(passenger_count)  AS total_passengers,\n\
         \x20      SUM(trip_distance)    AS total_trip_distance,\n\
         \x20      SUM(total_amount)     AS total_revenue\n\
         FROM {table}\n\
         WHERE tpep_pickup_datetime::date BETWEEN $1 AND $2\n\
         GROUP BY pickup_date\n\
         ORDER BY pickup_date"
    )
}

/// Resolve connection parameters from flags with `TAXI_DB_*` fallbacks.
///
/// Host and password are validated here, before any pipeline work or
/// network activity.
fn database_config(args: &DbArgs) -> Result<DatabaseConfig> {
    let host = args
        .db_host
        .clone()
        .or_else(|| env_var("TAXI_DB_HOST"))
        .context("no warehouse host: pass --db-host or set TAXI_DB_HOST")?;
    let password = args
        .db_password
        .clone()
        .or_else(|| env_var("TAXI_DB_PASSWORD"))
        .context("no warehouse password: pass --db-password or set TAXI_DB_PASSWORD")?;
    let mut config = DatabaseConfig::new(host, password);
    if let Some(user) = args.db_user.clone().or_else(|| env_var("TAXI_DB_USER")) {
        config = config.with_user(user);
    }
    if let Some(dbname) = args.db_name.clone().or_else(|| env_var("TAXI_DB_NAME")) {
        config = config.with_dbname(dbname);
    }
    if let Some(port) = args.db_port {
        config = config.with_port(port);
    } else if let Some(raw) = env_var("TAXI_DB_PORT") {
        let port = raw
            .parse()
            .with_context(|| format!("TAXI_DB_PORT is not a port number: {raw}"))?;
        config = config.with_port(port);
    }
    Ok(config)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
