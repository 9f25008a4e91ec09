use clap::Args;
use serde::Serialize;
use staffdb::database::{SchemaStatus, StaffDatabase};
use staffdb::lens::utils::OutputFormat;
use staffdb::StaffdbConfig;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also show record counts from the database
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    data_dir: String,
    log_file: Option<String>,
    database: DatabaseInfo,
}

#[derive(Debug, Serialize)]
struct DatabaseInfo {
    path: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    employee_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    review_count: Option<u64>,
}

pub fn run(config: &StaffdbConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { verbose } = args;

    let sqlite_path = config.sqlite_path();
    let exists = Path::new(&sqlite_path).exists();
    let size_bytes = if exists {
        std::fs::metadata(&sqlite_path).ok().map(|m| m.len())
    } else {
        None
    };

    // Only open an existing file; opening would otherwise create it
    let (schema_status, account_count, employee_count, review_count) = if exists {
        match StaffDatabase::open(&sqlite_path) {
            Ok(db) => {
                let status = db.schema_status().ok();
                let counts = if verbose && status == Some(SchemaStatus::Current) {
                    (
                        db.credentials().count().ok(),
                        db.employees().count().ok(),
                        db.reviews().count().ok(),
                    )
                } else {
                    (None, None, None)
                };
                (status.map(|s| s.to_string()), counts.0, counts.1, counts.2)
            }
            Err(e) => (Some(format!("unusable: {}", e)), None, None, None),
        }
    } else {
        (None, None, None, None)
    };

    let info = ConfigInfo {
        config_file: config.config_file.clone(),
        data_dir: config.data_dir.clone(),
        log_file: config.log_to_file.then(|| config.log_path()),
        database: DatabaseInfo {
            path: sqlite_path,
            exists,
            size_bytes,
            schema_status,
            account_count,
            employee_count,
            review_count,
        },
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        _ => print_config_table(config, &info),
    }
}

fn print_config_table(config: &StaffdbConfig, info: &ConfigInfo) {
    println!("{}", config.summary());
    println!();

    let db = &info.database;
    if !db.exists {
        println!("Database:           not created yet");
        return;
    }

    if let Some(size) = db.size_bytes {
        println!("Database Size:      {} bytes", size);
    }
    if let Some(status) = &db.schema_status {
        println!("Schema:             {}", status);
    }
    if let Some(n) = db.account_count {
        println!("Accounts:           {}", n);
    }
    if let Some(n) = db.employee_count {
        println!("Employees:          {}", n);
    }
    if let Some(n) = db.review_count {
        println!("Reviews:            {}", n);
    }
}
