use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use uniquedb::codegen::AccessModifier;
use uniquedb::{
    dependency_work_units, generate_from_describe_dump, generate_from_schema_dump,
    GeneratorOptions, SchemaQualifiedName, UniqueDbOptions, UniqueDbProvider,
};

#[derive(Parser)]
#[command(name = "uniquedb")]
#[command(author, version, about = "SQL Server schema tooling: unique test databases and C# class generation")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a unique database name, its connection string and create/drop statements
    Name {
        /// XML options file (<UniqueDb> element)
        #[arg(short, long, conflicts_with_all = ["server", "prefix"])]
        options: Option<PathBuf>,

        /// SQL Server instance name
        #[arg(short, long, required_unless_present = "options")]
        server: Option<String>,

        /// Database name prefix
        #[arg(short, long, required_unless_present = "options")]
        prefix: Option<String>,

        /// Use the prefix alone, without a timestamp
        #[arg(long)]
        no_timestamp: bool,

        /// .NET-style timestamp format
        #[arg(long, default_value = uniquedb::options::DEFAULT_TIMESTAMP_FORMAT)]
        timestamp_format: String,

        /// SQL login; integrated security is used when omitted
        #[arg(long, requires = "password")]
        user: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Generate C# classes from an introspection dump
    Generate {
        /// Schema dump (INFORMATION_SCHEMA rows) or, with --class-name, a
        /// describe-result-set dump
        #[arg(short, long)]
        dump: PathBuf,

        /// Only generate this table (schema.table)
        #[arg(short, long, conflicts_with = "class_name")]
        table: Option<SchemaQualifiedName>,

        /// Treat the dump as a result-set description and name the class
        #[arg(short, long)]
        class_name: Option<String>,

        /// Emit LF line endings instead of CRLF
        #[arg(long)]
        lf: bool,

        /// Generate internal classes
        #[arg(long)]
        internal: bool,
    },

    /// Print foreign-key work units for a root table
    Order {
        /// Schema dump containing constraint rows
        #[arg(short, long)]
        dump: PathBuf,

        /// Root table (schema.table)
        #[arg(short, long)]
        root: SchemaQualifiedName,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Name {
            options,
            server,
            prefix,
            no_timestamp,
            timestamp_format,
            user,
            password,
        } => {
            let options = match options {
                Some(path) => UniqueDbOptions::from_file(&path)?,
                None => {
                    let server = server.unwrap_or_default();
                    let prefix = prefix.unwrap_or_default();
                    match user {
                        Some(user) => UniqueDbOptions::with_timestamp_and_credentials(
                            &server,
                            &prefix,
                            !no_timestamp,
                            &timestamp_format,
                            &user,
                            &password.unwrap_or_default(),
                        ),
                        None => UniqueDbOptions::with_timestamp(
                            &server,
                            &prefix,
                            !no_timestamp,
                            &timestamp_format,
                        ),
                    }
                }
            };

            let provider = UniqueDbProvider::new(options)?;
            println!("{}", provider.database_name());
            println!("{}", provider.connection_string());
            println!("{}", provider.create_database_sql());
            println!("{}", provider.drop_database_sql());
        }
        Commands::Generate {
            dump,
            table,
            class_name,
            lf,
            internal,
        } => {
            let mut options = GeneratorOptions::default();
            if lf {
                options.newline = "\n".to_string();
            }
            if internal {
                options.class_access_modifier = AccessModifier::Internal;
            }

            match class_name {
                Some(class_name) => {
                    print!("{}", generate_from_describe_dump(&dump, &class_name, &options)?);
                }
                None => {
                    let classes = generate_from_schema_dump(&dump, table.as_ref(), &options)?;
                    print!("{}", classes.join(&options.newline));
                }
            }
        }
        Commands::Order { dump, root } => {
            for unit in dependency_work_units(&dump, &root)? {
                println!("{}", unit);
            }
        }
    }

    Ok(())
}
