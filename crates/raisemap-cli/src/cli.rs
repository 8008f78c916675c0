use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "raisemap", bin_name = "raisemap")]
#[command(about = "Static discovery of the HTTP error responses a FastAPI app can raise")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile an OpenAPI schema enriched with every discoverable error response
    #[command(after_help = r#"EXAMPLES:
  raisemap compile app.main:app
  raisemap compile app.main:app ./openapi.json
  raisemap compile app.main:app ./openapi.json app"#)]
    Compile {
        /// The application object, as '<module>:<attribute>'
        app_path: String,

        /// Where to write the OpenAPI schema
        #[arg(default_value = "./openapi.json")]
        target_path: PathBuf,

        /// Module prefix designating user code (defaults to the
        /// application module's top-level package)
        scan_module: Option<String>,
    },

    /// Print the discovered routes and their error responses
    #[command(after_help = r#"EXAMPLES:
  raisemap inspect app.main:app
  raisemap inspect app.main:app app"#)]
    Inspect {
        /// The application object, as '<module>:<attribute>'
        app_path: String,

        /// Module prefix designating user code
        scan_module: Option<String>,
    },
}
