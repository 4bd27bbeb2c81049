//! Config inspection commands. These never open a server session.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, FileConfig};
use crate::error::CliError;
use crate::output;

fn detail(cfg: &FileConfig) -> String {
    [
        format!("server:       {}", cfg.server.as_deref().unwrap_or("-")),
        format!(
            "timeout_secs: {}",
            cfg.timeout_secs.map_or_else(|| "-".into(), |t| t.to_string()),
        ),
        format!(
            "insecure:     {}",
            cfg.insecure.map_or_else(|| "-".into(), |i| i.to_string()),
        ),
        format!(
            "ca_cert:      {}",
            cfg.ca_cert
                .as_ref()
                .map_or_else(|| "-".into(), |p| p.display().to_string()),
        ),
    ]
    .join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, detail, |c| {
                c.server.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
