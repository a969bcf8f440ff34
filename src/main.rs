use anyhow::Context;
use clap::Parser;
use scf_ledger::{
    config::{Args, Command},
    context::Invocation,
    dispatch::{Dispatcher, Operation},
};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // logs go to stderr so stdout carries only the response payload
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Command::Operations => {
            for op in Operation::ALL {
                println!("{}", op.name());
            }
            Ok(())
        }
        Command::Invoke { call } => {
            let store = args
                .open_store()
                .with_context(|| format!("failed to open store at {}", args.db.display()))?;
            info!(db = %args.db.display(), "store opened");

            let dispatcher = Dispatcher::new(store);
            let invocation = Invocation::from_parts(call.clone())?;
            let response = dispatcher.invoke(&invocation);
            dispatcher.service().store().flush()?;

            if !response.is_success() {
                return Err(anyhow::anyhow!(response.message));
            }
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&response.payload)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}
