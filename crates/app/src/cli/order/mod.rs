use clap::{Args, Subcommand};

mod transition;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Move an order to another status, e.g. when it ships.
    Transition(transition::TransitionOrderArgs),
}

pub(crate) async fn run(command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Transition(args) => transition::run(args).await,
    }
}
