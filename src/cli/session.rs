use clap::{Args, Subcommand};

use crate::{
    context::AppContext,
    session::{OwnerKey, SessionSource},
};

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Store credentials issued by the auth service
    Login(LoginArgs),

    /// Clear the session and the owner's cart
    Logout,

    /// Print the current owner
    Show,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Bearer token for the order service
    #[arg(long, env = "SATCHEL_TOKEN", hide_env_values = true)]
    token: String,

    /// Authenticated user id
    #[arg(long)]
    user_id: String,
}

pub(crate) fn run(command: SessionCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Login(args) => {
            context
                .session
                .login(&args.token, &args.user_id)
                .map_err(|error| format!("failed to store credentials: {error}"))?;

            println!("logged in as user:{}", args.user_id);

            Ok(())
        }
        SessionSubcommand::Logout => {
            // The cart record goes first, while the session still names
            // its owner. Other identities' carts are left untouched.
            context.cart.discard();
            context.session.clear();

            println!("logged out");

            Ok(())
        }
        SessionSubcommand::Show => {
            let owner = OwnerKey::resolve(context.session.as_ref());

            println!("owner: {owner}");
            println!(
                "authenticated: {}",
                if context.session.token().is_some() {
                    "yes"
                } else {
                    "no"
                }
            );

            Ok(())
        }
    }
}
