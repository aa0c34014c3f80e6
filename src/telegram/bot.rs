//! Bot instance creation and command registration

use reqwest::ClientBuilder;
use teloxide::prelude::*;

use crate::core::config;
use crate::telegram::Bot;

/// Creates a Bot instance from BOT_TOKEN with a timeout-carrying HTTP client.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token or failed to build the HTTP client
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.clone();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN environment variable not set");
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Registers the command list with Telegram so clients render the command menu.
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "show what the bot can do"),
        BotCommand::new("create_bank", "create a piggy bank"),
        BotCommand::new("destroy_bank", "delete a piggy bank"),
        BotCommand::new("income", "add money to a piggy bank"),
        BotCommand::new("expense", "take money out of a piggy bank"),
        BotCommand::new("create_transfer", "move money between piggy banks"),
        BotCommand::new("get_balance", "check a piggy bank's balance"),
        BotCommand::new("cancel", "abort the current action"),
    ])
    .await?;

    Ok(())
}
