use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::core::error::AppResult;
use crate::processing::Notifier;
use crate::telegram::keyboard;
use crate::telegram::Bot;

/// Sends state-machine replies through the Telegram Bot API.
///
/// Plain sends carry an explicit keyboard removal so stale bank-name buttons
/// from an earlier prompt don't linger in the client.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat: i64, text: &str) -> AppResult<()> {
        self.bot
            .send_message(ChatId(chat), text)
            .reply_markup(keyboard::remove_keyboard())
            .await?;
        Ok(())
    }

    async fn send_with_choices(&self, chat: i64, text: &str, choices: &[String]) -> AppResult<()> {
        self.bot
            .send_message(ChatId(chat), text)
            .reply_markup(keyboard::bank_keyboard(choices))
            .await?;
        Ok(())
    }
}
