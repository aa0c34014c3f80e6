use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

/// Bank names as a one-time reply keyboard, three buttons per row.
pub fn bank_keyboard(names: &[String]) -> ReplyMarkup {
    let rows: Vec<Vec<KeyboardButton>> = names
        .chunks(3)
        .map(|row| row.iter().map(|name| KeyboardButton::new(name.clone())).collect())
        .collect();

    ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard().one_time_keyboard())
}

/// Clears any reply keyboard left over from a previous prompt.
pub fn remove_keyboard() -> ReplyMarkup {
    ReplyMarkup::KeyboardRemove(KeyboardRemove::new())
}
