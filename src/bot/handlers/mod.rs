pub mod callback;
pub mod general_message;
pub mod message;

use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateHandler},
    prelude::*,
};

use crate::bot::commands::Command;
use crate::bot::BotContext;

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// Routes commands, button presses and the plain-text fallback. The
    /// dispatcher must be given an `InMemStorage<()>` dependency.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let ctx = self.ctx.clone();
        let ctx_callback = self.ctx.clone();

        dialogue::enter::<Update, InMemStorage<()>, (), _>()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot, msg, cmd| {
                        let ctx = ctx.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await.map_err(Into::into) }
                    }),
            )
            .branch(Update::filter_message().endpoint(|bot, msg| async move {
                general_message::handle_general_message(bot, msg).await.map_err(Into::into)
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot, q| {
                let ctx = ctx_callback.clone();
                async move { callback::callback_handler(bot, q, ctx).await.map_err(Into::into) }
            }))
    }
}
