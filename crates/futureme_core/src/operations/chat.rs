use crate::ports::ReflectionService;

/// Replies to a chat message. No conversation state is kept between calls.
pub fn chat(reflection: &dyn ReflectionService, message: &str) -> String {
    reflection.reply(message)
}
