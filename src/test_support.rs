use std::sync::{Mutex, MutexGuard};

use crate::domain::message::{Message, MessageId, UserId};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

pub fn message(id: i64, author: i64, content: &str) -> Message {
    Message {
        id: MessageId(id),
        author_id: UserId(author),
        author_name: format!("user-{author}"),
        content: content.to_owned(),
        created_at: "2025-11-03T10:30:00.000-03:00".to_owned(),
    }
}
